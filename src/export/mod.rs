pub mod excel;

use crate::error::Result;
use product_ledger_common::BackupDocument;
use std::path::{Path, PathBuf};

const BACKUP_PREFIX: &str = "product-ledger-backup";

/// 出力先がディレクトリ（または拡張子なし）ならファイル名を補う
pub fn output_path_for(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

/// 既定のバックアップファイル名（日付入り）
pub fn default_backup_name() -> String {
    format!("{}-{}", BACKUP_PREFIX, chrono::Local::now().format("%Y%m%d"))
}

/// バックアップ文書をJSONで書き出す
pub fn write_backup(document: &BackupDocument, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = document.to_json_pretty()?;
    std::fs::write(output_path, json)?;
    log::info!("バックアップを書き出し: {}", output_path.display());
    Ok(())
}
