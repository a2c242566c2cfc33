//! 絞り込み結果のExcel出力

use crate::error::{LedgerError, Result};
use product_ledger_common::{CellValue, Row};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

const MAX_SHEET_TITLE_LEN: usize = 30;

/// シート名からExcelのシートタイトルを作る
///
/// 使えない文字 `/ \ ? * : [ ]` を除き、30文字に切り詰める。
pub fn sheet_title(sheet_name: &str) -> String {
    let title: String = sheet_name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '?' | '*' | ':' | '[' | ']'))
        .take(MAX_SHEET_TITLE_LEN)
        .collect();

    if title.trim().is_empty() {
        "Data".to_string()
    } else {
        title
    }
}

/// 行をヘッダー順に書き出す。空セルは書かない。
pub fn write_rows(headers: &[String], rows: &[&Row], sheet_name: &str, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_title(sheet_name))
        .map_err(|e| LedgerError::ExcelGeneration(format!("シート名エラー: {}", e)))?;

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| LedgerError::ExcelGeneration(format!("ヘッダー書き込みエラー: {}", e)))?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let line = (idx + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let written = match row.get(header) {
                Some(CellValue::Number(n)) => worksheet.write_number(line, col as u16, *n).map(|_| ()),
                Some(CellValue::Text(s)) => worksheet.write_string(line, col as u16, s).map(|_| ()),
                None => Ok(()),
            };
            written.map_err(|e| LedgerError::ExcelGeneration(format!("{}行目の書き込みエラー: {}", line, e)))?;
        }
    }

    workbook
        .save(output_path)
        .map_err(|e| LedgerError::ExcelGeneration(format!("保存エラー: {}", e)))?;
    log::info!("{}行を書き出し: {}", rows.len(), output_path.display());
    Ok(())
}
