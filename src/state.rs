//! 永続化状態モジュール
//!
//! リンク・商品リスト・列マッピングを3つの独立したJSONファイルに保存する。
//! 読み込み時、欠けている・壊れているファイルは空の既定値に置き換える。

use crate::error::Result;
use product_ledger_common::{decode_product_lists, CollectionStore, ColumnMappings, ImportedProducts, Link, ProductLists};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const LINKS_FILE_NAME: &str = "links.json";
const PRODUCT_LISTS_FILE_NAME: &str = "product-lists.json";
const COLUMN_MAPPINGS_FILE_NAME: &str = "column-mappings.json";

/// 状態ファイルの保存先
#[derive(Debug, Clone)]
pub struct StateFiles {
    dir: PathBuf,
}

impl StateFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn links_path(&self) -> PathBuf {
        self.dir.join(LINKS_FILE_NAME)
    }

    pub fn product_lists_path(&self) -> PathBuf {
        self.dir.join(PRODUCT_LISTS_FILE_NAME)
    }

    pub fn column_mappings_path(&self) -> PathBuf {
        self.dir.join(COLUMN_MAPPINGS_FILE_NAME)
    }

    /// 3スロットを読み込んでストアを組み立てる（失敗しない）
    pub fn load(&self) -> CollectionStore {
        let links: Vec<Link> = load_slot(&self.links_path());
        let product_lists = load_product_lists(&self.product_lists_path());
        let column_mappings: ColumnMappings = load_slot(&self.column_mappings_path());
        CollectionStore::new(product_lists, column_mappings, links)
    }

    pub fn save_links(&self, store: &CollectionStore) -> Result<()> {
        save_slot(&self.links_path(), store.links())
    }

    pub fn save_product_lists(&self, store: &CollectionStore) -> Result<()> {
        save_slot(&self.product_lists_path(), store.product_lists())
    }

    pub fn save_column_mappings(&self, store: &CollectionStore) -> Result<()> {
        save_slot(&self.column_mappings_path(), store.column_mappings())
    }

    pub fn save_all(&self, store: &CollectionStore) -> Result<()> {
        self.save_links(store)?;
        self.save_product_lists(store)?;
        self.save_column_mappings(store)
    }
}

/// スロットを読み込む。無い・読めない・解析できない場合は既定値。
fn load_slot<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("{} を開けません、空の状態で開始します: {}", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} が不正です、空の状態で開始します: {}", path.display(), e);
            T::default()
        }
    }
}

/// 商品リストはエントリ単位で読む
///
/// 一部のキーが欠けた商品は既定値で補い、読めないエントリ・リストだけを捨てる。
fn load_product_lists(path: &Path) -> ProductLists {
    let value: serde_json::Value = load_slot(path);
    if value.is_null() {
        return ProductLists::default();
    }

    let Some(lists) = decode_product_lists(&value) else {
        log::warn!("{} が不正です、空の状態で開始します", path.display());
        return ProductLists::default();
    };

    ProductLists::from_fn(|list| {
        let ImportedProducts { accepted, dropped } = lists.get(list).clone();
        if dropped > 0 {
            log::warn!("{}: {} の読めない商品{}件を捨てました", path.display(), list, dropped);
        }
        accepted
    })
}

fn save_slot<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_ledger_common::{ListName, Product};
    use tempfile::tempdir;

    #[test]
    fn test_load_empty_dir() {
        let dir = tempdir().unwrap();
        let store = StateFiles::new(dir.path()).load();
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_slot_falls_back_independently() {
        let dir = tempdir().unwrap();
        let files = StateFiles::new(dir.path());

        std::fs::write(files.links_path(), "{ broken").unwrap();
        std::fs::write(
            files.product_lists_path(),
            r#"{"data1": [{"barcode": "A", "description": "Kalem", "price": 1, "commission": 2}]}"#,
        )
        .unwrap();

        let store = files.load();
        assert!(store.links().is_empty());
        assert_eq!(store.get(ListName::Data1).len(), 1);
        assert!(store.get(ListName::Main).is_empty());
    }

    #[test]
    fn test_partial_product_is_backfilled() {
        let dir = tempdir().unwrap();
        let files = StateFiles::new(dir.path());
        std::fs::write(
            files.product_lists_path(),
            r#"{"main": [{"barcode": "M", "description": "Kalem", "price": 3, "commission": 1}],
                "data1": [{"barcode": "P", "price": "2,5"}, {"description": "no barcode"}],
                "data2": {"oops": true}}"#,
        )
        .unwrap();

        let store = files.load();
        assert_eq!(store.get(ListName::Main)[0].barcode, "M");
        let partial = &store.get(ListName::Data1)[0];
        assert_eq!(partial.barcode, "P");
        assert_eq!(partial.description, "");
        assert_eq!(partial.price, 2.5);
        assert_eq!(partial.commission, 0.0);
        assert_eq!(store.get(ListName::Data1).len(), 1);
        assert!(store.get(ListName::Data2).is_empty());
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempdir().unwrap();
        let files = StateFiles::new(dir.path().join("a").join("b"));

        let mut store = CollectionStore::default();
        store.replace(ListName::Main, vec![Product::new("A", "Kalem", 1.0, 0.0)]);
        files.save_all(&store).unwrap();

        assert!(files.product_lists_path().exists());
        assert_eq!(files.load(), store);
    }
}
