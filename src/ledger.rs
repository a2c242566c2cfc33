//! 台帳セッション
//!
//! 状態を読み込み、エンジン操作を1つ実行し、変更されたスロットを保存する。
//! 保存はベストエフォートで、失敗しても操作自体は成功扱い（警告ログのみ）。

use crate::error::{LedgerError, Result};
use crate::state::StateFiles;
use product_ledger_common::{
    parse_backup, BackupDocument, BulkAddSummary, CollectionStore, ColumnMapping, Link, ListName,
    Product, ProductField, Row, SnapshotSummary,
};

/// 保存対象のスロット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Links,
    ProductLists,
    ColumnMappings,
}

pub struct Ledger {
    files: StateFiles,
    store: CollectionStore,
}

impl Ledger {
    /// 状態ディレクトリから開く（壊れたスロットは空で開始）
    pub fn open(files: StateFiles) -> Self {
        let store = files.load();
        log::debug!(
            "状態を読み込み: {} (商品{}件, リンク{}件)",
            files.dir().display(),
            store.product_count(),
            store.links().len()
        );
        Self { files, store }
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn files(&self) -> &StateFiles {
        &self.files
    }

    fn persist(&self, slots: &[Slot]) {
        for slot in slots {
            let result = match slot {
                Slot::Links => self.files.save_links(&self.store),
                Slot::ProductLists => self.files.save_product_lists(&self.store),
                Slot::ColumnMappings => self.files.save_column_mappings(&self.store),
            };
            if let Err(e) = result {
                log::warn!("{:?} の保存に失敗しました: {}", slot, e);
            }
        }
    }

    /// フィールドにヘッダーを割り当てる（`None` で解除）
    pub fn set_mapping_field(&mut self, list: ListName, field: ProductField, header: Option<&str>) -> &ColumnMapping {
        let next = self.store.mapping(list).assign(field, header);
        self.store.set_mapping(list, next);
        self.persist(&[Slot::ColumnMappings]);
        self.store.mapping(list)
    }

    /// リストの列マッピングをすべて解除する
    pub fn reset_mapping(&mut self, list: ListName) {
        self.store.set_mapping(list, ColumnMapping::default());
        self.persist(&[Slot::ColumnMappings]);
    }

    pub fn add_product(&mut self, list: ListName, row: &Row) -> Result<Product> {
        let product = self.store.add_product(list, row)?;
        self.persist(&[Slot::ProductLists]);
        Ok(product)
    }

    pub fn add_all_products<'a, I>(&mut self, list: ListName, rows: I) -> BulkAddSummary
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let summary = self.store.add_all_products(list, rows);
        if summary.accepted > 0 {
            self.persist(&[Slot::ProductLists]);
        }
        summary
    }

    pub fn delete_by_barcode(&mut self, barcode: &str) -> usize {
        let removed = self.store.delete_by_barcode(barcode);
        if removed > 0 {
            self.persist(&[Slot::ProductLists]);
        }
        removed
    }

    pub fn update_cost_by_barcode(&mut self, barcode: &str, cost: f64) -> usize {
        let updated = self.store.update_cost_by_barcode(barcode, cost);
        if updated > 0 {
            self.persist(&[Slot::ProductLists]);
        }
        updated
    }

    pub fn toggle_favorite_by_barcode(&mut self, barcode: &str) -> usize {
        let toggled = self.store.toggle_favorite_by_barcode(barcode);
        if toggled > 0 {
            self.persist(&[Slot::ProductLists]);
        }
        toggled
    }

    /// バックアップ文書をマージする
    ///
    /// 文書全体が解析できない場合は何も変更せずにエラーを返す。
    pub fn import_backup(&mut self, text: &str) -> Result<SnapshotSummary> {
        let snapshot = parse_backup(text)?;
        let summary = self.store.merge_snapshot(&snapshot);

        let mut slots = Vec::new();
        if summary.has_product_lists {
            slots.push(Slot::ProductLists);
        }
        if summary.has_links {
            slots.push(Slot::Links);
        }
        self.persist(&slots);

        Ok(summary)
    }

    pub fn export_backup(&self) -> BackupDocument {
        BackupDocument::from_store(&self.store)
    }

    pub fn add_link(&mut self, name: &str, url: &str) -> Result<Link> {
        let link = self.store.add_link(name, url)?;
        self.persist(&[Slot::Links]);
        Ok(link)
    }

    /// 一覧の番号（1始まり）を添字に変換する
    pub fn link_index(&self, number: usize) -> Result<usize> {
        if number == 0 || number > self.store.links().len() {
            return Err(LedgerError::LinkNotFound(number));
        }
        Ok(number - 1)
    }

    pub fn edit_link(&mut self, index: usize, name: &str, url: &str) -> Result<Link> {
        let link = self.store.edit_link(index, name, url)?;
        self.persist(&[Slot::Links]);
        Ok(link)
    }

    pub fn delete_link(&mut self, index: usize) -> Result<Link> {
        let link = self.store.delete_link(index)?;
        self.persist(&[Slot::Links]);
        Ok(link)
    }
}
