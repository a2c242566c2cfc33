//! マージ（突き合わせ）エンジン
//!
//! 商品の追加・一括追加・スナップショットマージを行う。
//! どの操作の後も、同じリスト内にバーコードの重複は存在しない。
//!
//! ## 処理方針
//! 1. 既存コレクションを読み取り専用で参照し、新しいコレクションを計算
//! 2. エラー時は何も置き換えない
//! 3. 成功時のみ `CollectionStore::replace` で丸ごと差し替え

use crate::backup::{ImportedLinks, ImportedProducts, ImportedSnapshot};
use crate::error::{Error, Result};
use crate::mapping::ColumnMapping;
use crate::normalizer::normalize;
use crate::store::CollectionStore;
use crate::types::{Link, ListName, Product, Row};
use std::collections::{HashMap, HashSet};

/// 一括追加の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkAddSummary {
    /// 追加した件数
    pub accepted: usize,
    /// 既存または同一バッチ内の先行行とバーコードが重複してスキップした件数
    pub skipped: usize,
    /// 商品に変換できなかった行数
    pub unmapped: usize,
}

/// スナップショットマージの結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// `productLists` がマージ対象として存在したか
    pub has_product_lists: bool,
    /// 取り込んだ商品エントリ数
    pub products_merged: usize,
    /// 捨てた商品エントリ数
    pub products_dropped: usize,
    /// `links` がマージ対象として存在したか
    pub has_links: bool,
    /// 取り込んだリンク数
    pub links_merged: usize,
    /// 捨てたリンク数
    pub links_dropped: usize,
}

/// 1行を商品としてコレクション先頭に追加した新しいコレクションを返す
pub fn plan_add_product(existing: &[Product], mapping: &ColumnMapping, row: &Row) -> Result<(Product, Vec<Product>)> {
    if !mapping.is_complete() {
        return Err(Error::MappingIncomplete);
    }

    let product = normalize(row, mapping).ok_or(Error::EmptyBarcode)?;

    if existing.iter().any(|p| p.barcode == product.barcode) {
        return Err(Error::DuplicateBarcode(product.barcode));
    }

    let mut next = Vec::with_capacity(existing.len() + 1);
    next.push(product.clone());
    next.extend_from_slice(existing);
    Ok((product, next))
}

/// 複数行を一括追加した新しいコレクションを返す
///
/// 変換できない行は飛ばす。バーコードが既存または同一バッチで既出なら
/// スキップ（先勝ち）。追加分は入力順のまま既存の前に並ぶ。
pub fn plan_add_all_products<'a, I>(existing: &[Product], mapping: &ColumnMapping, rows: I) -> (BulkAddSummary, Vec<Product>)
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut summary = BulkAddSummary::default();
    let mut seen: HashSet<String> = existing.iter().map(|p| p.barcode.clone()).collect();
    let mut accepted = Vec::new();

    for row in rows {
        let Some(product) = normalize(row, mapping) else {
            summary.unmapped += 1;
            continue;
        };

        if seen.insert(product.barcode.clone()) {
            accepted.push(product);
        } else {
            summary.skipped += 1;
        }
    }

    summary.accepted = accepted.len();
    accepted.extend_from_slice(existing);
    (summary, accepted)
}

/// インポート商品を既存コレクションに上書きマージする
///
/// 既存バーコードは元の位置のまま値を丸ごと置き換え、新規バーコードは末尾に追加する。
/// 同じバーコードがインポート内で複数回出た場合は最後のものが残る。
pub fn plan_merge_products(existing: &[Product], imported: &[Product]) -> Vec<Product> {
    let mut merged: Vec<Product> = Vec::with_capacity(existing.len() + imported.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for product in existing.iter().chain(imported) {
        if product.barcode.is_empty() {
            continue;
        }
        match index.get(&product.barcode) {
            Some(&pos) => merged[pos] = product.clone(),
            None => {
                index.insert(product.barcode.clone(), merged.len());
                merged.push(product.clone());
            }
        }
    }

    merged
}

/// インポートリンクを URL キーで上書きマージする
pub fn plan_merge_links(existing: &[Link], imported: &[Link]) -> Vec<Link> {
    let mut merged: Vec<Link> = Vec::with_capacity(existing.len() + imported.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for link in existing.iter().chain(imported) {
        match index.get(&link.url) {
            Some(&pos) => merged[pos] = link.clone(),
            None => {
                index.insert(link.url.clone(), merged.len());
                merged.push(link.clone());
            }
        }
    }

    merged
}

impl CollectionStore {
    /// リストの列マッピングで1行を変換して追加する
    pub fn add_product(&mut self, list: ListName, row: &Row) -> Result<Product> {
        let (product, next) = plan_add_product(self.get(list), self.mapping(list), row)?;
        log::info!("{}: 商品を追加 {}", list, product.barcode);
        self.replace(list, next);
        Ok(product)
    }

    /// 複数行を一括追加する（失敗しない）
    pub fn add_all_products<'a, I>(&mut self, list: ListName, rows: I) -> BulkAddSummary
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let (summary, next) = plan_add_all_products(self.get(list), self.mapping(list), rows);
        log::info!(
            "{}: 一括追加 追加{}件 スキップ{}件 変換不可{}件",
            list,
            summary.accepted,
            summary.skipped,
            summary.unmapped
        );
        if summary.accepted > 0 {
            self.replace(list, next);
        }
        summary
    }

    /// インポート文書を現在の状態にマージする
    pub fn merge_snapshot(&mut self, snapshot: &ImportedSnapshot) -> SnapshotSummary {
        let mut summary = SnapshotSummary::default();

        if let Some(lists) = &snapshot.product_lists {
            summary.has_product_lists = true;
            for (list, ImportedProducts { accepted, dropped }) in lists.iter() {
                summary.products_merged += accepted.len();
                summary.products_dropped += dropped;
                let next = plan_merge_products(self.get(list), accepted);
                self.replace(list, next);
            }
        }

        if let Some(ImportedLinks { accepted, dropped }) = &snapshot.links {
            summary.has_links = true;
            summary.links_merged = accepted.len();
            summary.links_dropped = *dropped;
            let next = plan_merge_links(self.links(), accepted);
            self.replace_links(next);
        }

        log::info!(
            "スナップショットマージ: 商品{}件（破棄{}件） リンク{}件（破棄{}件）",
            summary.products_merged,
            summary.products_dropped,
            summary.links_merged,
            summary.links_dropped
        );
        summary
    }
}
