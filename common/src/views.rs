//! 派生ビュー
//!
//! 元のコレクションを変更せずに、お気に入り一覧や検索結果を計算する。
//! 結果はキャッシュせず、呼ばれるたびに再計算する。

use crate::store::CollectionStore;
use crate::types::{Product, Row};

/// 全リストのお気に入り商品（リスト走査順 → リスト内順）
pub fn favorites_across_all(store: &CollectionStore) -> Vec<&Product> {
    store
        .product_lists()
        .values()
        .flatten()
        .filter(|p| p.is_favorite)
        .collect()
}

/// バーコード・商品説明の部分一致（大文字小文字無視）
///
/// 空の検索語は全件を返す。元の相対順序を保つ。
pub fn text_filter<'a, I>(products: I, term: &str) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let needle = term.to_lowercase();
    products
        .into_iter()
        .filter(|p| {
            needle.is_empty()
                || p.barcode.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// 行のすべてのセル値に対する部分一致（大文字小文字無視）
pub fn table_filter<'a>(rows: &'a [Row], term: &str) -> Vec<&'a Row> {
    if term.is_empty() {
        return rows.iter().collect();
    }

    let needle = term.to_lowercase();
    rows.iter()
        .filter(|row| row.values().any(|v| v.to_string().to_lowercase().contains(&needle)))
        .collect()
}
