//! コレクションストア
//!
//! 固定のリストごとに商品コレクションと列マッピングを保持する。
//! 個別商品の更新APIは持たず、呼び出し側が新しい列を計算して丸ごと置き換える。

use crate::mapping::ColumnMapping;
use crate::types::{Link, ListMap, ListName, Product};

/// リストごとの商品コレクション（先頭が最新）
pub type ProductLists = ListMap<Vec<Product>>;

/// リストごとの列マッピング
pub type ColumnMappings = ListMap<ColumnMapping>;

/// 全状態のスナップショット
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStore {
    product_lists: ProductLists,
    column_mappings: ColumnMappings,
    links: Vec<Link>,
}

impl CollectionStore {
    pub fn new(product_lists: ProductLists, column_mappings: ColumnMappings, links: Vec<Link>) -> Self {
        Self {
            product_lists,
            column_mappings,
            links,
        }
    }

    /// リストの商品コレクション
    pub fn get(&self, list: ListName) -> &[Product] {
        self.product_lists.get(list)
    }

    /// コレクションを丸ごと置き換える
    pub fn replace(&mut self, list: ListName, products: Vec<Product>) {
        log::debug!("{}: {}件に置き換え", list, products.len());
        *self.product_lists.get_mut(list) = products;
    }

    pub fn mapping(&self, list: ListName) -> &ColumnMapping {
        self.column_mappings.get(list)
    }

    pub fn set_mapping(&mut self, list: ListName, mapping: ColumnMapping) {
        *self.column_mappings.get_mut(list) = mapping;
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn replace_links(&mut self, links: Vec<Link>) {
        self.links = links;
    }

    pub fn product_lists(&self) -> &ProductLists {
        &self.product_lists
    }

    pub fn column_mappings(&self) -> &ColumnMappings {
        &self.column_mappings
    }

    /// 全リストの商品数合計
    pub fn product_count(&self) -> usize {
        self.product_lists.values().map(Vec::len).sum()
    }

    /// 商品もリンクも無い状態か
    pub fn is_empty(&self) -> bool {
        self.product_count() == 0 && self.links.is_empty()
    }

    /// 全リストを横断して商品を変換する
    ///
    /// `predicate` に一致した商品ごとに `transform` を呼び、`None` なら削除する。
    /// 一致しなかった商品と、一致しなかったリストはそのまま残る。
    /// 戻り値は一致した商品の件数。
    pub fn apply_to_all_collections<P, F>(&mut self, predicate: P, mut transform: F) -> usize
    where
        P: Fn(&Product) -> bool,
        F: FnMut(&Product) -> Option<Product>,
    {
        let mut touched = 0;

        for (list, products) in self.product_lists.iter_mut() {
            if !products.iter().any(&predicate) {
                continue;
            }

            let mut next = Vec::with_capacity(products.len());
            for product in products.iter() {
                if predicate(product) {
                    touched += 1;
                    if let Some(updated) = transform(product) {
                        next.push(updated);
                    }
                } else {
                    next.push(product.clone());
                }
            }

            log::debug!("{}: {}件 → {}件", list, products.len(), next.len());
            *products = next;
        }

        touched
    }
}
