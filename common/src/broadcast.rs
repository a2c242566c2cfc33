//! バーコード一括更新
//!
//! 削除・原価更新・お気に入り切り替えは、対象リストに関係なく
//! 同じバーコードを持つ全リストの商品に適用される。

use crate::store::CollectionStore;
use crate::types::Product;

impl CollectionStore {
    /// 全リストからバーコードの商品を削除する。削除件数を返す。
    pub fn delete_by_barcode(&mut self, barcode: &str) -> usize {
        let removed = self.apply_to_all_collections(|p| p.barcode == barcode, |_| None);
        log::info!("{}: {}件削除", barcode, removed);
        removed
    }

    /// 全リストでバーコードの商品の原価を更新する。有限でない値は 0。
    pub fn update_cost_by_barcode(&mut self, barcode: &str, cost: f64) -> usize {
        let cost = if cost.is_finite() { cost } else { 0.0 };
        self.apply_to_all_collections(
            |p| p.barcode == barcode,
            |p| Some(Product { cost, ..p.clone() }),
        )
    }

    /// 全リストでバーコードの商品のお気に入りを反転する
    ///
    /// 各商品は自分の値を反転するため、リスト間で値が異なれば異なったままになる。
    pub fn toggle_favorite_by_barcode(&mut self, barcode: &str) -> usize {
        self.apply_to_all_collections(
            |p| p.barcode == barcode,
            |p| Some(Product { is_favorite: !p.is_favorite, ..p.clone() }),
        )
    }

    /// 全リストで最初に見つかったバーコードの商品
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        self.product_lists().values().flatten().find(|p| p.barcode == barcode)
    }
}
