//! 表示用の整形

use product_ledger_common::{ColumnMapping, Product, ProductField, Row};

/// 金額を小数2桁＋通貨記号で表示
pub fn format_money(value: f64, currency: &str) -> String {
    format!("{:.2} {}", value, currency)
}

/// 商品1件の表示行
pub fn product_line(product: &Product, currency: &str) -> String {
    let star = if product.is_favorite { "★" } else { "☆" };
    format!(
        "{} {:<16} {:<32} 価格 {:>12}  手数料 {:>5.1}%  原価 {:>12}  利益 {:>12}",
        star,
        product.barcode,
        truncate(&product.description, 32),
        format_money(product.price, currency),
        product.commission,
        format_money(product.cost, currency),
        format_money(product.profit(), currency),
    )
}

/// 行をヘッダー順に `ヘッダー=値` で並べる
pub fn row_line(headers: &[String], row: &Row) -> String {
    headers
        .iter()
        .filter_map(|h| row.get(h).map(|v| format!("{}={}", h, v)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// 列マッピングの表示行（必須フィールドに * 印）
pub fn mapping_lines(mapping: &ColumnMapping) -> Vec<String> {
    ProductField::ALL
        .iter()
        .map(|field| {
            let mark = if field.is_required() { "*" } else { " " };
            let header = mapping.get(*field).unwrap_or("（未設定）");
            format!("{} {:<12} {:<16} → {}", mark, field.key(), field.label(), header)
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
