//! 商品正規化モジュール
//!
//! シートの1行と列マッピングから商品レコードを組み立てる。
//! セル単位の不正値は既定値に置き換え、行全体を失敗させない。

use crate::mapping::{ColumnMapping, ProductField};
use crate::types::{CellValue, Product, Row};
use regex::Regex;

/// 行を商品に変換する
///
/// マッピングが不完全な場合、またはバーコードのセルが空の場合は `None`。
/// `cost` / `is_favorite` は常に初期値（行からは導出しない）。
pub fn normalize(row: &Row, mapping: &ColumnMapping) -> Option<Product> {
    if !mapping.is_complete() {
        return None;
    }

    let barcode = cell_text(row, mapping.get(ProductField::Barcode)?)?;
    if barcode.trim().is_empty() {
        return None;
    }

    let description = mapping
        .get(ProductField::Description)
        .and_then(|h| cell_text(row, h))
        .unwrap_or_default();

    let optional = |field: ProductField| mapping.get(field).and_then(|h| cell_text(row, h));

    Some(Product {
        barcode,
        description,
        price: cell_number(row, mapping.get(ProductField::Price)),
        commission: cell_number(row, mapping.get(ProductField::Commission)),
        product_url: optional(ProductField::ProductUrl),
        photo1: optional(ProductField::Photo1),
        photo2: optional(ProductField::Photo2),
        photo3: optional(ProductField::Photo3),
        cost: 0.0,
        is_favorite: false,
        data1: optional(ProductField::Data1),
        data2: optional(ProductField::Data2),
        data3: optional(ProductField::Data3),
    })
}

fn cell_text(row: &Row, header: &str) -> Option<String> {
    row.get(header).map(CellValue::to_string)
}

fn cell_number(row: &Row, header: Option<&str>) -> f64 {
    match header.and_then(|h| row.get(h)) {
        Some(&CellValue::Number(n)) if n.is_finite() => n.max(0.0),
        Some(value) => parse_locale_number(&value.to_string()),
        None => 0.0,
    }
}

/// ロケール表記の小数を解析する
///
/// 最初のカンマだけを小数点に置き換え、先頭の数値部分を読み取る。
/// 数値として読めない、有限でない、負の値はすべて 0。
pub fn parse_locale_number(text: &str) -> f64 {
    parse_locale_decimal(text).max(0.0)
}

/// `parse_locale_number` の符号付き版（原価入力用）
///
/// 読めない・有限でない値は 0。負の値はそのまま返す。
pub fn parse_locale_decimal(text: &str) -> f64 {
    lazy_static::lazy_static! {
        static ref NUMBER_PREFIX_RE: Regex =
            Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
    }

    let fixed = text.replacen(',', ".", 1);
    let trimmed = fixed.trim_start();

    NUMBER_PREFIX_RE
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> ColumnMapping {
        ColumnMapping::default()
            .assign(ProductField::Barcode, Some("Barkod"))
            .assign(ProductField::Description, Some("Açıklama"))
            .assign(ProductField::Price, Some("Fiyat"))
            .assign(ProductField::Commission, Some("Komisyon"))
    }

    fn row(cells: &[(&str, CellValue)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_locale_number() {
        assert_eq!(parse_locale_number("12,50"), 12.5);
        assert_eq!(parse_locale_number("12.50"), 12.5);
        assert_eq!(parse_locale_number("  7"), 7.0);
        assert_eq!(parse_locale_number("15,5 TL"), 15.5);
        assert_eq!(parse_locale_number("1e2"), 100.0);
        assert_eq!(parse_locale_number(".5"), 0.5);
    }

    #[test]
    fn test_parse_locale_number_only_first_comma() {
        // 1.234,56 → 1.234.56 → 先頭の 1.234
        assert_eq!(parse_locale_number("1.234,56"), 1.234);
        assert_eq!(parse_locale_number("1,234,56"), 1.234);
    }

    #[test]
    fn test_parse_locale_number_invalid_is_zero() {
        assert_eq!(parse_locale_number("abc"), 0.0);
        assert_eq!(parse_locale_number(""), 0.0);
        assert_eq!(parse_locale_number("-"), 0.0);
        assert_eq!(parse_locale_number("-5"), 0.0);
    }

    #[test]
    fn test_parse_locale_decimal_keeps_sign() {
        assert_eq!(parse_locale_decimal("-5"), -5.0);
        assert_eq!(parse_locale_decimal("-12,75"), -12.75);
        assert_eq!(parse_locale_decimal("3,5"), 3.5);
        assert_eq!(parse_locale_decimal("abc"), 0.0);
        assert_eq!(parse_locale_decimal("1e400"), 0.0);
    }

    #[test]
    fn test_normalize_basic() {
        let r = row(&[
            ("Barkod", CellValue::Number(8690001.0)),
            ("Açıklama", "Kalem".into()),
            ("Fiyat", "12,50".into()),
            ("Komisyon", CellValue::Number(15.0)),
        ]);

        let product = normalize(&r, &mapping()).unwrap();
        assert_eq!(product.barcode, "8690001");
        assert_eq!(product.description, "Kalem");
        assert_eq!(product.price, 12.5);
        assert_eq!(product.commission, 15.0);
        assert_eq!(product.cost, 0.0);
        assert!(!product.is_favorite);
        assert_eq!(product.product_url, None);
    }

    #[test]
    fn test_normalize_non_numeric_price_defaults_to_zero() {
        let r = row(&[
            ("Barkod", "A1".into()),
            ("Açıklama", "Defter".into()),
            ("Fiyat", "abc".into()),
            ("Komisyon", "yok".into()),
        ]);

        let product = normalize(&r, &mapping()).unwrap();
        assert_eq!(product.price, 0.0);
        assert_eq!(product.commission, 0.0);
    }

    #[test]
    fn test_normalize_incomplete_mapping() {
        let r = row(&[("Barkod", "A1".into())]);
        let incomplete = mapping().assign(ProductField::Commission, None);
        assert!(normalize(&r, &incomplete).is_none());
    }

    #[test]
    fn test_normalize_blank_barcode() {
        let r = row(&[("Barkod", "  ".into()), ("Açıklama", "Kalem".into())]);
        assert!(normalize(&r, &mapping()).is_none());

        let missing = row(&[("Açıklama", "Kalem".into())]);
        assert!(normalize(&missing, &mapping()).is_none());
    }

    #[test]
    fn test_normalize_optional_fields() {
        let mapping = mapping()
            .assign(ProductField::Photo1, Some("Resim"))
            .assign(ProductField::Data2, Some("Renk"));
        let r = row(&[
            ("Barkod", "A1".into()),
            ("Açıklama", "Kalem".into()),
            ("Fiyat", CellValue::Number(3.0)),
            ("Komisyon", CellValue::Number(1.0)),
            ("Resim", "https://img.example/a.jpg".into()),
        ]);

        let product = normalize(&r, &mapping).unwrap();
        assert_eq!(product.photo1.as_deref(), Some("https://img.example/a.jpg"));
        // マッピング済みでもセルが無ければ None
        assert_eq!(product.data2, None);
        // 未マッピングは None
        assert_eq!(product.photo2, None);
    }

    #[test]
    fn test_normalize_missing_description_and_price() {
        let r = row(&[("Barkod", "A1".into())]);
        let product = normalize(&r, &mapping()).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.price, 0.0);
    }
}
