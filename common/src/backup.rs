//! バックアップ文書モジュール
//!
//! エクスポートは常に `productLists`（全リスト）と `links` の両方を出力する。
//! インポートは寛容に読み取り、形の崩れたサブ文書・エントリは
//! 「マージ対象なし」として捨てる。文書全体が読めない場合のみエラー。

use crate::error::{Error, Result};
use crate::normalizer::parse_locale_decimal;
use crate::store::{CollectionStore, ProductLists};
use crate::types::{CellValue, Link, ListMap, Product};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// エクスポート用のバックアップ文書
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub product_lists: ProductLists,
    pub links: Vec<Link>,
}

impl BackupDocument {
    pub fn from_store(store: &CollectionStore) -> Self {
        Self {
            product_lists: store.product_lists().clone(),
            links: store.links().to_vec(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// インポートされた商品エントリ（バーコードの無いものは除外済み）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedProducts {
    /// 取り込み可能な商品（文書内の順序）
    pub accepted: Vec<Product>,
    /// バーコードが無い・オブジェクトでない等で捨てたエントリ数
    pub dropped: usize,
}

/// 寛容に読み取ったインポート文書
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedSnapshot {
    /// `productLists` がオブジェクトとして存在した場合のみ `Some`
    pub product_lists: Option<ListMap<ImportedProducts>>,
    /// `links` が配列として存在した場合のみ `Some`
    pub links: Option<ImportedLinks>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedLinks {
    pub accepted: Vec<Link>,
    pub dropped: usize,
}

/// バックアップ文字列を解析する
///
/// JSONとして読めない、またはトップレベルがオブジェクトでない場合は
/// `InvalidBackupDocument`。それ以外の不整合はフィールド単位で吸収する。
pub fn parse_backup(text: &str) -> Result<ImportedSnapshot> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidBackupDocument(e.to_string()))?;

    let root = value
        .as_object()
        .ok_or_else(|| Error::InvalidBackupDocument("top level is not an object".into()))?;

    Ok(decode_snapshot(root))
}

fn decode_snapshot(root: &Map<String, Value>) -> ImportedSnapshot {
    let product_lists = root.get("productLists").and_then(decode_product_lists);

    let links = match root.get("links") {
        Some(Value::Array(entries)) => Some(decode_links(entries)),
        Some(other) => {
            log::warn!("links は配列ではありません: {}", type_name(other));
            None
        }
        None => None,
    };

    ImportedSnapshot { product_lists, links }
}

/// リストごとの商品配列を1件ずつ読み取る
///
/// オブジェクトでなければ `None`。配列でないリストは空、
/// 読めないエントリはそのエントリだけを捨てる。
pub fn decode_product_lists(value: &Value) -> Option<ListMap<ImportedProducts>> {
    let lists = match value {
        Value::Object(lists) => lists,
        other => {
            log::warn!("productLists はオブジェクトではありません: {}", type_name(other));
            return None;
        }
    };

    Some(ListMap::from_fn(|list| match lists.get(list.key()) {
        Some(Value::Array(entries)) => decode_products(entries),
        Some(Value::Null) | None => ImportedProducts::default(),
        Some(other) => {
            log::warn!("productLists.{} は配列ではありません: {}", list, type_name(other));
            ImportedProducts::default()
        }
    }))
}

fn decode_products(entries: &[Value]) -> ImportedProducts {
    let mut imported = ImportedProducts::default();

    for entry in entries {
        match entry.as_object().and_then(decode_product) {
            Some(product) => imported.accepted.push(product),
            None => imported.dropped += 1,
        }
    }

    imported
}

/// 1件の商品オブジェクトを読み取る。バーコードが無ければ `None`。
fn decode_product(obj: &Map<String, Value>) -> Option<Product> {
    let barcode = text_field(obj, "barcode").filter(|b| !b.is_empty())?;

    Some(Product {
        barcode,
        description: text_field(obj, "description").unwrap_or_default(),
        price: number_field(obj, "price"),
        commission: number_field(obj, "commission"),
        product_url: optional_field(obj, "productUrl"),
        photo1: optional_field(obj, "photo1"),
        photo2: optional_field(obj, "photo2"),
        photo3: optional_field(obj, "photo3"),
        cost: signed_number_field(obj, "cost"),
        is_favorite: obj.get("isFavorite").and_then(Value::as_bool).unwrap_or(false),
        data1: optional_field(obj, "data1"),
        data2: optional_field(obj, "data2"),
        data3: optional_field(obj, "data3"),
    })
}

fn decode_links(entries: &[Value]) -> ImportedLinks {
    let mut imported = ImportedLinks::default();

    for entry in entries {
        let link = entry.as_object().and_then(|obj| {
            let name = obj.get("name").and_then(Value::as_str).filter(|s| !s.is_empty())?;
            let url = obj.get("url").and_then(Value::as_str).filter(|s| !s.is_empty())?;
            Some(Link::new(name, url))
        });

        match link {
            Some(link) => imported.accepted.push(link),
            None => imported.dropped += 1,
        }
    }

    imported
}

/// 文字列または数値を文字列として読む
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => Some(CellValue::Number(f).to_string()),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

/// 空でない文字列のみ `Some`
fn optional_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    text_field(obj, key).filter(|s| !s.is_empty())
}

fn number_field(obj: &Map<String, Value>, key: &str) -> f64 {
    signed_number_field(obj, key).max(0.0)
}

/// 原価用。負の値も保持する。
fn signed_number_field(obj: &Map<String, Value>, key: &str) -> f64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_locale_decimal(s),
        _ => 0.0,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
