//! 商品台帳の型定義
//!
//! CLIとエンジンで共有される型:
//! - ListName / ListMap: 固定のリスト集合と、リストごとの値
//! - CellValue / Row / SheetData: シートから読み込んだ生データ
//! - Product / Link: 永続化されるレコード

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 商品リストの識別子（固定4種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    #[default]
    Main,
    Data1,
    Data2,
    Data3,
}

impl ListName {
    /// 全リスト（走査順）
    pub const ALL: [ListName; 4] = [ListName::Main, ListName::Data1, ListName::Data2, ListName::Data3];

    /// 永続化・バックアップ文書で使うキー
    pub fn key(&self) -> &'static str {
        match self {
            ListName::Main => "main",
            ListName::Data1 => "data1",
            ListName::Data2 => "data2",
            ListName::Data3 => "data3",
        }
    }

    /// 表示名
    pub fn title(&self) -> &'static str {
        match self {
            ListName::Main => "メインリスト",
            ListName::Data1 => "データ1リスト",
            ListName::Data2 => "データ2リスト",
            ListName::Data3 => "データ3リスト",
        }
    }
}

impl std::fmt::Display for ListName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for ListName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "main" | "products" => Ok(ListName::Main),
            "data1" => Ok(ListName::Data1),
            "data2" => Ok(ListName::Data2),
            "data3" => Ok(ListName::Data3),
            _ => Err(format!("Unknown list: {}. Use main, data1, data2 or data3", s)),
        }
    }
}

/// リストごとに1つの値を持つ固定形のマップ
///
/// 欠けたキーは既定値で補完してデシリアライズする。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ListMap<T> {
    pub main: T,
    pub data1: T,
    pub data2: T,
    pub data3: T,
}

impl<T> ListMap<T> {
    /// リストごとに値を生成
    pub fn from_fn(mut f: impl FnMut(ListName) -> T) -> Self {
        Self {
            main: f(ListName::Main),
            data1: f(ListName::Data1),
            data2: f(ListName::Data2),
            data3: f(ListName::Data3),
        }
    }

    pub fn get(&self, list: ListName) -> &T {
        match list {
            ListName::Main => &self.main,
            ListName::Data1 => &self.data1,
            ListName::Data2 => &self.data2,
            ListName::Data3 => &self.data3,
        }
    }

    pub fn get_mut(&mut self, list: ListName) -> &mut T {
        match list {
            ListName::Main => &mut self.main,
            ListName::Data1 => &mut self.data1,
            ListName::Data2 => &mut self.data2,
            ListName::Data3 => &mut self.data3,
        }
    }

    /// `ListName::ALL` の順に走査
    pub fn iter(&self) -> impl Iterator<Item = (ListName, &T)> {
        ListName::ALL.into_iter().map(move |list| (list, self.get(list)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ListName, &mut T)> {
        [
            (ListName::Main, &mut self.main),
            (ListName::Data1, &mut self.data1),
            (ListName::Data2, &mut self.data2),
            (ListName::Data3, &mut self.data3),
        ]
        .into_iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(_, value)| value)
    }
}

/// セル値（文字列または数値）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// シートの1行（ヘッダー名 → セル値）。空セルはキー自体が存在しない。
pub type Row = HashMap<String, CellValue>;

/// 1シート分のデータ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    /// ヘッダー（列順）
    pub headers: Vec<String>,
    /// データ行（行順）
    pub rows: Vec<Row>,
}

/// 商品レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// リスト内で一意なキー
    pub barcode: String,
    pub description: String,
    pub price: f64,
    /// 手数料（%）
    pub commission: f64,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub photo1: Option<String>,
    #[serde(default)]
    pub photo2: Option<String>,
    #[serde(default)]
    pub photo3: Option<String>,
    /// 原価（ユーザー入力）
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub data1: Option<String>,
    #[serde(default)]
    pub data2: Option<String>,
    #[serde(default)]
    pub data3: Option<String>,
}

impl Product {
    pub fn new(barcode: impl Into<String>, description: impl Into<String>, price: f64, commission: f64) -> Self {
        Self {
            barcode: barcode.into(),
            description: description.into(),
            price,
            commission,
            product_url: None,
            photo1: None,
            photo2: None,
            photo3: None,
            cost: 0.0,
            is_favorite: false,
            data1: None,
            data2: None,
            data3: None,
        }
    }

    /// 利益 = 価格 - 手数料 - 原価
    pub fn profit(&self) -> f64 {
        self.price - (self.price * (self.commission / 100.0)) - self.cost
    }
}

/// ブックマークリンク
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
