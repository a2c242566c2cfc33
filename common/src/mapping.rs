//! 列マッピングモジュール
//!
//! シートのヘッダー名を商品の論理フィールドに割り当てる。
//! 1つのヘッダーは同時に1つのフィールドにしか割り当てられない。

use serde::{Deserialize, Serialize};

/// 商品の論理フィールド（マッピング対象の11種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Barcode,
    Description,
    Price,
    Commission,
    ProductUrl,
    Photo1,
    Photo2,
    Photo3,
    Data1,
    Data2,
    Data3,
}

impl ProductField {
    pub const ALL: [ProductField; 11] = [
        ProductField::Barcode,
        ProductField::Description,
        ProductField::Price,
        ProductField::Commission,
        ProductField::ProductUrl,
        ProductField::Photo1,
        ProductField::Photo2,
        ProductField::Photo3,
        ProductField::Data1,
        ProductField::Data2,
        ProductField::Data3,
    ];

    /// 商品生成に必須のフィールド
    pub const REQUIRED: [ProductField; 4] = [
        ProductField::Barcode,
        ProductField::Description,
        ProductField::Price,
        ProductField::Commission,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ProductField::Barcode => "barcode",
            ProductField::Description => "description",
            ProductField::Price => "price",
            ProductField::Commission => "commission",
            ProductField::ProductUrl => "productUrl",
            ProductField::Photo1 => "photo1",
            ProductField::Photo2 => "photo2",
            ProductField::Photo3 => "photo3",
            ProductField::Data1 => "data1",
            ProductField::Data2 => "data2",
            ProductField::Data3 => "data3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductField::Barcode => "バーコード",
            ProductField::Description => "商品説明",
            ProductField::Price => "価格",
            ProductField::Commission => "手数料",
            ProductField::ProductUrl => "商品リンク",
            ProductField::Photo1 => "写真1（メイン）",
            ProductField::Photo2 => "写真2",
            ProductField::Photo3 => "写真3",
            ProductField::Data1 => "カスタムデータ1",
            ProductField::Data2 => "カスタムデータ2",
            ProductField::Data3 => "カスタムデータ3",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for ProductField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        ProductField::ALL
            .into_iter()
            .find(|field| field.key().to_lowercase() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown field: {}. Use one of: {}",
                    s,
                    ProductField::ALL.map(|f| f.key()).join(", ")
                )
            })
    }
}

/// 列マッピング（フィールド → ヘッダー名）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMapping {
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub commission: Option<String>,
    pub product_url: Option<String>,
    pub photo1: Option<String>,
    pub photo2: Option<String>,
    pub photo3: Option<String>,
    pub data1: Option<String>,
    pub data2: Option<String>,
    pub data3: Option<String>,
}

impl ColumnMapping {
    /// フィールドに割り当てられたヘッダー名
    pub fn get(&self, field: ProductField) -> Option<&str> {
        self.slot(field).as_deref().filter(|h| !h.is_empty())
    }

    fn slot(&self, field: ProductField) -> &Option<String> {
        match field {
            ProductField::Barcode => &self.barcode,
            ProductField::Description => &self.description,
            ProductField::Price => &self.price,
            ProductField::Commission => &self.commission,
            ProductField::ProductUrl => &self.product_url,
            ProductField::Photo1 => &self.photo1,
            ProductField::Photo2 => &self.photo2,
            ProductField::Photo3 => &self.photo3,
            ProductField::Data1 => &self.data1,
            ProductField::Data2 => &self.data2,
            ProductField::Data3 => &self.data3,
        }
    }

    fn slot_mut(&mut self, field: ProductField) -> &mut Option<String> {
        match field {
            ProductField::Barcode => &mut self.barcode,
            ProductField::Description => &mut self.description,
            ProductField::Price => &mut self.price,
            ProductField::Commission => &mut self.commission,
            ProductField::ProductUrl => &mut self.product_url,
            ProductField::Photo1 => &mut self.photo1,
            ProductField::Photo2 => &mut self.photo2,
            ProductField::Photo3 => &mut self.photo3,
            ProductField::Data1 => &mut self.data1,
            ProductField::Data2 => &mut self.data2,
            ProductField::Data3 => &mut self.data3,
        }
    }

    /// ヘッダーをフィールドに割り当てた新しいマッピングを返す
    ///
    /// 同じヘッダーを持っていた他のフィールドは未設定に戻る。
    /// `header` が `None` または空文字ならフィールドを未設定にする。
    pub fn assign(&self, field: ProductField, header: Option<&str>) -> Self {
        let mut next = self.clone();
        next.set_field(field, header);
        next
    }

    /// `assign` のインプレース版
    pub fn set_field(&mut self, field: ProductField, header: Option<&str>) {
        let header = header.filter(|h| !h.is_empty());

        if let Some(h) = header {
            for other in ProductField::ALL {
                let slot = self.slot_mut(other);
                if slot.as_deref() == Some(h) {
                    *slot = None;
                }
            }
        }

        *self.slot_mut(field) = header.map(str::to_string);
    }

    /// 必須4フィールドがすべて割り当て済みか
    pub fn is_complete(&self) -> bool {
        ProductField::REQUIRED.iter().all(|f| self.get(*f).is_some())
    }

    /// 未割り当ての必須フィールド
    pub fn missing_required(&self) -> Vec<ProductField> {
        ProductField::REQUIRED
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// 割り当て済みの (フィールド, ヘッダー) 一覧
    pub fn assigned(&self) -> Vec<(ProductField, &str)> {
        ProductField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|h| (f, h)))
            .collect()
    }
}
