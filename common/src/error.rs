//! エラー型定義

use thiserror::Error;

/// エンジン共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Column mapping incomplete: barcode, description, price and commission must be mapped")]
    MappingIncomplete,

    #[error("Duplicate barcode in target list: {0}")]
    DuplicateBarcode(String),

    #[error("Row has an empty barcode cell")]
    EmptyBarcode,

    #[error("Invalid backup document: {0}")]
    InvalidBackupDocument(String),

    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("Link not found at index {0}")]
    LinkNotFound(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
