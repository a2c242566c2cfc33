//! Product Ledger Common Library
//!
//! 商品リストの突き合わせエンジン（ファイルI/Oなし）

pub mod types;
pub mod error;
pub mod mapping;
pub mod normalizer;
pub mod store;
pub mod merge;
pub mod backup;
pub mod views;
pub mod broadcast;
pub mod links;

pub use types::{CellValue, Link, ListMap, ListName, Product, Row, SheetData};
pub use error::{Error, Result};
pub use mapping::{ColumnMapping, ProductField};
pub use normalizer::{normalize, parse_locale_decimal, parse_locale_number};
pub use store::{CollectionStore, ColumnMappings, ProductLists};
pub use merge::{BulkAddSummary, SnapshotSummary};
pub use backup::{decode_product_lists, parse_backup, BackupDocument, ImportedProducts, ImportedSnapshot};
pub use views::{favorites_across_all, table_filter, text_filter};
pub use links::validate_link;
