use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("ワークブック読み込みエラー: {0}")]
    WorkbookRead(String),

    #[error("ワークブックにシートがありません: {0}")]
    EmptyWorkbook(String),

    #[error("行が見つかりません: {0}行目")]
    RowNotFound(usize),

    #[error("リンクが見つかりません: {0}番")]
    LinkNotFound(usize),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error(transparent)]
    Engine(#[from] product_ledger_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
