//! シート読み込みモジュール
//!
//! calamine でワークブックを開き、シートごとにヘッダーと行を取り出す。
//!
//! - 1行目をヘッダーとして扱う
//! - 空セルは行のキーに含めない
//! - すべて空の行は読み飛ばす

use crate::error::{LedgerError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use product_ledger_common::{CellValue, Row, SheetData};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 読み込んだワークブック
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// シート名（ブック内の順序）
    pub sheet_names: Vec<String>,
    sheets: HashMap<String, SheetData>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Result<&SheetData> {
        self.sheets
            .get(name)
            .ok_or_else(|| LedgerError::SheetNotFound(name.to_string()))
    }

    /// 名前指定があればそのシート、なければ先頭シート
    pub fn sheet_or_first(&self, name: Option<&str>) -> Result<(&str, &SheetData)> {
        let name = match name {
            Some(n) => n,
            None => self
                .sheet_names
                .first()
                .map(String::as_str)
                .ok_or_else(|| LedgerError::EmptyWorkbook(String::new()))?,
        };
        self.sheets
            .get_key_value(name)
            .map(|(name, sheet)| (name.as_str(), sheet))
            .ok_or_else(|| LedgerError::SheetNotFound(name.to_string()))
    }
}

/// ワークブックファイルを読み込む（xlsx/xls/xlsb/ods）
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(LedgerError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LedgerError::WorkbookRead(format!("{}: {}", path.display(), e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(LedgerError::EmptyWorkbook(path.display().to_string()));
    }

    let mut sheets = HashMap::new();
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| LedgerError::WorkbookRead(format!("{}: {}", name, e)))?;

        let grid: Vec<Vec<Option<CellValue>>> = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();

        let sheet = sheet_from_grid(grid);
        log::debug!("シート {}: {}列 {}行", name, sheet.headers.len(), sheet.rows.len());
        sheets.insert(name.clone(), sheet);
    }

    Ok(Workbook { sheet_names, sheets })
}

fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Text(b.to_string())),
        Data::DateTime(d) => Some(CellValue::Number(d.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        _ => None,
    }
}

/// セル格子から SheetData を組み立てる（1行目はヘッダー）
pub fn sheet_from_grid(grid: Vec<Vec<Option<CellValue>>>) -> SheetData {
    let mut lines = grid.into_iter();

    let Some(header_line) = lines.next() else {
        return SheetData::default();
    };
    let headers = unique_headers(&header_line);

    let rows: Vec<Row> = lines
        .filter_map(|line| {
            let row: Row = line
                .into_iter()
                .zip(&headers)
                .filter_map(|(cell, header)| cell.map(|value| (header.clone(), value)))
                .collect();
            if row.is_empty() {
                None
            } else {
                Some(row)
            }
        })
        .collect();

    if rows.is_empty() {
        return SheetData::default();
    }

    SheetData { headers, rows }
}

/// ヘッダー名を確定する
///
/// 空のヘッダーは `__EMPTY`, `__EMPTY_1`, ...、重複は `名前_1`, `名前_2` ...
fn unique_headers(cells: &[Option<CellValue>]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(cells.len());

    for cell in cells {
        let base = match cell {
            Some(value) => value.to_string(),
            None => "__EMPTY".to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while used.contains(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        used.insert(name.clone());
        headers.push(name);
    }

    headers
}
