use crate::core::csv_io::dataset_from_raw;
use crate::domain::model::Dataset;
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;

pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

pub fn is_spreadsheet(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 讀取活頁簿的第一個工作表，首列當作欄名
///
/// 格式 (xlsx / xls) 由檔案內容判斷，不看副檔名。儲存格先轉回文字，
/// 再交給和 CSV 相同的欄位型別推斷。
pub fn read_spreadsheet(source: &str, bytes: &[u8]) -> Result<Dataset> {
    let unreadable = |reason: String| EtlError::UnsupportedFileError {
        file: source.to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| unreadable(format!("Could not open spreadsheet: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("Workbook has no sheets".to_string()))?
        .map_err(|e| unreadable(format!("Could not read first sheet: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_text(cell).trim().to_string()).collect())
        .unwrap_or_default();

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (column, cell) in raw_columns.iter_mut().zip(row) {
            column.push(cell_text(cell));
        }
    }

    tracing::debug!(
        "Read {} spreadsheet rows from first sheet of {}",
        raw_columns.first().map_or(0, Vec::len),
        source
    );

    dataset_from_raw(headers, raw_columns)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
