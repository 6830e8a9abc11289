use crate::domain::model::{Cell, Column, Dataset};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// 依副檔名決定分隔符號：`.tsv` 用 tab，其餘用逗號
pub fn delimiter_for(path: &str) -> u8 {
    match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

pub fn read_dataset(bytes: &[u8], delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in raw_columns.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    dataset_from_raw(headers, raw_columns)
}

/// 由欄名與原始字串組成 dataset，欄名全空視為使用者上傳了無效檔案
pub fn dataset_from_raw(headers: Vec<String>, raw_columns: Vec<Vec<String>>) -> Result<Dataset> {
    if headers.iter().all(String::is_empty) {
        return Err(EtlError::ValidationError {
            message: "Input file has no header row".to_string(),
        });
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| Column::from_raw(name, raw))
        .collect();

    Ok(Dataset::new(columns))
}

pub fn write_dataset(dataset: &Dataset, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(dataset.column_names())?;
    for i in 0..dataset.row_count() {
        writer.write_record(dataset.row(i).into_iter().map(Cell::render))?;
    }

    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}
