use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 讀入時視為缺值的字串 (比對前會先 trim)
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 輸出格式：整數值帶 `.0`，其餘為最短可還原表示
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
        }
    }

    fn key(&self) -> CellKey {
        match self {
            Cell::Missing => CellKey::Missing,
            // 0.0 與 -0.0 視為相同
            Cell::Number(n) => CellKey::Number(if *n == 0.0 { 0 } else { n.to_bits() }),
            Cell::Text(s) => CellKey::Text(s.clone()),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Missing,
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Cell>,
}

impl Column {
    /// 由原始字串建立欄位並推斷型別：所有非缺值皆可解析為數字時為數值欄
    pub fn from_raw(name: String, raw: Vec<String>) -> Self {
        let trimmed: Vec<Option<String>> = raw
            .into_iter()
            .map(|r| {
                let t = r.trim();
                (!MISSING_MARKERS.contains(&t)).then(|| t.to_string())
            })
            .collect();

        let parsed: Vec<Option<Option<f64>>> = trimmed
            .iter()
            .map(|v| {
                v.as_ref()
                    .map(|s| s.parse::<f64>().ok().filter(|n| n.is_finite()))
            })
            .collect();

        let has_value = parsed.iter().any(Option::is_some);
        let all_numeric = parsed.iter().all(|p| !matches!(p, Some(None)));

        let (kind, values) = if !has_value {
            (ColumnKind::Empty, vec![Cell::Missing; trimmed.len()])
        } else if all_numeric {
            let values = parsed
                .into_iter()
                .map(|p| p.flatten().map(Cell::Number).unwrap_or(Cell::Missing))
                .collect();
            (ColumnKind::Numeric, values)
        } else {
            let values = trimmed
                .into_iter()
                .map(|v| v.map(Cell::Text).unwrap_or(Cell::Missing))
                .collect();
            (ColumnKind::Categorical, values)
        };

        Self { name, kind, values }
    }

    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(Cell::as_number)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

/// 以欄為主的資料表；所有欄位長度一致並保留原始欄位順序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn row(&self, index: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    /// 只保留 `keep[i] == true` 的列，回傳被移除的列數
    pub fn retain_rows(&mut self, keep: &[bool]) -> usize {
        let before = self.row_count();
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&true));
        }
        before - self.row_count()
    }

    /// 移除與先前某列完全相同的列 (缺值視為相等)，保留第一次出現者
    pub fn drop_duplicates(&mut self) -> usize {
        let mut seen = HashSet::new();
        let keep: Vec<bool> = (0..self.row_count())
            .map(|i| {
                let key: Vec<CellKey> = self.columns.iter().map(|c| c.values[i].key()).collect();
                seen.insert(key)
            })
            .collect();
        self.retain_rows(&keep)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub source_file: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub duplicates_removed: usize,
    pub outliers_removed: usize,
    pub imputed_cells: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub empty_columns: Vec<String>,
    pub encoded_columns: Vec<String>,
    pub column_summaries: Vec<ColumnSummary>,
    pub processed_at: DateTime<Utc>,
}

impl ProcessingReport {
    pub fn new(source_file: impl Into<String>, dataset: &Dataset) -> Self {
        Self {
            source_file: source_file.into(),
            rows_in: dataset.row_count(),
            rows_out: dataset.row_count(),
            duplicates_removed: 0,
            outliers_removed: 0,
            imputed_cells: 0,
            numeric_columns: dataset.names_of_kind(ColumnKind::Numeric),
            categorical_columns: dataset.names_of_kind(ColumnKind::Categorical),
            empty_columns: dataset.names_of_kind(ColumnKind::Empty),
            encoded_columns: Vec::new(),
            column_summaries: Vec::new(),
            processed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub dataset: Dataset,
    pub report: ProcessingReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, raw: &[&str]) -> Column {
        Column::from_raw(name.to_string(), raw.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_missing_markers_and_trimming() {
        let col = column("city", &["", "  NA ", "null", " Taipei "]);
        assert_eq!(col.kind, ColumnKind::Categorical);
        assert_eq!(col.missing_count(), 3);
        assert_eq!(col.values[3], Cell::Text("Taipei".to_string()));

        let col = column("score", &["3.5", "N/A", "-1"]);
        assert_eq!(col.values, vec![Cell::Number(3.5), Cell::Missing, Cell::Number(-1.0)]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(-2.0), "-2.0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.224744871391589), "1.224744871391589");
    }

    #[test]
    fn test_column_kind_inference() {
        assert_eq!(column("age", &["1", "", "3"]).kind, ColumnKind::Numeric);
        assert_eq!(column("city", &["1", "Taipei"]).kind, ColumnKind::Categorical);
        assert_eq!(column("notes", &["", "NA"]).kind, ColumnKind::Empty);

        let mixed = column("code", &["007", "A1"]);
        assert_eq!(mixed.values[0], Cell::Text("007".to_string()));
    }

    #[test]
    fn test_drop_duplicates_keeps_first_and_treats_missing_equal() {
        let mut dataset = Dataset::new(vec![
            column("id", &["1", "1", "2", "", ""]),
            column("city", &["A", "A", "B", "", "NA"]),
        ]);

        let removed = dataset.drop_duplicates();

        assert_eq!(removed, 2);
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.columns[0].values[2], Cell::Missing);
    }

    #[test]
    fn test_retain_rows() {
        let mut dataset = Dataset::new(vec![column("x", &["1", "2", "3"])]);
        let removed = dataset.retain_rows(&[true, false, true]);
        assert_eq!(removed, 1);
        assert_eq!(
            dataset.columns[0].numbers().collect::<Vec<_>>(),
            vec![1.0, 3.0]
        );
    }
}
