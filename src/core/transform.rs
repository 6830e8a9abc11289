use crate::core::cleaning;
use crate::core::stats;
use crate::domain::model::{Cell, Column, ColumnKind, ColumnSummary, Dataset, ProcessingReport};
use crate::domain::options::{Encoding, ProcessingOptions, Scaling};
use std::collections::BTreeSet;

/// 轉換資料：再次去重與補值、數值縮放、類別編碼
pub fn transform(
    dataset: &mut Dataset,
    options: &ProcessingOptions,
    report: &mut ProcessingReport,
) {
    tracing::info!("🔄 Transforming data");

    // 補值後可能出現新的重複列
    report.duplicates_removed += dataset.drop_duplicates();
    report.imputed_cells += cleaning::impute_numeric(dataset, options.impute_strategy);

    report.column_summaries = summarize(dataset);

    scale(dataset, options.scaling);

    if options.encoding == Encoding::Onehot {
        report.encoded_columns = one_hot_encode(dataset);
    }
}

/// 數值欄的描述統計 (縮放前)
pub fn summarize(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .filter_map(|column| {
            let values: Vec<f64> = column.numbers().collect();
            let (min, max) = stats::min_max(&values)?;
            Some(ColumnSummary {
                name: column.name.clone(),
                count: values.len(),
                mean: stats::mean(&values)?,
                std: stats::population_std(&values)?,
                min,
                max,
            })
        })
        .collect()
}

pub fn scale(dataset: &mut Dataset, scaling: Scaling) {
    if scaling == Scaling::None {
        return;
    }

    for column in dataset
        .columns
        .iter_mut()
        .filter(|c| c.kind == ColumnKind::Numeric)
    {
        let values: Vec<f64> = column.numbers().collect();
        let params = match scaling {
            Scaling::Standard => stats::mean(&values)
                .zip(stats::population_std(&values))
                .map(|(mean, std)| (mean, non_zero(std))),
            Scaling::Minmax => stats::min_max(&values).map(|(min, max)| (min, non_zero(max - min))),
            Scaling::None => None,
        };

        let Some((offset, divisor)) = params else {
            continue;
        };

        for value in column.values.iter_mut() {
            if let Cell::Number(n) = value {
                *n = (*n - offset) / divisor;
            }
        }
    }
}

fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

/// 類別欄展開為 `{column}_{category}` 的 0/1 欄位並附加在最後，回傳新欄名
pub fn one_hot_encode(dataset: &mut Dataset) -> Vec<String> {
    let (categorical, mut kept): (Vec<Column>, Vec<Column>) = dataset
        .columns
        .drain(..)
        .partition(|c| c.kind == ColumnKind::Categorical);

    let mut encoded_names = Vec::new();

    for column in categorical {
        let categories: BTreeSet<&str> = column
            .values
            .iter()
            .filter_map(|v| match v {
                Cell::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();

        for category in categories {
            let name = format!("{}_{}", column.name, category);
            let values = column
                .values
                .iter()
                .map(|v| match v {
                    Cell::Text(s) if s == category => Cell::Number(1.0),
                    _ => Cell::Number(0.0),
                })
                .collect();

            encoded_names.push(name.clone());
            kept.push(Column {
                name,
                kind: ColumnKind::Numeric,
                values,
            });
        }
    }

    dataset.columns = kept;
    encoded_names
}
