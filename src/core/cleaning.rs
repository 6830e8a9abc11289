use crate::core::stats::{self, OrderedF64};
use crate::domain::model::{Cell, ColumnKind, Dataset, ProcessingReport};
use crate::domain::options::{ImputeStrategy, OutlierMethod, ProcessingOptions};

const IQR_FACTOR: f64 = 1.5;
const Z_SCORE_LIMIT: f64 = 3.0;
const LOWER_PERCENTILE: f64 = 0.01;
const UPPER_PERCENTILE: f64 = 0.99;

/// 清理資料：去重、數值補值、(可選) 移除離群值、類別補值
pub fn clean(dataset: &mut Dataset, options: &ProcessingOptions, report: &mut ProcessingReport) {
    tracing::info!("🧹 Cleaning data: removing duplicates and handling missing values");

    let duplicates = dataset.drop_duplicates();
    report.duplicates_removed += duplicates;
    tracing::debug!("Removed {} duplicate rows", duplicates);

    for name in dataset.names_of_kind(ColumnKind::Empty) {
        tracing::warn!("⚠️ Column '{}' has no values, leaving it untouched", name);
    }

    report.imputed_cells += impute_numeric(dataset, options.impute_strategy);

    if options.remove_outliers {
        let removed = remove_outliers(dataset, options.outlier_method);
        report.outliers_removed += removed;
        tracing::info!(
            "Removed {} outlier rows using {:?} method",
            removed,
            options.outlier_method
        );
    }

    report.imputed_cells += impute_categorical(dataset);
}

/// 依策略填補數值欄缺值，回傳填補的儲存格數
pub fn impute_numeric(dataset: &mut Dataset, strategy: ImputeStrategy) -> usize {
    let mut filled = 0;

    for column in dataset
        .columns
        .iter_mut()
        .filter(|c| c.kind == ColumnKind::Numeric)
    {
        if column.missing_count() == 0 {
            continue;
        }

        let present: Vec<f64> = column.numbers().collect();
        let fill = match strategy {
            ImputeStrategy::Mean => stats::mean(&present),
            ImputeStrategy::Median => stats::median(&present),
            ImputeStrategy::MostFrequent => {
                stats::most_frequent(present.iter().copied().map(OrderedF64)).map(|v| v.0)
            }
            ImputeStrategy::Constant => Some(0.0),
        };

        let Some(fill) = fill else { continue };
        tracing::debug!("Imputing '{}' with {:?} value {}", column.name, strategy, fill);

        for value in column.values.iter_mut().filter(|v| v.is_missing()) {
            *value = Cell::Number(fill);
            filled += 1;
        }
    }

    filled
}

/// 類別欄一律以最常見值填補
pub fn impute_categorical(dataset: &mut Dataset) -> usize {
    let mut filled = 0;

    for column in dataset
        .columns
        .iter_mut()
        .filter(|c| c.kind == ColumnKind::Categorical)
    {
        let fill = stats::most_frequent(column.values.iter().filter_map(|v| match v {
            Cell::Text(s) => Some(s.clone()),
            _ => None,
        }));

        let Some(fill) = fill else { continue };

        for value in column.values.iter_mut().filter(|v| v.is_missing()) {
            *value = Cell::Text(fill.clone());
            filled += 1;
        }
    }

    filled
}

/// 任一數值欄超出界線的列即移除，回傳移除列數
pub fn remove_outliers(dataset: &mut Dataset, method: OutlierMethod) -> usize {
    let rows = dataset.row_count();
    let mut keep = vec![true; rows];

    for column in dataset
        .columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
    {
        let present: Vec<f64> = column.numbers().collect();
        let Some(is_outlier) = outlier_test(&present, method) else {
            continue;
        };

        for (flag, value) in keep.iter_mut().zip(&column.values) {
            if let Some(v) = value.as_number() {
                if is_outlier(v) {
                    *flag = false;
                }
            }
        }
    }

    dataset.retain_rows(&keep)
}

fn outlier_test(values: &[f64], method: OutlierMethod) -> Option<Box<dyn Fn(f64) -> bool>> {
    match method {
        OutlierMethod::Iqr => {
            let q1 = stats::quantile(values, 0.25)?;
            let q3 = stats::quantile(values, 0.75)?;
            let iqr = q3 - q1;
            let (lower, upper) = (q1 - IQR_FACTOR * iqr, q3 + IQR_FACTOR * iqr);
            Some(Box::new(move |v| v < lower || v > upper))
        }
        OutlierMethod::ZScore => {
            let mean = stats::mean(values)?;
            let std = stats::population_std(values)?;
            if std == 0.0 {
                return Some(Box::new(|_| false));
            }
            Some(Box::new(move |v| ((v - mean) / std).abs() >= Z_SCORE_LIMIT))
        }
        OutlierMethod::Percentile => {
            let lower = stats::quantile(values, LOWER_PERCENTILE)?;
            let upper = stats::quantile(values, UPPER_PERCENTILE)?;
            Some(Box::new(move |v| v < lower || v > upper))
        }
    }
}
