use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    #[default]
    Mean,
    Median,
    MostFrequent,
    /// 以 0 填補
    Constant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutlierMethod {
    #[default]
    #[serde(rename = "IQR", alias = "iqr")]
    #[cfg_attr(feature = "cli", value(name = "iqr", alias = "IQR"))]
    Iqr,
    #[serde(rename = "Z-score", alias = "z-score", alias = "zscore")]
    #[cfg_attr(feature = "cli", value(name = "z-score", alias = "zscore"))]
    ZScore,
    #[serde(rename = "percentile")]
    Percentile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    #[default]
    Standard,
    #[serde(alias = "min_max")]
    Minmax,
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    #[serde(alias = "one_hot")]
    Onehot,
    None,
}

/// 清理與轉換步驟的參數；未指定的欄位使用預設值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    pub impute_strategy: ImputeStrategy,
    pub remove_outliers: bool,
    pub outlier_method: OutlierMethod,
    pub scaling: Scaling,
    pub encoding: Encoding,
}
