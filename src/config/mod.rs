pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, ProcessingOptions};
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
use crate::domain::options::{Encoding, ImputeStrategy, OutlierMethod, Scaling};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "tidy-etl")]
#[command(about = "Clean and transform a CSV/TSV file")]
pub struct CliConfig {
    /// Input CSV or TSV file
    #[arg(long, short)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_enum, default_value_t = ImputeStrategy::Mean)]
    pub impute_strategy: ImputeStrategy,

    #[arg(long, help = "Drop rows containing numeric outliers")]
    pub remove_outliers: bool,

    #[arg(long, value_enum, default_value_t = OutlierMethod::Iqr)]
    pub outlier_method: OutlierMethod,

    #[arg(long, value_enum, default_value_t = Scaling::Standard)]
    pub scaling: Scaling,

    #[arg(long, value_enum, default_value_t = Encoding::Onehot)]
    pub encoding: Encoding,

    #[arg(long, help = "Also write a zip bundle with CSV, TSV and the JSON report")]
    pub bundle: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_file(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn options(&self) -> ProcessingOptions {
        ProcessingOptions {
            impute_strategy: self.impute_strategy,
            remove_outliers: self.remove_outliers,
            outlier_method: self.outlier_method,
            scaling: self.scaling,
            encoding: self.encoding,
        }
    }

    fn bundle_output(&self) -> bool {
        self.bundle
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension(&self.input, validation::SUPPORTED_INPUT_EXTENSIONS)?;
        validation::validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}

/// 伺服器端單次處理請求的設定：輸入與輸出都在上傳目錄內
#[derive(Debug, Clone)]
pub struct ProcessJob {
    pub input_file: String,
    pub output_path: String,
    pub options: ProcessingOptions,
}

impl ConfigProvider for ProcessJob {
    fn input_file(&self) -> &str {
        &self.input_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn options(&self) -> ProcessingOptions {
        self.options
    }
}

impl Validate for ProcessJob {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_file_name("file_path", &self.input_file)?;
        validation::validate_file_extension(&self.input_file, validation::SUPPORTED_INPUT_EXTENSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(input: &str) -> ProcessJob {
        ProcessJob {
            input_file: input.to_string(),
            output_path: "uploads".to_string(),
            options: ProcessingOptions::default(),
        }
    }

    #[test]
    fn test_process_job_validation() {
        assert!(job("3f2a_sales.csv").validate().is_ok());
        assert!(job("../etc/passwd.csv").validate().is_err());
        assert!(job("nested/sales.csv").validate().is_err());
        assert!(job("sales.xlsx").validate().is_ok());
        assert!(job("sales.json").validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_config_parsing() {
        let config = CliConfig::parse_from([
            "tidy-etl",
            "--input",
            "data.tsv",
            "--remove-outliers",
            "--outlier-method",
            "z-score",
            "--impute-strategy",
            "most-frequent",
            "--scaling",
            "minmax",
        ]);

        assert!(config.validate().is_ok());
        let options = config.options();
        assert!(options.remove_outliers);
        assert_eq!(options.outlier_method, OutlierMethod::ZScore);
        assert_eq!(options.impute_strategy, ImputeStrategy::MostFrequent);
        assert_eq!(options.scaling, Scaling::Minmax);
        assert_eq!(options.encoding, Encoding::Onehot);
        assert_eq!(config.output_path, "./output");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_config_rejects_unknown_format() {
        let config = CliConfig::parse_from(["tidy-etl", "--input", "data.json"]);
        assert!(config.validate().is_err());
    }
}
