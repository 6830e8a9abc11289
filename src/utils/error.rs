use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported file '{file}': {reason}")]
    UnsupportedFileError { file: String, reason: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Not found: {resource}")]
    NotFoundError { resource: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::CsvError(_)
            | EtlError::UnsupportedFileError { .. }
            | EtlError::ValidationError { .. }
            | EtlError::NotFoundError { .. } => ErrorCategory::Input,
            EtlError::ProcessingError { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於呼叫端輸入錯誤 (HTTP 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Configuration
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::CsvError(_) => "Check that the file is valid CSV/TSV with a header row",
            EtlError::UnsupportedFileError { .. } => "Upload a .csv, .tsv, .xlsx or .xls file",
            EtlError::NotFoundError { .. } => "Upload the file again and retry processing",
            EtlError::ValidationError { .. } => "Check the request parameters",
            EtlError::ProcessingError { .. } => "Inspect the input data for malformed rows",
            EtlError::IoError(_) | EtlError::ZipError(_) => {
                "Check disk space and permissions of the output directory"
            }
            EtlError::SerializationError(_) => "Report this issue with the input file attached",
            _ => "Review the configuration file and command line arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::CsvError(e) => format!("Could not read the data file: {}", e),
            EtlError::IoError(e) => format!("File system error: {}", e),
            EtlError::NotFoundError { resource } => format!("{} was not found", resource),
            EtlError::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for EtlError {
    fn from(e: toml::de::Error) -> Self {
        EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = EtlError::ValidationError {
            message: "bad".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_client_error());

        let err = EtlError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_not_found_message() {
        let err = EtlError::NotFoundError {
            resource: "processed_data.csv".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "processed_data.csv was not found");

        let err = EtlError::ValidationError {
            message: "No file uploaded".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "No file uploaded");
    }
}
