use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Record source error: {message}")]
    SourceError { message: String },

    #[error("Failed to write report '{report}': {message}")]
    ReportError { report: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Source,
    Report,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn report(report: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        EtlError::ReportError {
            report: report.into(),
            message: cause.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::XmlError(_) | EtlError::SourceError { .. } => ErrorCategory::Source,
            EtlError::CsvError(_) | EtlError::ReportError { .. } => ErrorCategory::Report,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Report => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Source => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    /// 給操作人員的處理建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) => "Check that the input files exist and are readable",
            EtlError::XmlError(_) => {
                "Make sure the dblp XML file is complete and matches the given DTD"
            }
            EtlError::SourceError { .. } => "Verify the dblp XML and DTD file paths",
            EtlError::CsvError(_) | EtlError::ReportError { .. } => {
                "Check write permissions and free space in the output directory"
            }
            EtlError::ConfigError { .. } | EtlError::ConfigValidationError { .. } => {
                "Make sure the configuration file exists and is valid TOML format"
            }
            EtlError::InvalidConfigValueError { .. } => {
                "Fix the highlighted configuration value and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) => format!("Cannot read input: {}", e),
            EtlError::XmlError(e) => format!("Cannot parse dblp XML: {}", e),
            EtlError::SourceError { message } => format!("Cannot build record source: {}", message),
            EtlError::ReportError { report, message } => {
                format!("An error occurred while writing '{}': {}", report, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
