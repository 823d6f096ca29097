use crate::core::{ConfigProvider, QuoteMode};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_KEYWORD: &str = "mcts";
pub const DEFAULT_DETAIL_FILENAME: &str = "MCTS_articles.csv";
pub const DEFAULT_COUNTS_FILENAME: &str = "MCTS_year_counts.csv";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub report: ReportSection,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub keyword: String,
    pub output_path: String,
    pub detail_filename: String,
    pub counts_filename: String,
    pub quoting: Quoting,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            output_path: ".".to_string(),
            detail_filename: DEFAULT_DETAIL_FILENAME.to_string(),
            counts_filename: DEFAULT_COUNTS_FILENAME.to_string(),
            quoting: Quoting::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    #[default]
    Verbatim,
    Rfc4180,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl ReportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!("cannot read '{}': {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        let report = &self.report;
        validation::validate_non_empty_string("report.keyword", &report.keyword)?;
        validation::validate_path("report.output_path", &report.output_path)?;
        validation::validate_file_name("report.detail_filename", &report.detail_filename)?;
        validation::validate_file_name("report.counts_filename", &report.counts_filename)?;
        validation::validate_distinct(
            "report.detail_filename",
            &report.detail_filename,
            "report.counts_filename",
            &report.counts_filename,
        )
    }
}

impl ConfigProvider for ReportConfig {
    fn keyword(&self) -> &str {
        &self.report.keyword
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn detail_filename(&self) -> &str {
        &self.report.detail_filename
    }

    fn counts_filename(&self) -> &str {
        &self.report.counts_filename
    }

    fn quote_mode(&self) -> QuoteMode {
        match self.report.quoting {
            Quoting::Verbatim => QuoteMode::Verbatim,
            Quoting::Rfc4180 => QuoteMode::Rfc4180,
        }
    }
}
