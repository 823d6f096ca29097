use crate::domain::model::{Publication, YearCounts};
use crate::utils::error::Result;
use std::io::Write;

/// Read-only view over a materialized bibliography.
pub trait RecordSource {
    /// Single pass over every publication, in source order.
    fn publications(&self) -> Box<dyn Iterator<Item = &Publication> + '_>;
    fn number_of_publications(&self) -> usize;
    fn number_of_persons(&self) -> usize;
}

pub trait Storage {
    type Writer: Write;

    /// Create or truncate the named report file.
    fn create(&self, name: &str) -> Result<Self::Writer>;
    fn location(&self, name: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteMode {
    /// Title and Authors wrapped in quotes, embedded quotes left as-is
    #[default]
    Verbatim,
    /// Embedded quotes doubled
    Rfc4180,
}

pub trait ConfigProvider {
    fn keyword(&self) -> &str;
    fn output_path(&self) -> &str;
    fn detail_filename(&self) -> &str;
    fn counts_filename(&self) -> &str;
    fn quote_mode(&self) -> QuoteMode;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub scanned: usize,
    pub matched: usize,
    pub missing_title: usize,
    pub blank_title: usize,
}

#[derive(Debug)]
pub struct ScanResult {
    pub stats: ScanStats,
    pub counts: YearCounts,
    /// Location of the detail report, or why it could not be completed
    pub detail: Result<String>,
}

pub trait Pipeline {
    fn extract(&self, source: &dyn RecordSource) -> ScanResult;
    fn load(&self, counts: &YearCounts) -> Result<String>;
}
