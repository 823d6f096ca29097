pub mod etl;
pub mod filter;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{Field, MatchRecord, PersonName, Publication, YearCounts};
pub use crate::domain::ports::{
    ConfigProvider, Pipeline, QuoteMode, RecordSource, ScanResult, ScanStats, Storage,
};
pub use crate::utils::error::Result;
