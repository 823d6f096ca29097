pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{dblp_xml::DblpXmlSource, memory::MemorySource, storage::LocalStorage};
pub use crate::config::ReportConfig;
pub use crate::core::{etl::EtlEngine, etl::RunSummary, pipeline::KeywordPipeline};
pub use crate::utils::error::{EtlError, Result};
