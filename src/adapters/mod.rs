// Adapters layer: concrete record sources and report storage.

pub mod dblp_xml;
pub mod memory;
pub mod storage;
