use crate::core::{Pipeline, RecordSource, ScanStats};
use crate::utils::error::{EtlError, Result};
use crate::utils::monitor::SystemMonitor;

/// Outcome of one run. Each report succeeds or fails on its own.
#[derive(Debug)]
pub struct RunSummary {
    pub stats: ScanStats,
    pub years: usize,
    pub detail_report: Result<String>,
    pub counts_report: Result<String>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.detail_report.is_ok() && self.counts_report.is_ok()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EtlError> {
        [&self.detail_report, &self.counts_report]
            .into_iter()
            .filter_map(|r| r.as_ref().err())
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self, source: &dyn RecordSource) -> RunSummary {
        tracing::info!(
            "Scanning {} publications...",
            source.number_of_publications()
        );
        self.monitor.log_stats("Scan start");

        // Extract + 明細報表
        let scan = self.pipeline.extract(source);
        tracing::info!(
            "Scanned {} publications, {} matched ({} without title, {} with empty title)",
            scan.stats.scanned,
            scan.stats.matched,
            scan.stats.missing_title,
            scan.stats.blank_title
        );
        match &scan.detail {
            Ok(path) => tracing::info!("📁 Detail report saved to: {}", path),
            Err(e) => tracing::error!("❌ Detail report failed: {}", e),
        }
        self.monitor.log_stats("Scan");

        // Load 年度統計
        let counts_report = self.pipeline.load(&scan.counts);
        match &counts_report {
            Ok(path) => tracing::info!(
                "📁 Year counts ({} years) saved to: {}",
                scan.counts.len(),
                path
            ),
            Err(e) => tracing::error!("❌ Year count report failed: {}", e),
        }
        self.monitor.log_final_stats();

        RunSummary {
            stats: scan.stats,
            years: scan.counts.len(),
            detail_report: scan.detail,
            counts_report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemorySource;
    use crate::core::{Publication, ScanResult, YearCounts};
    use std::cell::RefCell;

    /// Records the order of calls and the counts it was asked to load.
    struct RecordingPipeline {
        fail_detail: bool,
        loaded: RefCell<Option<YearCounts>>,
    }

    impl Pipeline for RecordingPipeline {
        fn extract(&self, source: &dyn RecordSource) -> ScanResult {
            let mut counts = YearCounts::new();
            let mut stats = ScanStats::default();
            for publ in source.publications() {
                stats.scanned += 1;
                stats.matched += 1;
                counts.increment(&publ.year().to_string());
            }
            let detail = if self.fail_detail {
                Err(EtlError::report("detail.csv", "read-only file system"))
            } else {
                Ok("detail.csv".to_string())
            };
            ScanResult {
                stats,
                counts,
                detail,
            }
        }

        fn load(&self, counts: &YearCounts) -> Result<String> {
            *self.loaded.borrow_mut() = Some(counts.clone());
            Ok("counts.csv".to_string())
        }
    }

    fn source() -> MemorySource {
        MemorySource::new(vec![
            Publication::new("a").with_title("x").with_year(2010),
            Publication::new("b").with_title("y").with_year(2012),
        ])
    }

    #[test]
    fn test_run_reports_both_outputs() {
        let engine = EtlEngine::new(RecordingPipeline {
            fail_detail: false,
            loaded: RefCell::new(None),
        });

        let summary = engine.run(&source());

        assert!(summary.is_success());
        assert_eq!(summary.stats.scanned, 2);
        assert_eq!(summary.years, 2);
        assert_eq!(summary.detail_report.as_deref().unwrap(), "detail.csv");
        assert_eq!(summary.counts_report.as_deref().unwrap(), "counts.csv");
        assert_eq!(summary.failures().count(), 0);
    }

    #[test]
    fn test_counts_report_runs_after_detail_failure() {
        let engine = EtlEngine::new(RecordingPipeline {
            fail_detail: true,
            loaded: RefCell::new(None),
        });

        let summary = engine.run(&source());

        assert!(!summary.is_success());
        assert!(summary.counts_report.is_ok());
        assert_eq!(summary.failures().count(), 1);
        let loaded = engine.pipeline().loaded.borrow().clone().unwrap();
        assert_eq!(loaded.total(), 2);
    }
}
