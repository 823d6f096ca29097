use crate::core::filter::{TitleFilter, TitleMatch};
use crate::core::report::{write_year_counts, DetailReportWriter};
use crate::core::{
    ConfigProvider, MatchRecord, Pipeline, RecordSource, ScanResult, ScanStats, Storage,
    YearCounts,
};
use crate::utils::error::{EtlError, Result};

/// Keyword search over publication titles, exported as two CSV reports.
pub struct KeywordPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> KeywordPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn open_detail_report(&self, name: &str) -> Result<DetailReportWriter<S::Writer>> {
        self.storage
            .create(name)
            .and_then(|writer| DetailReportWriter::new(writer, self.config.quote_mode()))
            .map_err(|e| EtlError::report(name, e))
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for KeywordPipeline<S, C> {
    fn extract(&self, source: &dyn RecordSource) -> ScanResult {
        let filter = TitleFilter::new(self.config.keyword());
        let report = self.config.detail_filename();
        let mut stats = ScanStats::default();
        let mut counts = YearCounts::new();

        tracing::debug!("Scanning titles for keyword '{}'", filter.keyword());

        let mut detail = self.open_detail_report(report);
        if let Err(e) = &detail {
            tracing::error!("❌ {}", e);
        }

        for publication in source.publications() {
            stats.scanned += 1;

            let title = match filter.evaluate(publication) {
                TitleMatch::Matched(title) => title,
                TitleMatch::NoMatch => continue,
                TitleMatch::NoTitleField => {
                    stats.missing_title += 1;
                    tracing::debug!("No title field found for publication {}", publication.key);
                    continue;
                }
                TitleMatch::BlankTitle => {
                    stats.blank_title += 1;
                    tracing::debug!("Title field empty for publication {}", publication.key);
                    continue;
                }
            };

            let record = MatchRecord::from_publication(title, publication);
            counts.increment(&record.year);
            stats.matched += 1;

            // 報表寫入失敗後只停止這份報表，統計照常進行
            let failure = match detail.as_mut() {
                Ok(writer) => writer.write_record(&record).err(),
                Err(_) => None,
            };
            if let Some(e) = failure {
                let e = EtlError::report(report, e);
                tracing::error!("❌ {}; no further rows will be written", e);
                detail = Err(e);
            }
        }

        let detail = detail.and_then(|writer| {
            let rows = writer.rows();
            writer.finish().map_err(|e| EtlError::report(report, e))?;
            tracing::debug!("Wrote {} rows to {}", rows, report);
            Ok(self.storage.location(report))
        });

        ScanResult {
            stats,
            counts,
            detail,
        }
    }

    fn load(&self, counts: &YearCounts) -> Result<String> {
        let name = self.config.counts_filename();

        tracing::debug!("Writing {} year rows to {}", counts.len(), name);
        let writer = self
            .storage
            .create(name)
            .map_err(|e| EtlError::report(name, e))?;
        write_year_counts(writer, counts).map_err(|e| EtlError::report(name, e))?;

        Ok(self.storage.location(name))
    }
}
