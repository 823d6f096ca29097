use crate::domain::model::{MatchRecord, YearCounts};
use crate::domain::ports::QuoteMode;
use crate::utils::error::{EtlError, Result};
use std::borrow::Cow;
use std::io::Write;

pub const DETAIL_HEADER: &str = "Title,Authors,Year";
pub const COUNTS_HEADER: [&str; 2] = ["Year", "Count"];

/// Streams detail rows to `inner` as they are produced.
///
/// Title and Authors are always wrapped in double quotes and Year is written
/// bare. In [`QuoteMode::Verbatim`] embedded quotes and commas are left
/// untouched, so the output is not strictly CSV; [`QuoteMode::Rfc4180`]
/// doubles embedded quotes.
pub struct DetailReportWriter<W: Write> {
    inner: W,
    mode: QuoteMode,
    rows: usize,
}

impl<W: Write> DetailReportWriter<W> {
    pub fn new(mut inner: W, mode: QuoteMode) -> Result<Self> {
        writeln!(inner, "{}", DETAIL_HEADER)?;
        Ok(Self {
            inner,
            mode,
            rows: 0,
        })
    }

    pub fn write_record(&mut self, record: &MatchRecord) -> Result<()> {
        writeln!(
            self.inner,
            "\"{}\",\"{}\",{}",
            self.quote(&record.title),
            self.quote(&record.authors),
            record.year
        )?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn quote<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self.mode {
            QuoteMode::Verbatim => Cow::Borrowed(value),
            QuoteMode::Rfc4180 if value.contains('"') => Cow::Owned(value.replace('"', "\"\"")),
            QuoteMode::Rfc4180 => Cow::Borrowed(value),
        }
    }
}

/// Write the `Year,Count` report, ascending by year string.
pub fn write_year_counts<W: Write>(writer: W, counts: &YearCounts) -> Result<W> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(COUNTS_HEADER)?;
    for (year, count) in counts.iter() {
        csv_writer.write_record([year, count.to_string().as_str()])?;
    }

    csv_writer.flush()?;
    csv_writer.into_inner().map_err(|e| {
        EtlError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, authors: &str, year: &str) -> MatchRecord {
        MatchRecord {
            title: title.to_string(),
            authors: authors.to_string(),
            year: year.to_string(),
        }
    }

    fn render(mode: QuoteMode, records: &[MatchRecord]) -> String {
        let mut writer = DetailReportWriter::new(Vec::new(), mode).unwrap();
        for r in records {
            writer.write_record(r).unwrap();
        }
        assert_eq!(writer.rows(), records.len());
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_detail_header_only() {
        assert_eq!(render(QuoteMode::Verbatim, &[]), "Title,Authors,Year\n");
    }

    #[test]
    fn test_detail_rows() {
        let output = render(
            QuoteMode::Verbatim,
            &[
                record("MCTS for Go", "A. One;B. Two", "2015"),
                record("mcts survey", "", "2020"),
            ],
        );
        assert_eq!(
            output,
            "Title,Authors,Year\n\"MCTS for Go\",\"A. One;B. Two\",2015\n\"mcts survey\",\"\",2020\n"
        );
    }

    #[test]
    fn test_verbatim_mode_does_not_escape() {
        let output = render(
            QuoteMode::Verbatim,
            &[record("The \"MCTS\" trick, revisited", "O'Neil, J.", "0")],
        );
        assert_eq!(
            output.lines().nth(1),
            Some("\"The \"MCTS\" trick, revisited\",\"O'Neil, J.\",0")
        );
    }

    #[test]
    fn test_rfc4180_mode_doubles_quotes() {
        let output = render(
            QuoteMode::Rfc4180,
            &[record("The \"MCTS\" trick, revisited", "A. One", "2019")],
        );
        assert_eq!(
            output.lines().nth(1),
            Some("\"The \"\"MCTS\"\" trick, revisited\",\"A. One\",2019")
        );

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "The \"MCTS\" trick, revisited");
        assert_eq!(&rows[0][2], "2019");
    }

    #[test]
    fn test_year_counts_report() {
        let mut counts = YearCounts::new();
        for year in ["2020", "2015", "2015", "0"] {
            counts.increment(year);
        }

        let output = String::from_utf8(write_year_counts(Vec::new(), &counts).unwrap()).unwrap();
        assert_eq!(output, "Year,Count\n0,1\n2015,2\n2020,1\n");
    }

    #[test]
    fn test_year_counts_report_empty() {
        let output =
            String::from_utf8(write_year_counts(Vec::new(), &YearCounts::new()).unwrap()).unwrap();
        assert_eq!(output, "Year,Count\n");
    }
}
