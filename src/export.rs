//! Multi-window export: runs the fetch engine over every month of every year
//! and writes the results as CSV rows

use crate::date::DateWindow;
use crate::error::{Error, Result};
use crate::search::{ArticleSearch, PageBatch};
use crate::stats::RunContext;
use std::io::Write;
use tracing::{error, info, warn};

/// Which monthly windows to export, year-major in the given order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportPlan {
    /// Years, in request order
    pub years: Vec<u32>,
    /// Months (1..=12), in request order
    pub months: Vec<u32>,
}

impl ExportPlan {
    /// Windows for every (year, month) pair, years outermost
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMonth`] for a month outside 1..=12.
    pub fn windows(&self) -> Result<Vec<DateWindow>> {
        let mut windows = Vec::with_capacity(self.years.len() * self.months.len());
        for &year in &self.years {
            for &month in &self.months {
                windows.push(DateWindow::month(year, month)?);
            }
        }
        Ok(windows)
    }
}

/// Writes each page as `pub_date,web_url,headline` rows, flushing per page
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl<W: Write> CsvSink<W> {
    /// Wrap an output stream. No header row is written.
    pub fn new(output: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(output);
        Self { writer, rows: 0 }
    }

    /// Write one page and flush it to the underlying stream
    pub fn write_batch(&mut self, batch: PageBatch) -> Result<()> {
        for result in batch {
            self.writer
                .write_record([&result.pub_date, &result.web_url, &result.headline])?;
            self.rows += 1;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and return the underlying stream
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }

    /// Flush after an export, keeping the export error when both fail
    pub fn finish(self, outcome: Result<()>) -> Result<W> {
        let flushed = self.into_inner();
        match outcome {
            Ok(()) => flushed,
            Err(e) => {
                if let Err(flush) = flushed {
                    warn!(error = %flush, "final flush failed");
                }
                Err(e)
            }
        }
    }
}

/// Fetch every window of `plan` in order, delivering each page to `sink`
///
/// Stops at the first failing window and returns its error wrapped in
/// [`Error::Window`]. Pages of earlier windows (and earlier pages of the
/// failing window) have already been handed to the sink; later windows are
/// never requested.
pub async fn run<F, E>(
    search: &ArticleSearch,
    ctx: &mut RunContext,
    api_key: &str,
    query: &str,
    plan: &ExportPlan,
    mut sink: F,
) -> Result<()>
where
    F: FnMut(PageBatch) -> std::result::Result<(), E>,
    E: Into<crate::error::SinkError>,
{
    let windows = plan.windows()?;
    info!(windows = windows.len(), query, "starting export");

    for window in windows {
        if let Err(e) = search
            .fetch_articles(ctx, api_key, query, &window, &mut sink)
            .await
        {
            error!(%window, error = %e, "fetch error");
            return Err(Error::Window {
                window,
                source: Box::new(e),
            });
        }
    }

    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchResult;

    fn result(n: u32, headline: &str) -> SearchResult {
        SearchResult {
            pub_date: format!("2016-02-0{n}T05:00:00+0000"),
            web_url: format!("https://www.nytimes.com/{n}.html"),
            headline: headline.to_string(),
        }
    }

    #[test]
    fn test_plan_is_year_major() {
        let plan = ExportPlan {
            years: vec![2016, 2015],
            months: vec![2, 1],
        };

        let windows: Vec<String> = plan
            .windows()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            windows,
            vec![
                "20160201-20160229",
                "20160101-20160131",
                "20150201-20150228",
                "20150101-20150131",
            ]
        );
    }

    #[test]
    fn test_plan_rejects_bad_month() {
        let plan = ExportPlan {
            years: vec![2016],
            months: vec![1, 13],
        };
        assert!(matches!(plan.windows(), Err(Error::InvalidMonth(13))));
    }

    #[test]
    fn test_csv_sink_writes_rows_without_header() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_batch(PageBatch {
            page: 0,
            results: vec![result(1, "Plain"), result(2, "Quoted, \"with\" comma")],
        })
        .unwrap();

        assert_eq!(sink.rows(), 2);
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "2016-02-01T05:00:00+0000,https://www.nytimes.com/1.html,Plain\n\
             2016-02-02T05:00:00+0000,https://www.nytimes.com/2.html,\"Quoted, \"\"with\"\" comma\"\n"
        );
    }

    #[test]
    fn test_csv_sink_flushes_each_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let file = std::fs::File::create(&path).unwrap();
        let mut sink = CsvSink::new(file);

        sink.write_batch(PageBatch {
            page: 0,
            results: vec![result(1, "First")],
        })
        .unwrap();

        // Visible on disk before the sink is dropped
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk.lines().count(), 1);
        assert!(on_disk.ends_with("First\n"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_finish_keeps_export_error_over_flush_error() {
        let sink = CsvSink::new(BrokenPipe);
        let result = sink.finish(Err(Error::ApiStatus("ERROR".to_string())));
        assert!(matches!(result, Err(Error::ApiStatus(s)) if s == "ERROR"));
    }

    #[test]
    fn test_finish_reports_flush_error_after_clean_export() {
        let sink = CsvSink::new(BrokenPipe);
        assert!(matches!(sink.finish(Ok(())), Err(Error::Io(_))));
    }

    #[test]
    fn test_finish_returns_output_after_clean_export() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_batch(PageBatch {
            page: 0,
            results: vec![result(1, "Only")],
        })
        .unwrap();
        let out = sink.finish(Ok(())).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("Only\n"));
    }

    #[test]
    fn test_csv_sink_empty_batch_is_noop() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_batch(PageBatch::default()).unwrap();
        assert_eq!(sink.rows(), 0);
        assert!(sink.into_inner().unwrap().is_empty());
    }
}
