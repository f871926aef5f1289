// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report sink: append-only CSV log of every analysed page.
//
// Layout:
//   <reports_dir>/page_stats_<YYYYMMDD_HHMMSS>.csv
//     PDF Path, PDF Name, Page Number, % Non-White Pixels, % Content Area,
//     Status, Threshold
//
// The file is created on the first write (or an explicit `ensure_open`), each
// row is flushed as soon as it is written, and `close` releases the handle.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use pagesweep_core::PageStats;
use pagesweep_core::error::{PageSweepError, Result};
use tracing::{debug, info, instrument, warn};

/// Fixed first row of every report.
pub const REPORT_HEADER: [&str; 7] = [
    "PDF Path",
    "PDF Name",
    "Page Number",
    "% Non-White Pixels",
    "% Content Area",
    "Status",
    "Threshold",
];

// ---------------------------------------------------------------------------
// Local error helpers
// ---------------------------------------------------------------------------

/// Convert a `csv::Error` into a `PageSweepError::Report`.
fn csv_err(e: csv::Error) -> PageSweepError {
    PageSweepError::Report(e.to_string())
}

enum SinkState {
    /// Constructed, no file yet.
    Unopened,
    Open {
        path: PathBuf,
        writer: csv::Writer<File>,
    },
    Closed {
        path: Option<PathBuf>,
    },
}

/// Run-scoped CSV writer for [`PageStats`] rows.
///
/// Construction touches nothing on disk. Callers hand out `&mut ReportSink`
/// to every analysis call of the run and call [`ReportSink::close`] when the
/// run ends; dropping the sink closes it as well.
pub struct ReportSink {
    reports_dir: PathBuf,
    state: SinkState,
    rows_written: usize,
}

impl ReportSink {
    /// Bind a sink to `reports_dir`. The directory is created lazily.
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            state: SinkState::Unopened,
            rows_written: 0,
        }
    }

    /// Path of the report file, once it has been created.
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            SinkState::Unopened => None,
            SinkState::Open { path, .. } => Some(path),
            SinkState::Closed { path } => path.as_deref(),
        }
    }

    /// Number of data rows written so far (the header is not counted).
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SinkState::Open { .. })
    }

    /// Create the report file and write the header, unless that already
    /// happened in this run. Returns the report path either way.
    #[instrument(skip(self), fields(reports_dir = %self.reports_dir.display()))]
    pub fn ensure_open(&mut self) -> Result<&Path> {
        match self.state {
            SinkState::Open { .. } => {}
            SinkState::Closed { .. } => {
                return Err(PageSweepError::Report(
                    "report sink already closed for this run".into(),
                ));
            }
            SinkState::Unopened => {
                std::fs::create_dir_all(&self.reports_dir)?;
                let (path, file) = create_report_file(&self.reports_dir)?;

                let mut writer = csv::Writer::from_writer(file);
                writer.write_record(REPORT_HEADER).map_err(csv_err)?;
                writer.flush()?;

                info!(path = %path.display(), "report created");
                self.state = SinkState::Open { path, writer };
            }
        }

        match &self.state {
            SinkState::Open { path, .. } => Ok(path),
            _ => Err(PageSweepError::Report("report sink is not open".into())),
        }
    }

    /// Append one row and flush it to disk.
    pub fn write_row(&mut self, stats: &PageStats) -> Result<()> {
        self.ensure_open()?;
        let SinkState::Open { writer, .. } = &mut self.state else {
            return Err(PageSweepError::Report("report sink is not open".into()));
        };

        writer
            .write_record([
                stats.pdf_path.display().to_string(),
                stats.pdf_name.clone(),
                stats.page_number.to_string(),
                format!("{:.2}", stats.non_white_percent),
                format!("{:.2}", stats.content_area_percent),
                stats.status.label().to_string(),
                stats.threshold.clone(),
            ])
            .map_err(csv_err)?;
        writer.flush()?;

        self.rows_written += 1;
        debug!(pdf = %stats.pdf_name, page = stats.page_number, "report row written");
        Ok(())
    }

    /// Flush and release the report file. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let previous = std::mem::replace(&mut self.state, SinkState::Closed { path: None });
        match previous {
            SinkState::Open { path, mut writer } => {
                let flushed = writer.flush();
                info!(path = %path.display(), rows = self.rows_written, "report closed");
                self.state = SinkState::Closed { path: Some(path) };
                flushed?;
            }
            other @ SinkState::Closed { .. } => self.state = other,
            SinkState::Unopened => {}
        }
        Ok(())
    }
}

impl Drop for ReportSink {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(%err, "failed to close report on drop");
        }
    }
}

/// Create `page_stats_<timestamp>.csv`, adding `_1`, `_2`, ... when a report
/// from the same second already exists.
fn create_report_file(dir: &Path) -> Result<(PathBuf, File)> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("page_stats_{stamp}.csv")
        } else {
            format!("page_stats_{stamp}_{attempt}.csv")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pagesweep_core::{PageMetrics, PageStatus, THRESHOLD_LABEL};

    use super::*;

    fn stats(page_index: usize, status: PageStatus) -> PageStats {
        PageStats::new(
            Path::new("/scans/contract.pdf"),
            page_index,
            PageMetrics {
                non_white_percent: 1.5,
                content_area_percent: 0.25,
            },
            status,
        )
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn construction_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let sink = ReportSink::new(&reports);
        assert!(sink.path().is_none());
        drop(sink);
        assert!(!reports.exists());
    }

    #[test]
    fn ensure_open_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ReportSink::new(dir.path().join("reports"));

        let first = sink.ensure_open().unwrap().to_path_buf();
        let second = sink.ensure_open().unwrap().to_path_buf();
        assert_eq!(first, second);

        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("page_stats_"));
        assert!(name.ends_with(".csv"));

        sink.close().unwrap();
        assert_eq!(
            read_lines(&first),
            vec!["PDF Path,PDF Name,Page Number,% Non-White Pixels,% Content Area,Status,Threshold"]
        );
    }

    #[test]
    fn rows_are_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ReportSink::new(dir.path());

        sink.write_row(&stats(0, PageStatus::Content)).unwrap();
        sink.write_row(&stats(1, PageStatus::Blank)).unwrap();
        let path = sink.path().unwrap().to_path_buf();

        // Rows are flushed per write, readable before close.
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            format!("/scans/contract.pdf,contract.pdf,1,1.50,0.25,Content,{THRESHOLD_LABEL}")
        );
        assert!(lines[2].contains(",2,") && lines[2].contains(",Blank,"));
        assert_eq!(sink.rows_written(), 2);
    }

    #[test]
    fn close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ReportSink::new(dir.path());
        sink.write_row(&stats(0, PageStatus::Content)).unwrap();

        sink.close().unwrap();
        sink.close().unwrap();
        assert!(!sink.is_open());
        assert!(sink.path().is_some());
    }

    #[test]
    fn close_without_open_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ReportSink::new(dir.path().join("never"));
        sink.close().unwrap();
        assert!(!dir.path().join("never").exists());
    }

    #[test]
    fn write_after_close_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ReportSink::new(dir.path());
        sink.ensure_open().unwrap();
        sink.close().unwrap();

        let err = sink.write_row(&stats(0, PageStatus::Blank)).unwrap_err();
        assert!(matches!(err, PageSweepError::Report(_)));
    }

    #[test]
    fn runs_in_the_same_second_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = ReportSink::new(dir.path());
        let mut second = ReportSink::new(dir.path());

        let a = first.ensure_open().unwrap().to_path_buf();
        let b = second.ensure_open().unwrap().to_path_buf();
        assert_ne!(a, b);
    }

    #[test]
    fn drop_flushes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let mut sink = ReportSink::new(dir.path());
            sink.write_row(&stats(4, PageStatus::Blank)).unwrap();
            sink.path().unwrap().to_path_buf()
        };
        assert_eq!(read_lines(&path).len(), 2);
    }
}
