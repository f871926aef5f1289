// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page reports and per-document statistics.

use std::path::Path;

use pagesweep_core::error::Result;
use pagesweep_core::human_errors::{Severity, humanize_error};
use pagesweep_core::{DocumentStatistics, PageReport};
use pagesweep_report::ReportSink;
use tracing::{error, info, instrument};

use crate::analysis::analyzer::PageStatAnalyzer;

/// Drives every page of a document through the analyzer.
pub struct StatisticsReporter<'a> {
    analyzer: &'a PageStatAnalyzer,
}

impl<'a> StatisticsReporter<'a> {
    pub fn new(analyzer: &'a PageStatAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Analyse every page of `pdf` and append one row per page to `sink`.
    ///
    /// A document that cannot be opened, or any page that cannot be
    /// analysed, yields [`PageReport::Failed`] and writes no rows for this
    /// document. Failures of the sink, and failures that would hit every
    /// document alike (a missing renderer tool), are returned as `Err`.
    #[instrument(skip_all, fields(pdf = %pdf.display()))]
    pub fn generate_page_report(&self, pdf: &Path, sink: &mut ReportSink) -> Result<PageReport> {
        let rows = match self.analyzer.analyze_document(pdf) {
            Ok(rows) => rows,
            Err(err) if humanize_error(&err).severity != Severity::Document => {
                error!(%err, "Page report aborted");
                return Err(err);
            }
            Err(err) => {
                error!(%err, "Page report failed");
                return Ok(PageReport::Failed {
                    reason: err.to_string(),
                });
            }
        };

        sink.ensure_open()?;
        for row in &rows {
            sink.write_row(row)?;
        }

        info!(pages = rows.len(), "Page report written");
        Ok(PageReport::Ok(rows))
    }

    /// Analyse every page of `pdf` afresh and summarise. Failures propagate.
    #[instrument(skip_all, fields(pdf = %pdf.display()))]
    pub fn get_pdf_statistics(&self, pdf: &Path) -> Result<DocumentStatistics> {
        let rows = self.analyzer.analyze_document(pdf)?;
        let stats = DocumentStatistics::from_pages(pdf, &rows);
        info!(
            total = stats.total_pages,
            blank = stats.blank_pages,
            blank_percentage = stats.blank_percentage,
            "Statistics computed"
        );
        Ok(stats)
    }
}
