// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for PageSweep.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A page is blank only when its non-white pixel share is below this percentage...
pub const NON_WHITE_BLANK_LIMIT: f64 = 2.7;

/// ...and its text-block coverage is below this percentage.
pub const CONTENT_AREA_BLANK_LIMIT: f64 = 1.0;

/// Human-readable form of the blank rule, written to every report row.
pub const THRESHOLD_LABEL: &str = "Non-White < 2.7% and Content Area < 1.0%";

/// Default channel value below which a pixel counts as ink.
pub const DEFAULT_WHITE_THRESHOLD: u8 = 240;

/// Round a percentage to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Display name of a document: its file name, or the whole path when it has none.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Classification outcome for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageStatus {
    /// Nothing worth keeping on the page.
    Blank,
    /// The page carries ink or text.
    Content,
}

impl PageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Blank => "Blank",
            Self::Content => "Content",
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The two raw signals measured on a rendered page, both percentages rounded
/// to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub non_white_percent: f64,
    pub content_area_percent: f64,
}

/// One analysed page, as written to the statistics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStats {
    pub pdf_path: PathBuf,
    pub pdf_name: String,
    /// 1-based page number.
    pub page_number: usize,
    pub non_white_percent: f64,
    pub content_area_percent: f64,
    pub status: PageStatus,
    pub threshold: String,
}

impl PageStats {
    /// Build the row for the page at 0-based `page_index`.
    pub fn new(pdf_path: &Path, page_index: usize, metrics: PageMetrics, status: PageStatus) -> Self {
        Self {
            pdf_path: pdf_path.to_path_buf(),
            pdf_name: document_name(pdf_path),
            page_number: page_index + 1,
            non_white_percent: metrics.non_white_percent,
            content_area_percent: metrics.content_area_percent,
            status,
            threshold: THRESHOLD_LABEL.to_string(),
        }
    }
}

/// Document-level summary derived from the per-page classifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub pdf_path: PathBuf,
    pub pdf_name: String,
    pub total_pages: usize,
    pub blank_pages: usize,
    pub remaining_pages: usize,
    /// Share of blank pages, rounded to two decimals; 0 for an empty document.
    pub blank_percentage: f64,
}

impl DocumentStatistics {
    /// Aggregate a document's page rows.
    pub fn from_pages(pdf_path: &Path, pages: &[PageStats]) -> Self {
        let total_pages = pages.len();
        let blank_pages = pages.iter().filter(|p| p.status.is_blank()).count();
        let blank_percentage = if total_pages == 0 {
            0.0
        } else {
            round2(blank_pages as f64 / total_pages as f64 * 100.0)
        };

        Self {
            pdf_path: pdf_path.to_path_buf(),
            pdf_name: document_name(pdf_path),
            total_pages,
            blank_pages,
            remaining_pages: total_pages - blank_pages,
            blank_percentage,
        }
    }
}

/// Outcome of generating the per-page report for one document.
///
/// `Ok` with an empty vector means the document has no pages; `Failed` means
/// it could not be opened or a page could not be analysed.
#[derive(Debug, Clone, PartialEq)]
pub enum PageReport {
    Ok(Vec<PageStats>),
    Failed { reason: String },
}

impl PageReport {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Rows of a successful report; empty when the report failed.
    pub fn rows(&self) -> &[PageStats] {
        match self {
            Self::Ok(rows) => rows,
            Self::Failed { .. } => &[],
        }
    }
}
