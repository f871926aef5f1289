// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PageSweep.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all PageSweep operations.
#[derive(Debug, Error)]
pub enum PageSweepError {
    // -- Pipeline gates --
    #[error("{} is {size_mb:.2} MB, above the {max_mb:.2} MB limit", path.display())]
    SizeExceeded {
        path: PathBuf,
        size_mb: f64,
        max_mb: f64,
    },

    // -- Page analysis --
    #[error("analysis of page {page} in {} failed: {reason}", path.display())]
    Analysis {
        path: PathBuf,
        /// 1-based page number.
        page: usize,
        reason: String,
        /// The renderer error behind the failure, when there is one.
        #[source]
        cause: Option<Box<PageSweepError>>,
    },

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("{tool} failed: {detail}")]
    ExternalService { tool: String, detail: String },

    // -- Reports / persistence --
    #[error("report error: {0}")]
    Report(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("attachment encoding failed: {0}")]
    Encoding(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PageSweepError {
    /// Shorthand for an analysis failure on a 0-based page index.
    pub fn analysis(path: impl Into<PathBuf>, page_index: usize, reason: impl Into<String>) -> Self {
        Self::Analysis {
            path: path.into(),
            page: page_index + 1,
            reason: reason.into(),
            cause: None,
        }
    }

    /// Analysis failure on a 0-based page index, keeping `cause` as the source.
    pub fn analysis_caused_by(path: impl Into<PathBuf>, page_index: usize, cause: PageSweepError) -> Self {
        Self::Analysis {
            path: path.into(),
            page: page_index + 1,
            reason: cause.to_string(),
            cause: Some(Box::new(cause)),
        }
    }

    /// The `ExternalService` error at the root of this one, if any.
    pub fn external_service(&self) -> Option<(&str, &str)> {
        match self {
            Self::ExternalService { tool, detail } => Some((tool, detail)),
            Self::Analysis {
                cause: Some(cause), ..
            } => cause.external_service(),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PageSweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_reports_one_based_page() {
        let err = PageSweepError::analysis("/tmp/a.pdf", 0, "pdftoppm exited 1");
        assert_eq!(
            err.to_string(),
            "analysis of page 1 in /tmp/a.pdf failed: pdftoppm exited 1"
        );
    }

    #[test]
    fn size_exceeded_message_has_both_sizes() {
        let err = PageSweepError::SizeExceeded {
            path: PathBuf::from("big.pdf"),
            size_mb: 130.5,
            max_mb: 120.0,
        };
        assert_eq!(err.to_string(), "big.pdf is 130.50 MB, above the 120.00 MB limit");
    }

    #[test]
    fn analysis_keeps_the_renderer_error_as_source() {
        use std::error::Error;

        let cause = PageSweepError::ExternalService {
            tool: "pdftoppm".into(),
            detail: "No such file or directory (os error 2)".into(),
        };
        let err = PageSweepError::analysis_caused_by("x.pdf", 0, cause);

        assert!(err.to_string().contains("pdftoppm failed"));
        assert!(err.source().is_some());
        assert_eq!(
            err.external_service(),
            Some(("pdftoppm", "No such file or directory (os error 2)"))
        );
    }

    #[test]
    fn plain_analysis_failure_has_no_tool() {
        let err = PageSweepError::analysis("x.pdf", 1, "rendered page has no pixels");
        assert!(err.external_service().is_none());
    }
}
