// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for operators running batch clean-ups.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity decides whether a batch run moves on to the next document.

use crate::error::PageSweepError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Only this document is affected; the rest of the batch can continue.
    Document,
    /// The operator must fix something (install a tool, free disk space).
    ActionRequired,
    /// The run itself is misconfigured; nothing else will succeed either.
    Fatal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (printed as the first line).
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `PageSweepError` into a `HumanError`.
pub fn humanize_error(err: &PageSweepError) -> HumanError {
    match err {
        PageSweepError::SizeExceeded { path, size_mb, max_mb } => HumanError {
            message: format!("{} is too large ({size_mb:.1} MB).", path.display()),
            suggestion: format!(
                "Split the file or raise max_pdf_size_mb above {max_mb:.1} in the config."
            ),
            severity: Severity::Document,
        },

        PageSweepError::Analysis { cause: Some(cause), .. } if cause.external_service().is_some() => {
            humanize_error(cause)
        }

        PageSweepError::Analysis { path, page, reason, .. } => HumanError {
            message: format!("Page {page} of {} could not be read.", path.display()),
            suggestion: format!("Check that the file opens in a PDF viewer. ({reason})"),
            severity: Severity::Document,
        },

        PageSweepError::Pdf(detail) => HumanError {
            message: "The PDF could not be processed.".into(),
            suggestion: format!("The file may be damaged or encrypted. ({detail})"),
            severity: Severity::Document,
        },

        PageSweepError::ExternalService { tool, detail } => humanize_tool_error(tool, detail),

        PageSweepError::Report(detail) => HumanError {
            message: "The statistics report could not be written.".into(),
            suggestion: format!("Check that reports_dir is writable. ({detail})"),
            severity: Severity::ActionRequired,
        },

        PageSweepError::Config(detail) => HumanError {
            message: "The configuration file is invalid.".into(),
            suggestion: format!("Fix the setting and run again. ({detail})"),
            severity: Severity::Fatal,
        },

        PageSweepError::Encoding(detail) => HumanError {
            message: "The attachment data is not valid.".into(),
            suggestion: format!("Re-export the document from the source system. ({detail})"),
            severity: Severity::Document,
        },

        PageSweepError::Io(io_err) => humanize_io_error(io_err),

        PageSweepError::Serialization(detail) => HumanError {
            message: "Results could not be formatted as JSON.".into(),
            suggestion: format!("Run again without --json. ({detail})"),
            severity: Severity::Fatal,
        },
    }
}

fn humanize_tool_error(tool: &str, detail: &str) -> HumanError {
    if detail.contains("No such file") || detail.contains("not found") {
        HumanError {
            message: format!("The helper program `{tool}` is not installed."),
            suggestion: format!("Install `{tool}` and make sure it is on PATH."),
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: format!("`{tool}` could not process the document."),
            suggestion: format!("Try the file on its own to see the full output. ({detail})"),
            severity: Severity::Document,
        }
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    match err.kind() {
        std::io::ErrorKind::NotFound => HumanError {
            message: "A file could not be found.".into(),
            suggestion: format!("Check the path and try again. ({err})"),
            severity: Severity::Document,
        },
        std::io::ErrorKind::PermissionDenied => HumanError {
            message: "Permission denied.".into(),
            suggestion: format!("Run with access to the input and output folders. ({err})"),
            severity: Severity::ActionRequired,
        },
        _ => HumanError {
            message: "A file operation failed.".into(),
            suggestion: format!("Check free disk space. ({err})"),
            severity: Severity::ActionRequired,
        },
    }
}
