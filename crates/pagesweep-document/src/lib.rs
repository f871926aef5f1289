// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagesweep-document — Page analysis and document clean-up for PageSweep.
//
// Provides per-page pixel and layout analysis, the blank-page rule, the staged
// clean-up pipeline (blank removal, OCR, first-page removal, size gates),
// per-document statistics, and base64 attachment helpers.

pub mod analysis;
pub mod attachment;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod statistics;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the primary structs so callers can use `pagesweep_document::DocumentPipeline` etc.
pub use analysis::analyzer::PageStatAnalyzer;
pub use analysis::classifier::classify;
pub use ocr::{OcrEngine, OcrMyPdf};
pub use pdf::reader::PdfReader;
pub use pipeline::{DocumentPipeline, ProcessOptions, Stage, StageOutput};
pub use render::{PageRenderer, PopplerRenderer, TextBlock};
pub use statistics::StatisticsReporter;
