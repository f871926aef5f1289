// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: page counting, page removal, and derived file naming.

pub mod reader;

use std::path::{Path, PathBuf};

pub use reader::PdfReader;

/// Suffix of the file written by blank-page removal.
pub const NOBLANK_SUFFIX: &str = "_noblank";
/// Suffix of the file written by the OCR stage.
pub const OCR_SUFFIX: &str = "_ocr";
/// Suffix of the file written by first-page removal.
pub const NOFIRST_SUFFIX: &str = "_nofirst";

/// Path of a derived document: `<dir>/<stem><suffix>.pdf` beside `original`.
pub fn derived_path(original: &Path, suffix: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    original.with_file_name(format!("{stem}{suffix}.pdf"))
}
