// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open existing PDF documents, count their pages, and write
// copies with a chosen set of pages removed, using the `lopdf` crate.

use std::path::{Path, PathBuf};

use lopdf::Document;
use pagesweep_core::error::{PageSweepError, Result};
use tracing::{debug, info, instrument, warn};

/// Reads existing PDF files and writes page-filtered copies of them.
///
/// Wraps `lopdf::Document`. The source file is never written to; every
/// transformation lands in a new file chosen by the caller.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path (useful for diagnostics).
    source_path: PathBuf,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();

        let document = Document::load(path_ref).map_err(|err| {
            PageSweepError::Pdf(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: path_ref.to_path_buf(),
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Path the reader was opened from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    // -- Output ---------------------------------------------------------------

    /// Write a copy of the document without the given pages (1-indexed) to
    /// `output`. Unknown page numbers are ignored. Removing every page yields
    /// a valid document with an empty page tree.
    #[instrument(skip(self, page_numbers), fields(removed = page_numbers.len(), output = %output.display()))]
    pub fn save_without_pages(&self, page_numbers: &[u32], output: &Path) -> Result<()> {
        let mut document = self.document.clone();
        if !page_numbers.is_empty() {
            document.delete_pages(page_numbers);
            let pruned = document.prune_objects();
            debug!(pruned = pruned.len(), "Orphaned objects pruned");
        }

        if let Err(err) = document.save(output) {
            if output.exists() {
                if let Err(cleanup) = std::fs::remove_file(output) {
                    warn!(%cleanup, "Could not remove partial output");
                }
            }
            return Err(PageSweepError::Pdf(format!(
                "failed to write {}: {}",
                output.display(),
                err
            )));
        }

        info!(
            source = %self.source_path.display(),
            remaining = self.page_count().saturating_sub(page_numbers.len()),
            "PDF written"
        );
        Ok(())
    }
}
