// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Base64 attachment helpers.
//
// Business-object stores take file attachments as base64 text. These helpers
// turn a finished PDF into that form and back; the store client itself lives
// outside this crate.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pagesweep_core::error::{PageSweepError, Result};
use tracing::{info, instrument};

/// Read `path` and return its contents as standard base64.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn pdf_to_base64(path: impl AsRef<Path>) -> Result<String> {
    let bytes = std::fs::read(path.as_ref())?;
    let encoded = STANDARD.encode(&bytes);
    info!(bytes = bytes.len(), encoded_len = encoded.len(), "Attachment encoded");
    Ok(encoded)
}

/// Decode base64 `data` and write the bytes to `output`.
///
/// Surrounding whitespace and line breaks, as produced by MIME encoders, are
/// ignored. Nothing is written when the data does not decode.
#[instrument(skip_all, fields(data_len = data.len(), output = %output.as_ref().display()))]
pub fn base64_to_pdf(data: &str, output: impl AsRef<Path>) -> Result<()> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| PageSweepError::Encoding(err.to_string()))?;
    std::fs::write(output.as_ref(), &bytes)?;
    info!(bytes = bytes.len(), "Attachment decoded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfReader;
    use crate::test_support::write_pdf;

    #[test]
    fn encodes_known_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::write(&path, b"%PDF-1.5").unwrap();
        assert_eq!(pdf_to_base64(&path).unwrap(), "JVBERi0xLjU=");
    }

    #[test]
    fn decoded_attachment_is_a_readable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.pdf");
        let restored = dir.path().join("restored.pdf");
        write_pdf(&source, &[true, true]);

        let encoded = pdf_to_base64(&source).unwrap();
        base64_to_pdf(&encoded, &restored).unwrap();

        assert_eq!(PdfReader::open(&restored).unwrap().page_count(), 2);
    }

    #[test]
    fn line_wrapped_input_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("wrapped.pdf");
        base64_to_pdf("JVBE\r\nRi0x\nLjU=\n", &output).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"%PDF-1.5");
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("bad.pdf");
        let err = base64_to_pdf("not*base64!", &output).unwrap_err();
        assert!(matches!(err, PageSweepError::Encoding(_)));
        assert!(!output.exists());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = pdf_to_base64(dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, PageSweepError::Io(_)));
    }
}
