// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR (Optical Character Recognition) capability.
//
// The pipeline only decides when to add a text layer; recognition itself is
// delegated to an external engine. The default engine is `ocrmypdf`, which
// reads a PDF and writes a new PDF with a searchable text layer.

use std::path::{Path, PathBuf};
use std::process::Command;

use pagesweep_core::error::{PageSweepError, Result};
use tracing::{info, instrument};

/// Writes an OCR'd copy of `input` to `output`.
pub trait OcrEngine {
    fn ocr(&self, input: &Path, output: &Path, language: &str, deskew: bool) -> Result<()>;
}

/// `ocrmypdf` command-line wrapper.
#[derive(Debug, Clone)]
pub struct OcrMyPdf {
    program: PathBuf,
}

impl OcrMyPdf {
    /// Use `ocrmypdf` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ocrmypdf"),
        }
    }

    /// Use a specific `ocrmypdf` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    fn command(&self, input: &Path, output: &Path, language: &str, deskew: bool) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("-l").arg(language);
        if deskew {
            command.arg("--deskew");
        }
        command.arg(input).arg(output);
        command
    }
}

impl Default for OcrMyPdf {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for OcrMyPdf {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    fn ocr(&self, input: &Path, output: &Path, language: &str, deskew: bool) -> Result<()> {
        let result = self
            .command(input, output, language, deskew)
            .output()
            .map_err(|err| PageSweepError::ExternalService {
                tool: self.tool_name(),
                detail: err.to_string(),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(PageSweepError::ExternalService {
                tool: self.tool_name(),
                detail: format!("{}: {}", result.status, stderr.trim()),
            });
        }

        info!(output = %output.display(), "OCR complete");
        Ok(())
    }
}
