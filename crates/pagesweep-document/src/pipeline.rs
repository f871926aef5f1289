// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document clean-up pipeline.
//
// A run threads an immutable `StageOutput` through an ordered list of stages:
//
//   size gate (pre) -> stage 1 -> size gate -> stage 2 -> size gate -> ...
//
// Every stage reads the previous output and may write a new derived file next
// to the original (`_noblank`, `_ocr`, `_nofirst`). The original input is
// never modified or deleted. When a stage or a gate fails, the artifact that
// stage produced and the current temporary working file are removed before
// the error is returned.

use std::path::{Path, PathBuf};

use pagesweep_core::AppConfig;
use pagesweep_core::config::BYTES_PER_MB;
use pagesweep_core::error::{PageSweepError, Result};
use tracing::{debug, info, instrument, warn};

use crate::analysis::analyzer::PageStatAnalyzer;
use crate::ocr::{OcrEngine, OcrMyPdf};
use crate::pdf::{NOBLANK_SUFFIX, NOFIRST_SUFFIX, OCR_SUFFIX, PdfReader, derived_path};
use crate::render::{PageRenderer, PopplerRenderer};

// ---------------------------------------------------------------------------
// Stage results
// ---------------------------------------------------------------------------

/// The document as it leaves a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub path: PathBuf,
    /// `true` for files the pipeline created and may delete on failure.
    pub is_temporary: bool,
}

impl StageOutput {
    /// The caller's input file. Never deleted.
    pub fn original(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_temporary: false,
        }
    }

    /// A file written by a stage.
    pub fn derived(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_temporary: true,
        }
    }

    /// Remove the file if this run created it.
    fn discard(&self) {
        if !self.is_temporary || !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Temporary artifact removed"),
            Err(err) => warn!(path = %self.path.display(), %err, "Could not remove temporary artifact"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Collaborators a stage may use.
pub struct StageContext<'a> {
    pub analyzer: &'a PageStatAnalyzer,
    pub ocr: &'a dyn OcrEngine,
    pub config: &'a AppConfig,
}

/// One transformation step.
pub trait Stage {
    fn name(&self) -> &'static str;

    /// Transform `input`. Returns the path of a newly written file, or `None`
    /// when the stage has nothing to do and `input` passes through unchanged.
    fn apply(&self, ctx: &StageContext<'_>, input: &Path) -> Result<Option<PathBuf>>;
}

/// Drops every page classified as blank. Always writes `<stem>_noblank.pdf`,
/// which is an empty document when every page is blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankPageRemoval;

impl Stage for BlankPageRemoval {
    fn name(&self) -> &'static str {
        "blank-page removal"
    }

    fn apply(&self, ctx: &StageContext<'_>, input: &Path) -> Result<Option<PathBuf>> {
        let reader = PdfReader::open(input)?;
        let page_count = reader.page_count();

        let mut blank_pages = Vec::new();
        for page_index in 0..page_count {
            let stats = ctx.analyzer.page_stats(input, page_index)?;
            if stats.status.is_blank() {
                blank_pages.push(stats.page_number as u32);
            }
        }

        if page_count > 0 && blank_pages.len() == page_count {
            warn!(pdf = %input.display(), page_count, "Every page is blank; output will be empty");
        }

        let output = derived_path(input, NOBLANK_SUFFIX);
        reader.save_without_pages(&blank_pages, &output)?;
        info!(
            pdf = %input.display(),
            removed = blank_pages.len(),
            kept = page_count - blank_pages.len(),
            "Blank pages removed"
        );
        Ok(Some(output))
    }
}

/// Adds a text layer through the configured [`OcrEngine`], writing
/// `<stem>_ocr.pdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcrStage;

impl Stage for OcrStage {
    fn name(&self) -> &'static str {
        "OCR"
    }

    fn apply(&self, ctx: &StageContext<'_>, input: &Path) -> Result<Option<PathBuf>> {
        let output = derived_path(input, OCR_SUFFIX);
        let attempt = ctx.ocr.ocr(
            input,
            &output,
            &ctx.config.ocr_language,
            ctx.config.ocr_deskew,
        );
        if let Err(err) = attempt {
            StageOutput::derived(&output).discard();
            return Err(err);
        }
        if !output.exists() {
            return Err(PageSweepError::ExternalService {
                tool: "ocr".into(),
                detail: format!("engine reported success but wrote no {}", output.display()),
            });
        }
        Ok(Some(output))
    }
}

/// Drops page 1, writing `<stem>_nofirst.pdf`. Documents with at most one
/// page pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPageRemoval;

impl Stage for FirstPageRemoval {
    fn name(&self) -> &'static str {
        "first-page removal"
    }

    fn apply(&self, _ctx: &StageContext<'_>, input: &Path) -> Result<Option<PathBuf>> {
        let reader = PdfReader::open(input)?;
        if reader.page_count() <= 1 {
            debug!(pdf = %input.display(), "Single page document, first page kept");
            return Ok(None);
        }
        let output = derived_path(input, NOFIRST_SUFFIX);
        reader.save_without_pages(&[1], &output)?;
        Ok(Some(output))
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Switches for [`DocumentPipeline::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    pub remove_blanks: bool,
    pub check_size: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            remove_blanks: true,
            check_size: true,
        }
    }
}

/// Runs stages over one document at a time.
pub struct DocumentPipeline {
    analyzer: PageStatAnalyzer,
    ocr: Box<dyn OcrEngine>,
    config: AppConfig,
}

impl DocumentPipeline {
    pub fn new(config: AppConfig, renderer: Box<dyn PageRenderer>, ocr: Box<dyn OcrEngine>) -> Self {
        let analyzer = PageStatAnalyzer::new(renderer).with_threshold(config.white_threshold);
        Self {
            analyzer,
            ocr,
            config,
        }
    }

    /// Pipeline backed by poppler-utils and ocrmypdf.
    pub fn with_defaults(config: AppConfig) -> Self {
        let renderer = PopplerRenderer::new(config.render_dpi);
        Self::new(config, Box::new(renderer), Box::new(OcrMyPdf::new()))
    }

    pub fn analyzer(&self) -> &PageStatAnalyzer {
        &self.analyzer
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn context(&self) -> StageContext<'_> {
        StageContext {
            analyzer: &self.analyzer,
            ocr: self.ocr.as_ref(),
            config: &self.config,
        }
    }

    /// Size gate, then blank-page removal (when enabled) followed by a second
    /// size gate. Returns the path of the final document, which is `pdf`
    /// itself when no stage ran.
    pub fn process(&self, pdf: &Path, options: ProcessOptions) -> Result<PathBuf> {
        let mut stages: Vec<Box<dyn Stage>> = Vec::new();
        if options.remove_blanks {
            stages.push(Box::new(BlankPageRemoval));
        }
        self.run(pdf, &stages, options.check_size)
    }

    /// Thread `pdf` through `stages` in order.
    #[instrument(skip_all, fields(pdf = %pdf.display(), stages = stages.len(), check_size = check_size))]
    pub fn run(&self, pdf: &Path, stages: &[Box<dyn Stage>], check_size: bool) -> Result<PathBuf> {
        if check_size {
            self.check_size(pdf)?;
        }

        let ctx = self.context();
        let mut current = StageOutput::original(pdf);

        for stage in stages {
            debug!(stage = stage.name(), input = %current.path.display(), "Stage starting");
            let produced = match stage.apply(&ctx, &current.path) {
                Ok(produced) => produced,
                Err(err) => {
                    warn!(stage = stage.name(), %err, "Stage failed");
                    current.discard();
                    return Err(err);
                }
            };

            let Some(path) = produced else {
                debug!(stage = stage.name(), "Stage left the document unchanged");
                continue;
            };
            let next = StageOutput::derived(path);

            if check_size {
                if let Err(err) = self.check_size(&next.path) {
                    warn!(stage = stage.name(), %err, "Stage output too large");
                    next.discard();
                    current.discard();
                    return Err(err);
                }
            }

            info!(stage = stage.name(), output = %next.path.display(), "Stage complete");
            current = next;
        }

        Ok(current.path)
    }

    /// Blank-page removal on its own, without size gates.
    pub fn remove_blank_pages(&self, pdf: &Path) -> Result<PathBuf> {
        self.run_single(pdf, &BlankPageRemoval)
    }

    /// OCR on its own. Engine failures are returned unchanged.
    pub fn apply_ocr(&self, pdf: &Path) -> Result<PathBuf> {
        self.run_single(pdf, &OcrStage)
    }

    /// Drop page 1. Returns `pdf` itself, creating nothing, when the document
    /// has at most one page.
    pub fn remove_first_page(&self, pdf: &Path) -> Result<PathBuf> {
        self.run_single(pdf, &FirstPageRemoval)
    }

    fn run_single(&self, pdf: &Path, stage: &dyn Stage) -> Result<PathBuf> {
        let produced = stage.apply(&self.context(), pdf)?;
        Ok(produced.unwrap_or_else(|| pdf.to_path_buf()))
    }

    /// Fail with `SizeExceeded` when `path` is above the configured limit.
    pub fn check_size(&self, path: &Path) -> Result<()> {
        let size = std::fs::metadata(path)?.len();
        let limit = self.config.max_pdf_size_bytes();
        if size > limit {
            return Err(PageSweepError::SizeExceeded {
                path: path.to_path_buf(),
                size_mb: size as f64 / BYTES_PER_MB,
                max_mb: self.config.max_pdf_size_mb,
            });
        }
        debug!(path = %path.display(), size, limit, "Size check passed");
        Ok(())
    }
}
