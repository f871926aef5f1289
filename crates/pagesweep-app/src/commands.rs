// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch commands. Each one walks its inputs in order, keeps going past
// per-document failures, and stops early on anything that would fail every
// remaining document as well.

use std::path::{Path, PathBuf};

use pagesweep_core::error::{PageSweepError, Result};
use pagesweep_core::human_errors::{Severity, humanize_error};
use pagesweep_core::{AppConfig, DocumentStatistics, PageReport};
use pagesweep_document::attachment::{base64_to_pdf, pdf_to_base64};
use pagesweep_document::pipeline::{BlankPageRemoval, FirstPageRemoval, OcrStage};
use pagesweep_document::{DocumentPipeline, Stage, StatisticsReporter};
use pagesweep_report::ReportSink;
use tracing::{error, info, instrument, warn};

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// `true` when the run stopped before the last input.
    pub aborted: bool,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.aborted
    }

    /// Record a failure for `pdf`. Returns `false` when the batch must stop.
    fn record_failure(&mut self, pdf: &Path, err: &PageSweepError) -> bool {
        self.failed += 1;
        let human = humanize_error(err);
        error!(pdf = %pdf.display(), %err, severity = ?human.severity, "Document failed");
        print_human_error(err);
        if human.severity == Severity::Document {
            return true;
        }
        self.aborted = true;
        false
    }
}

/// Write a plain-English version of `err` to stderr.
pub fn print_human_error(err: &PageSweepError) {
    let human = humanize_error(err);
    eprintln!("error: {}", human.message);
    eprintln!("  {}", human.suggestion);
}

// ---------------------------------------------------------------------------
// process
// ---------------------------------------------------------------------------

/// Flags of the `process` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessFlags {
    pub keep_blanks: bool,
    pub no_size_check: bool,
    pub ocr: bool,
    pub drop_first_page: bool,
    pub no_report: bool,
}

impl ProcessFlags {
    /// Stage order is fixed: blank removal, OCR, first-page removal.
    fn stages(&self) -> Vec<Box<dyn Stage>> {
        let mut stages: Vec<Box<dyn Stage>> = Vec::new();
        if !self.keep_blanks {
            stages.push(Box::new(BlankPageRemoval));
        }
        if self.ocr {
            stages.push(Box::new(OcrStage));
        }
        if self.drop_first_page {
            stages.push(Box::new(FirstPageRemoval));
        }
        stages
    }
}

/// Record every page in the run's report, then clean each document up.
pub fn process(config: &AppConfig, inputs: &[PathBuf], flags: ProcessFlags) -> Result<BatchSummary> {
    let pipeline = DocumentPipeline::with_defaults(config.clone());
    process_with(&pipeline, inputs, flags)
}

#[instrument(skip_all, fields(inputs = inputs.len()))]
fn process_with(pipeline: &DocumentPipeline, inputs: &[PathBuf], flags: ProcessFlags) -> Result<BatchSummary> {
    let reporter = StatisticsReporter::new(pipeline.analyzer());
    let stages = flags.stages();
    let mut sink = if flags.no_report {
        None
    } else {
        Some(ReportSink::new(&pipeline.config().reports_dir))
    };
    let mut summary = BatchSummary::default();

    for pdf in inputs {
        match process_one(pipeline, &reporter, &stages, sink.as_mut(), pdf, flags) {
            Ok(output) => {
                summary.succeeded += 1;
                println!("{} -> {}", pdf.display(), output.display());
            }
            Err(err) => {
                if !summary.record_failure(pdf, &err) {
                    break;
                }
            }
        }
    }

    if let Some(mut sink) = sink {
        finish_report(&mut sink)?;
    }
    info!(?summary, "Process run finished");
    Ok(summary)
}

/// Size gate first, so an oversized input is never rasterised for the report.
fn process_one(
    pipeline: &DocumentPipeline,
    reporter: &StatisticsReporter<'_>,
    stages: &[Box<dyn Stage>],
    sink: Option<&mut ReportSink>,
    pdf: &Path,
    flags: ProcessFlags,
) -> Result<PathBuf> {
    let check_size = !flags.no_size_check;
    if check_size {
        pipeline.check_size(pdf)?;
    }
    if let Some(sink) = sink {
        if let PageReport::Failed { reason } = reporter.generate_page_report(pdf, sink)? {
            warn!(pdf = %pdf.display(), %reason, "No report rows for document");
        }
    }
    pipeline.run(pdf, stages, check_size)
}

// ---------------------------------------------------------------------------
// report / stats
// ---------------------------------------------------------------------------

/// Write one report for all `inputs` without producing derived documents.
pub fn report(config: &AppConfig, inputs: &[PathBuf]) -> Result<BatchSummary> {
    let pipeline = DocumentPipeline::with_defaults(config.clone());
    report_with(&pipeline, inputs)
}

#[instrument(skip_all, fields(inputs = inputs.len()))]
fn report_with(pipeline: &DocumentPipeline, inputs: &[PathBuf]) -> Result<BatchSummary> {
    let reporter = StatisticsReporter::new(pipeline.analyzer());
    let mut sink = ReportSink::new(&pipeline.config().reports_dir);
    let mut summary = BatchSummary::default();

    for pdf in inputs {
        match reporter.generate_page_report(pdf, &mut sink) {
            Ok(PageReport::Ok(rows)) => {
                summary.succeeded += 1;
                info!(pdf = %pdf.display(), pages = rows.len(), "Document reported");
            }
            Ok(PageReport::Failed { reason }) => {
                summary.failed += 1;
                eprintln!("error: {} was not reported: {reason}", pdf.display());
            }
            Err(err) => {
                if !summary.record_failure(pdf, &err) {
                    break;
                }
            }
        }
    }

    finish_report(&mut sink)?;
    Ok(summary)
}

/// Print per-document statistics, as text lines or one JSON array.
#[instrument(skip_all, fields(inputs = inputs.len(), json = json))]
pub fn stats(config: &AppConfig, inputs: &[PathBuf], json: bool) -> Result<BatchSummary> {
    let pipeline = DocumentPipeline::with_defaults(config.clone());
    let reporter = StatisticsReporter::new(pipeline.analyzer());
    let mut collected = Vec::new();
    let mut summary = BatchSummary::default();

    for pdf in inputs {
        match reporter.get_pdf_statistics(pdf) {
            Ok(stats) => {
                summary.succeeded += 1;
                if !json {
                    println!("{}", format_statistics(&stats));
                }
                collected.push(stats);
            }
            Err(err) => {
                if !summary.record_failure(pdf, &err) {
                    break;
                }
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&collected)?);
    }
    Ok(summary)
}

fn format_statistics(stats: &DocumentStatistics) -> String {
    format!(
        "{}: {} pages, {} blank ({:.2}%), {} remaining",
        stats.pdf_name,
        stats.total_pages,
        stats.blank_pages,
        stats.blank_percentage,
        stats.remaining_pages
    )
}

/// Close the sink and tell the operator where the report went.
fn finish_report(sink: &mut ReportSink) -> Result<()> {
    let path = sink.path().map(Path::to_path_buf);
    sink.close()?;
    match path {
        Some(path) => println!("report: {} ({} rows)", path.display(), sink.rows_written()),
        None => info!("No pages reported, no report file written"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// encode / decode
// ---------------------------------------------------------------------------

/// Print `input` as base64 on stdout.
pub fn encode(input: &Path) -> Result<()> {
    println!("{}", pdf_to_base64(input)?);
    Ok(())
}

/// Read base64 text from `input` and write the PDF to `output`.
pub fn decode(input: &Path, output: &Path) -> Result<()> {
    let data = std::fs::read_to_string(input)?;
    base64_to_pdf(&data, output)
}
