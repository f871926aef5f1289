// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page statistics: non-white pixel ratio and text-block coverage of a
// rendered page.

use std::path::Path;

use image::DynamicImage;
use pagesweep_core::error::{PageSweepError, Result};
use pagesweep_core::{DEFAULT_WHITE_THRESHOLD, PageMetrics, PageStats, round2};
use tracing::{debug, instrument};

use super::classifier::classify_metrics;
use crate::pdf::PdfReader;
use crate::render::{PageRenderer, TextBlock};

/// Measures pages through a [`PageRenderer`].
///
/// The analyzer never writes to the document; it only asks the renderer for a
/// raster and the text-block layout of one page at a time.
pub struct PageStatAnalyzer {
    renderer: Box<dyn PageRenderer>,
    /// Channel value below which a pixel counts as ink.
    threshold: u8,
}

impl PageStatAnalyzer {
    pub fn new(renderer: Box<dyn PageRenderer>) -> Self {
        Self {
            renderer,
            threshold: DEFAULT_WHITE_THRESHOLD,
        }
    }

    /// Override the white threshold (default 240).
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Measure the page at 0-based `page_index`.
    ///
    /// Any renderer failure, and a raster without pixels, is reported as
    /// [`PageSweepError::Analysis`]. Renderer errors are kept as its cause.
    #[instrument(skip(self), fields(threshold = self.threshold))]
    pub fn analyze(&self, pdf: &Path, page_index: usize) -> Result<PageMetrics> {
        let failed = |err: PageSweepError| PageSweepError::analysis_caused_by(pdf, page_index, err);

        let raster = self.renderer.render_page(pdf, page_index).map_err(failed)?;
        let (width, height) = (raster.width(), raster.height());
        if width == 0 || height == 0 {
            return Err(PageSweepError::analysis(
                pdf,
                page_index,
                "rendered page has no pixels",
            ));
        }
        let blocks = self.renderer.text_blocks(pdf, page_index).map_err(failed)?;

        let metrics = PageMetrics {
            non_white_percent: non_white_percent(&raster, self.threshold),
            content_area_percent: content_area_percent(&blocks, width, height),
        };
        debug!(
            width,
            height,
            blocks = blocks.len(),
            non_white = metrics.non_white_percent,
            content_area = metrics.content_area_percent,
            "Page measured"
        );
        Ok(metrics)
    }

    /// Measure and classify one page, producing its report row.
    pub fn page_stats(&self, pdf: &Path, page_index: usize) -> Result<PageStats> {
        let metrics = self.analyze(pdf, page_index)?;
        let status = classify_metrics(&metrics);
        Ok(PageStats::new(pdf, page_index, metrics, status))
    }

    /// Measure and classify every page in order. Stops at the first failure.
    #[instrument(skip_all, fields(pdf = %pdf.display()))]
    pub fn analyze_document(&self, pdf: &Path) -> Result<Vec<PageStats>> {
        let page_count = PdfReader::open(pdf)?.page_count();
        (0..page_count)
            .map(|page_index| self.page_stats(pdf, page_index))
            .collect()
    }
}

/// Percentage of pixels with ink, rounded to two decimals.
///
/// Grayscale rasters (with or without alpha) compare luma to `threshold`;
/// colour rasters count a pixel when any of R, G, B is below it. Alpha is
/// ignored and wider sample types are narrowed to 8 bits first.
pub fn non_white_percent(image: &DynamicImage, threshold: u8) -> f64 {
    let total = image.width() as u64 * image.height() as u64;
    if total == 0 {
        return 0.0;
    }

    let non_white = if image.color().channel_count() < 3 {
        image
            .to_luma8()
            .pixels()
            .filter(|pixel| pixel.0[0] < threshold)
            .count()
    } else {
        image
            .to_rgb8()
            .pixels()
            .filter(|pixel| pixel.0.iter().any(|&channel| channel < threshold))
            .count()
    };

    round2(non_white as f64 / total as f64 * 100.0)
}

/// Summed text-block area over the raster area, as a percentage rounded to
/// two decimals. Overlapping blocks are counted twice.
pub fn content_area_percent(blocks: &[TextBlock], width: u32, height: u32) -> f64 {
    let page_area = width as f64 * height as f64;
    if blocks.is_empty() || page_area == 0.0 {
        return 0.0;
    }
    let covered: f64 = blocks.iter().map(TextBlock::area).sum();
    round2(covered / page_area * 100.0)
}
