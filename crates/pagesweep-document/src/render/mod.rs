// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rendering: the capability the analyzer depends on to turn a page into
// pixels and text-block rectangles.

pub mod poppler;

use std::path::Path;

use image::DynamicImage;
use pagesweep_core::error::Result;

pub use poppler::PopplerRenderer;

/// Axis-aligned bounding box of one text block, in raster pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlock {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TextBlock {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Turns one page of a PDF into the inputs of page analysis.
///
/// Implementations must not modify the document. `page_index` is 0-based.
/// Text blocks are reported in the same coordinate space as the raster.
pub trait PageRenderer {
    /// Rasterise the page.
    fn render_page(&self, pdf: &Path, page_index: usize) -> Result<DynamicImage>;

    /// Bounding boxes of the page's text blocks.
    fn text_blocks(&self, pdf: &Path, page_index: usize) -> Result<Vec<TextBlock>>;
}
