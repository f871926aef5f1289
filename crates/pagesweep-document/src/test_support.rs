// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for unit tests: synthetic PDFs and renderers that need no
// external tools.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pagesweep_core::error::{PageSweepError, Result};

use crate::render::{PageRenderer, TextBlock};

/// Side length of the square rasters produced by [`ContentStreamRenderer`].
pub const RASTER_SIDE: u32 = 100;

/// Write a PDF with one page per entry. `true` pages draw the text
/// `Page <n>`; `false` pages have an empty content stream.
pub fn write_pdf(path: &Path, pages: &[bool]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (index, has_content) in pages.iter().enumerate() {
        let operations = if *has_content {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", index + 1))],
                ),
                Operation::new("ET", vec![]),
            ]
        } else {
            Vec::new()
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// The `Tj` text of every page in order; empty for pages that draw nothing.
pub fn page_contents(path: &Path) -> Vec<Vec<u8>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let raw = doc.get_page_content(*page_id).unwrap();
            let content = Content::decode(&raw).unwrap();
            content
                .operations
                .iter()
                .find(|op| op.operator == "Tj")
                .and_then(|op| op.operands.first())
                .and_then(|operand| operand.as_str().ok())
                .map(<[u8]>::to_vec)
                .unwrap_or_default()
        })
        .collect()
}

/// Renders pages without poppler: an empty content stream becomes a white
/// raster with no text blocks, anything else a raster with a dark patch and
/// one text block.
pub struct ContentStreamRenderer;

impl ContentStreamRenderer {
    fn has_content(pdf: &Path, page_index: usize) -> Result<bool> {
        let doc = Document::load(pdf).map_err(|err| PageSweepError::Pdf(err.to_string()))?;
        let page_id = *doc
            .get_pages()
            .get(&(page_index as u32 + 1))
            .ok_or_else(|| PageSweepError::Pdf(format!("no page {page_index}")))?;
        let raw = doc
            .get_page_content(page_id)
            .map_err(|err| PageSweepError::Pdf(err.to_string()))?;
        Ok(!raw.is_empty())
    }
}

impl PageRenderer for ContentStreamRenderer {
    fn render_page(&self, pdf: &Path, page_index: usize) -> Result<DynamicImage> {
        let mut raster = RgbImage::from_pixel(RASTER_SIDE, RASTER_SIDE, Rgb([255, 255, 255]));
        if Self::has_content(pdf, page_index)? {
            for y in 10..40 {
                for x in 10..40 {
                    raster.put_pixel(x, y, Rgb([20, 20, 20]));
                }
            }
        }
        Ok(DynamicImage::ImageRgb8(raster))
    }

    fn text_blocks(&self, pdf: &Path, page_index: usize) -> Result<Vec<TextBlock>> {
        if Self::has_content(pdf, page_index)? {
            Ok(vec![TextBlock::new(10.0, 10.0, 60.0, 30.0)])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Renderer whose every call fails, for exercising error paths.
pub struct BrokenRenderer;

impl PageRenderer for BrokenRenderer {
    fn render_page(&self, _pdf: &Path, _page_index: usize) -> Result<DynamicImage> {
        Err(PageSweepError::ExternalService {
            tool: "pdftoppm".into(),
            detail: "exit status: 99".into(),
        })
    }

    fn text_blocks(&self, _pdf: &Path, _page_index: usize) -> Result<Vec<TextBlock>> {
        Ok(Vec::new())
    }
}

/// Renderer standing in for a machine without poppler-utils installed.
pub struct MissingToolRenderer;

impl PageRenderer for MissingToolRenderer {
    fn render_page(&self, _pdf: &Path, _page_index: usize) -> Result<DynamicImage> {
        Err(PageSweepError::ExternalService {
            tool: "pdftoppm".into(),
            detail: "No such file or directory (os error 2)".into(),
        })
    }

    fn text_blocks(&self, _pdf: &Path, _page_index: usize) -> Result<Vec<TextBlock>> {
        Ok(Vec::new())
    }
}
