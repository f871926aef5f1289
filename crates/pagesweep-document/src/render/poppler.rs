// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Poppler-backed page renderer.
//
// Rasters come from `pdftoppm`, text blocks from `pdftotext -bbox-layout`.
// Both tools ship with poppler-utils. Block coordinates are reported by
// pdftotext in PDF points and are scaled by dpi/72 into raster pixels.

use std::path::Path;
use std::process::{Command, Output};

use image::DynamicImage;
use pagesweep_core::error::{PageSweepError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument};

use super::{PageRenderer, TextBlock};

const PDFTOPPM: &str = "pdftoppm";
const PDFTOTEXT: &str = "pdftotext";

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f64 = 72.0;

/// Renders pages by shelling out to poppler-utils.
#[derive(Debug, Clone)]
pub struct PopplerRenderer {
    dpi: u32,
}

impl PopplerRenderer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    fn scale(&self) -> f64 {
        self.dpi as f64 / POINTS_PER_INCH
    }
}

impl Default for PopplerRenderer {
    fn default() -> Self {
        Self::new(72)
    }
}

impl PageRenderer for PopplerRenderer {
    #[instrument(skip(self), fields(dpi = self.dpi))]
    fn render_page(&self, pdf: &Path, page_index: usize) -> Result<DynamicImage> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("page");

        // pdftoppm uses 1-based page indices
        let page_number = (page_index + 1).to_string();
        let output = Command::new(PDFTOPPM)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(&page_number)
            .arg("-l")
            .arg(&page_number)
            .arg("-singlefile")
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|err| tool_error(PDFTOPPM, err.to_string()))?;
        check_status(PDFTOPPM, &output)?;

        let image_path = prefix.with_extension("png");
        let image = image::open(&image_path).map_err(|err| {
            tool_error(
                PDFTOPPM,
                format!("unreadable raster {}: {}", image_path.display(), err),
            )
        })?;
        debug!(width = image.width(), height = image.height(), "Page rasterised");
        Ok(image)
    }

    #[instrument(skip(self))]
    fn text_blocks(&self, pdf: &Path, page_index: usize) -> Result<Vec<TextBlock>> {
        let page_number = (page_index + 1).to_string();
        let output = Command::new(PDFTOTEXT)
            .arg("-bbox-layout")
            .arg("-f")
            .arg(&page_number)
            .arg("-l")
            .arg(&page_number)
            .arg(pdf)
            .arg("-")
            .output()
            .map_err(|err| tool_error(PDFTOTEXT, err.to_string()))?;
        check_status(PDFTOTEXT, &output)?;

        let xhtml = String::from_utf8_lossy(&output.stdout);
        let blocks = parse_bbox_layout(&xhtml, self.scale())?;
        debug!(blocks = blocks.len(), "Text blocks extracted");
        Ok(blocks)
    }
}

fn tool_error(tool: &str, detail: String) -> PageSweepError {
    PageSweepError::ExternalService {
        tool: tool.to_string(),
        detail,
    }
}

fn check_status(tool: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(tool_error(
        tool,
        format!("{}: {}", output.status, stderr.trim()),
    ))
}

/// Collect every `block` element of `pdftotext -bbox-layout` output, scaling
/// its `xMin`/`yMin`/`xMax`/`yMax` attributes by `scale`. `line` and `word`
/// elements are ignored.
fn parse_bbox_layout(xhtml: &str, scale: f64) -> Result<Vec<TextBlock>> {
    let mut reader = Reader::from_str(xhtml);
    let mut buf = Vec::new();
    let mut blocks = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if e.local_name().as_ref() == b"block" {
                    blocks.push(block_from(&e, scale)?);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(tool_error(
                    PDFTOTEXT,
                    format!(
                        "malformed layout at byte {}: {}",
                        reader.buffer_position(),
                        err
                    ),
                ));
            }
        }
        buf.clear();
    }

    Ok(blocks)
}

fn block_from(element: &BytesStart<'_>, scale: f64) -> Result<TextBlock> {
    // xMin, yMin, xMax, yMax
    let mut coords: [Option<f64>; 4] = [None; 4];

    for attr in element.attributes() {
        let attr =
            attr.map_err(|err| tool_error(PDFTOTEXT, format!("bad block attribute: {err}")))?;
        let slot = match attr.key.local_name().as_ref() {
            b"xMin" => 0,
            b"yMin" => 1,
            b"xMax" => 2,
            b"yMax" => 3,
            _ => continue,
        };
        coords[slot] = std::str::from_utf8(&attr.value)
            .ok()
            .and_then(|raw| raw.trim().parse::<f64>().ok());
    }

    let coord = |slot: usize, name: &str| -> Result<f64> {
        coords[slot].map(|value| value * scale).ok_or_else(|| {
            tool_error(PDFTOTEXT, format!("block without a numeric {name} attribute"))
        })
    };
    Ok(TextBlock::new(
        coord(0, "xMin")?,
        coord(1, "yMin")?,
        coord(2, "xMax")?,
        coord(3, "yMax")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<body>
<doc>
  <page width="612.000000" height="792.000000">
    <flow>
      <block xMin="72.000000" yMin="70.500000" xMax="172.000000" yMax="90.500000">
        <line xMin="72.000000" yMin="70.500000" xMax="172.000000" yMax="90.500000">
          <word xMin="72.000000" yMin="70.500000" xMax="120.000000" yMax="90.500000">Hello</word>
        </line>
      </block>
    </flow>
    <flow>
      <block xMin="72.000000" yMin="100.000000" xMax="82.000000" yMax="110.000000">
      </block>
    </flow>
  </page>
</doc>
</body>
</html>"#;

    #[test]
    fn parses_blocks_and_ignores_lines_and_words() {
        let blocks = parse_bbox_layout(SAMPLE, 1.0).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], TextBlock::new(72.0, 70.5, 172.0, 90.5));
        assert_eq!(blocks[1].area(), 100.0);
    }

    #[test]
    fn scales_points_to_pixels() {
        let blocks = parse_bbox_layout(SAMPLE, 2.0).unwrap();
        assert_eq!(blocks[1], TextBlock::new(144.0, 200.0, 164.0, 220.0));
    }

    #[test]
    fn page_without_blocks_is_empty() {
        let xhtml = r#"<doc><page width="612" height="792"></page></doc>"#;
        assert!(parse_bbox_layout(xhtml, 1.0).unwrap().is_empty());
    }

    #[test]
    fn malformed_block_is_an_error() {
        let xhtml = r#"<block xMin="1" yMin="oops" xMax="2" yMax="3">"#;
        let err = parse_bbox_layout(xhtml, 1.0).unwrap_err();
        assert!(err.to_string().contains("yMin"));
    }

    #[test]
    fn single_quoted_and_tab_separated_attributes_are_read() {
        let xhtml = "<doc><block\txMin=\"0\" yMin=\"0\" xMax=\"100\" yMax=\"100\"></block>\n\
                     <block xMin='0'\nyMin='0' xMax='50' yMax='50'></block></doc>";
        let blocks = parse_bbox_layout(xhtml, 1.0).unwrap();
        assert_eq!(
            blocks,
            vec![
                TextBlock::new(0.0, 0.0, 100.0, 100.0),
                TextBlock::new(0.0, 0.0, 50.0, 50.0),
            ]
        );
    }

    #[test]
    fn self_closing_block_is_counted() {
        let xhtml = r#"<page><block xMin="10" yMin="10" xMax="20" yMax="30"/></page>"#;
        assert_eq!(parse_bbox_layout(xhtml, 1.0).unwrap()[0].area(), 200.0);
    }

    #[test]
    fn mismatched_tags_are_an_error() {
        let err = parse_bbox_layout("<page><flow></page>", 1.0).unwrap_err();
        assert!(matches!(err, PageSweepError::ExternalService { .. }));
    }

    #[test]
    fn scale_follows_dpi() {
        assert_eq!(PopplerRenderer::new(144).scale(), 2.0);
        assert_eq!(PopplerRenderer::default().dpi(), 72);
    }
}
