//! Label rendering pipeline
//!
//! `LabelRecord` -> [`layout::LabelLayout`] -> [`paint::PaintCommand`]s ->
//! SVG, optionally rasterized to PNG. Each stage is a pure function of its
//! input, so rendering the same record with the same symbols twice yields
//! byte-identical output.

pub mod fonts;
pub mod layout;
pub mod paint;
#[cfg(feature = "raster")]
pub mod raster;
pub mod svg;
pub mod text;

use log::debug;
use sha2::{Digest, Sha256};

use crate::symbols::EncodedSymbols;
use crate::{LabelRecord, RenderConfig, Result, TextSnapshot};
use layout::{LabelLayout, NodeContent};
use paint::PaintCommand;

/// A rasterized label
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// One render of a label, ready for export
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    layout: LabelLayout,
    commands: Vec<PaintCommand>,
    dpi: u32,
    font_family: String,
}

impl RenderedLabel {
    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn to_svg(&self) -> Result<String> {
        svg::to_svg(&self.commands, self.layout.width, &self.font_family)
    }

    /// Rasterize at the configured dpi
    #[cfg(feature = "raster")]
    pub fn rasterize(&self) -> Result<Screenshot> {
        raster::rasterize_svg(&self.to_svg()?, self.dpi)
    }

    #[cfg(feature = "raster")]
    pub fn to_png(&self) -> Result<Vec<u8>> {
        Ok(self.rasterize()?.png_data)
    }

    /// Every visible text line, one per row as `region: text`
    pub fn text_snapshot(&self) -> TextSnapshot {
        let mut text = String::new();
        for node in &self.layout.nodes {
            let NodeContent::Text(runs) = &node.content else {
                continue;
            };
            for run in runs.iter().filter(|r| !r.text.is_empty()) {
                text.push_str(node.region.name());
                text.push_str(": ");
                text.push_str(&run.text);
                text.push('\n');
            }
        }
        // caption first, then the tracking number
        let title = self
            .layout
            .text_lines(layout::RegionId::ResiText)
            .get(1)
            .map(|s| s.to_string())
            .unwrap_or_default();
        TextSnapshot { title, text }
    }

    /// SHA-256 of the SVG output, hex encoded
    pub fn digest(&self) -> Result<String> {
        let svg = self.to_svg()?;
        Ok(hex::encode(Sha256::digest(svg.as_bytes())))
    }
}

/// Render `record` using whichever of `symbols` are current for it.
///
/// Symbols encoded from values the record no longer holds are ignored, and
/// missing ones leave their region blank; this never fails.
pub fn render(record: &LabelRecord, symbols: &EncodedSymbols, config: &RenderConfig) -> RenderedLabel {
    let layout = layout::layout_label(record, symbols, config);
    let commands = paint::paint_layout(&layout);
    debug!(
        "rendered label {:?}: {} nodes, {} paint commands",
        record.resi_number,
        layout.nodes.len(),
        commands.len()
    );
    RenderedLabel {
        layout,
        commands,
        dpi: config.dpi,
        font_family: config.font_family.clone(),
    }
}
