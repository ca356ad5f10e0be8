//! Bundled label faces.
//!
//! Layout measures text with the same DejaVu Sans faces the rasterizer
//! loads, so truncation decisions hold for the printed glyphs on any host.

use std::sync::OnceLock;

use log::warn;
use ttf_parser::{Face, GlyphId};

/// Family name written into the SVG and registered with the rasterizer
pub const FAMILY: &str = "DejaVu Sans";

pub static BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
pub static BOLD_OBLIQUE: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-BoldOblique.ttf");

// Used only if a bundled face fails to parse
const FALLBACK_EM: f32 = 0.7;

fn face(italic: bool) -> Option<&'static Face<'static>> {
    static UPRIGHT: OnceLock<Option<Face<'static>>> = OnceLock::new();
    static OBLIQUE: OnceLock<Option<Face<'static>>> = OnceLock::new();

    let (cell, data) = if italic {
        (&OBLIQUE, BOLD_OBLIQUE)
    } else {
        (&UPRIGHT, BOLD)
    };
    cell.get_or_init(|| match Face::parse(data, 0) {
        Ok(face) => Some(face),
        Err(e) => {
            warn!("bundled face (italic: {}) failed to parse: {}", italic, e);
            None
        }
    })
    .as_ref()
}

/// Horizontal advance of `c` in em. Characters the face lacks take the
/// `.notdef` advance, which is what the rasterizer draws for them.
pub fn advance_em(c: char, italic: bool) -> f32 {
    let Some(face) = face(italic) else {
        return FALLBACK_EM;
    };
    let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
    match face.glyph_hor_advance(glyph) {
        Some(units) => units as f32 / face.units_per_em() as f32,
        None => FALLBACK_EM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_faces_parse() {
        for italic in [false, true] {
            let face = face(italic).expect("bundled face");
            assert_eq!(face.units_per_em(), 2048);
            assert!(face.glyph_index('\u{2026}').is_some());
        }
    }

    #[test]
    fn wide_and_narrow_glyphs_differ() {
        assert!(advance_em('W', false) > advance_em('i', false));
        assert!((advance_em('\u{2026}', false) - 1.0).abs() < 1e-3);
    }
}
