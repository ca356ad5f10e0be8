/// SVG rasterizer for PNG export

use std::sync::{Arc, OnceLock};

use log::debug;
use resvg::tiny_skia;
use resvg::usvg;

use crate::rendering::fonts;
use crate::rendering::layout::LABEL_SIZE_MM;
use crate::rendering::Screenshot;
use crate::{Error, Result};

static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// Only the bundled faces, so glyphs match the widths layout measured with
fn label_fonts() -> Arc<usvg::fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_font_data(fonts::BOLD.to_vec());
            db.load_font_data(fonts::BOLD_OBLIQUE.to_vec());
            db.set_sans_serif_family(fonts::FAMILY);
            debug!("loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Edge length in device pixels of a label printed at `dpi`
pub fn label_pixels(dpi: u32) -> u32 {
    (LABEL_SIZE_MM / 25.4 * dpi as f32).round() as u32
}

/// Rasterize a label SVG at `dpi` over an opaque white background.
pub fn rasterize_svg(svg: &str, dpi: u32) -> Result<Screenshot> {
    if dpi == 0 {
        return Err(Error::ConfigError("dpi must be positive".into()));
    }

    let mut opt = usvg::Options::default();
    opt.fontdb = label_fonts();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| Error::RenderError(format!("SVG parse: {}", e)))?;

    let side = label_pixels(dpi);
    let mut pixmap = tiny_skia::Pixmap::new(side, side)
        .ok_or_else(|| Error::RenderError(format!("Cannot allocate {}x{} pixmap", side, side)))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let scale = side as f32 / tree.size().width();
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // opaque background, so premultiplied RGBA is plain RGBA
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, side, side);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::RenderError(format!("PNG header: {}", e)))?;
        writer
            .write_image_data(pixmap.data())
            .map_err(|e| Error::RenderError(format!("PNG data: {}", e)))?;
    }
    debug!("rasterized label at {} dpi: {}x{}, {} bytes", dpi, side, side, png_data.len());

    Ok(Screenshot {
        width: side,
        height: side,
        png_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermal_printer_resolution() {
        assert_eq!(label_pixels(203), 799);
        assert_eq!(label_pixels(300), 1181);
    }

    #[test]
    fn rasterize_plain_square() {
        let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100mm\" height=\"100mm\" viewBox=\"0 0 100 100\"><rect x=\"0\" y=\"0\" width=\"50\" height=\"50\" fill=\"#000000\"/></svg>";
        let shot = rasterize_svg(svg, 96).unwrap();
        assert_eq!(shot.width, 378);
        assert_eq!(shot.height, 378);
        assert!(shot.png_data.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn bundled_faces_are_registered() {
        let db = label_fonts();
        assert_eq!(db.len(), 2);
        assert!(db.faces().all(|f| f.families.iter().any(|(name, _)| name == fonts::FAMILY)));
    }

    #[test]
    fn zero_dpi_is_rejected() {
        assert!(matches!(rasterize_svg("<svg/>", 0), Err(Error::ConfigError(_))));
    }
}
