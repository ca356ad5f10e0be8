//! QR code for the order identifier.
//!
//! The symbol is sampled into a small square bitmap with no margin, the same
//! way a canvas-backed QR renderer fills a fixed pixel width.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::SymbolKind;
use crate::{Error, Result};

/// Target bitmap sizes the footer layout is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrSize {
    /// 50px square
    Compact,
    /// 65px square, fills the footer QR column
    #[default]
    Standard,
}

impl QrSize {
    pub fn pixels(self) -> u32 {
        match self {
            QrSize::Compact => 50,
            QrSize::Standard => 65,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    pub size: QrSize,
    /// Pixels per module when the target is smaller than the symbol
    pub fallback_scale: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: QrSize::default(),
            fallback_scale: 2,
        }
    }
}

/// An encoded QR symbol and its sampled bitmap
#[derive(Debug, Clone, PartialEq)]
pub struct QrImage {
    source: String,
    side: usize,
    modules: Vec<bool>,
    size_px: u32,
    /// Greyscale, row-major, 0 = dark, 255 = light
    pixels: Vec<u8>,
}

impl QrImage {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Modules per side
    pub fn modules_per_side(&self) -> usize {
        self.side
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.side && y < self.side && self.modules[y * self.side + x]
    }

    /// Bitmap edge length in pixels
    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Encode the bitmap as an 8-bit greyscale PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.size_px, self.size_px);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| Error::RenderError(format!("QR PNG header: {}", e)))?;
            writer
                .write_image_data(&self.pixels)
                .map_err(|e| Error::RenderError(format!("QR PNG data: {}", e)))?;
        }
        Ok(buf)
    }

    /// `data:image/png;base64,...` URI for embedding
    pub fn to_data_uri(&self) -> Result<String> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.to_png()?)))
    }
}

/// Encode an order identifier as a QR symbol (error correction M).
///
/// Empty input yields `Ok(None)`; data that does not fit any QR version is an
/// [`Error::EncodingError`].
pub fn encode_qr(value: &str, options: &QrOptions) -> Result<Option<QrImage>> {
    if value.is_empty() {
        return Ok(None);
    }

    let code = QrCode::with_error_correction_level(value.as_bytes(), EcLevel::M).map_err(|e| {
        Error::EncodingError {
            symbol: SymbolKind::Qr,
            reason: e.to_string(),
        }
    })?;

    let side = code.width();
    let modules: Vec<bool> = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();

    let target = options.size.pixels();
    let (size_px, scale) = if target as usize >= side {
        (target, target as f32 / side as f32)
    } else {
        let scale = options.fallback_scale.max(1);
        (side as u32 * scale, scale as f32)
    };
    debug!(
        "qr for {:?}: {} modules, {}px at scale {:.3}",
        value, side, size_px, scale
    );

    let mut pixels = Vec::with_capacity((size_px * size_px) as usize);
    for py in 0..size_px {
        let my = ((py as f32 / scale) as usize).min(side - 1);
        for px in 0..size_px {
            let mx = ((px as f32 / scale) as usize).min(side - 1);
            pixels.push(if modules[my * side + mx] { 0 } else { 255 });
        }
    }

    Ok(Some(QrImage {
        source: value.to_string(),
        side,
        modules,
        size_px,
        pixels,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_symbol() {
        assert!(encode_qr("", &QrOptions::default()).unwrap().is_none());
    }

    #[test]
    fn bitmap_matches_target_size() {
        for size in [QrSize::Compact, QrSize::Standard] {
            let opts = QrOptions {
                size,
                ..Default::default()
            };
            let img = encode_qr("2601179M0WA1WA", &opts).unwrap().unwrap();
            assert_eq!(img.size_px(), size.pixels());
            assert_eq!(img.pixels().len(), (size.pixels() * size.pixels()) as usize);
            // zero margin: the finder pattern corner is dark
            assert_eq!(img.pixels()[0], 0);
        }
    }

    #[test]
    fn oversized_symbol_falls_back_to_integer_scale() {
        let long = "x".repeat(400);
        let img = encode_qr(&long, &QrOptions::default()).unwrap().unwrap();
        assert!(img.modules_per_side() > 65);
        assert_eq!(img.size_px(), img.modules_per_side() as u32 * 2);
    }

    #[test]
    fn too_much_data_is_an_encoding_error() {
        let huge = "9".repeat(10_000);
        assert!(matches!(
            encode_qr(&huge, &QrOptions::default()),
            Err(Error::EncodingError {
                symbol: SymbolKind::Qr,
                ..
            })
        ));
    }

    #[test]
    fn data_uri_is_png() {
        let img = encode_qr("2601179M0WA1WA", &QrOptions::default()).unwrap().unwrap();
        let uri = img.to_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
