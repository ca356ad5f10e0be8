//! Shiplabel
//!
//! Core of a single-label shipping label editor: a fixed 100mm x 100mm label
//! is rendered from a flat record of text fields, with a Code 128 barcode for
//! the tracking number and a QR code for the order id.
//!
//! # Features
//!
//! - **Fixed geometry**: no field value can move or resize a region; long text
//!   is truncated or clamped instead
//! - **Print-safe output**: SVG sized in millimetres, PNG at printer dpi
//!   (`raster` feature, on by default)
//! - **Non-blocking symbols**: barcode and QR encoding can run on a worker
//!   thread, with stale results discarded
//!
//! # Example
//!
//! ```no_run
//! use shiplabel::{LabelEditor, LabelField, RenderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut editor = LabelEditor::new();
//! editor.set_field(LabelField::SenderCity, "KOTA MALANG")?;
//!
//! let config = RenderConfig {
//!     dpi: 300,
//!     ..Default::default()
//! };
//! let label = editor.render(&config);
//! std::fs::write("label.svg", label.to_svg()?)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result, SymbolKind};

pub mod model;
pub use model::{FieldKind, FieldValue, LabelField, LabelRecord};

pub mod symbols;
pub use symbols::{EncodedSymbols, SymbolOptions, SymbolWorker};

pub mod rendering;
pub use rendering::{render, RenderedLabel};

pub mod editor;
pub use editor::{Confirm, FixedAnswer, LabelEditor, ResetOutcome};

pub mod print;
pub use print::{ExportFormat, FileExport, PrintJob, PrintTarget, RecordingPrinter};

/// Whether the cashless banner follows the record's `isCashless` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CashlessBanner {
    /// Banner text is always shown
    #[default]
    Always,
    /// Banner text is hidden when `isCashless` is false; the row keeps its
    /// height
    FollowRecord,
}

/// Configuration for rendering a label
///
/// The defaults target a 203 dpi thermal printer.
///
/// # Examples
///
/// ```
/// let cfg = shiplabel::RenderConfig::default();
/// assert_eq!(cfg.dpi, 203);
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Raster resolution for PNG export
    pub dpi: u32,
    /// Barcode and QR encoder settings
    pub symbols: SymbolOptions,
    pub cashless_banner: CashlessBanner,
    /// CSS font-family list written into the SVG. Layout always measures
    /// with the bundled face, so the first entry should stay
    /// [`rendering::fonts::FAMILY`].
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 203,
            symbols: SymbolOptions::default(),
            cashless_banner: CashlessBanner::default(),
            font_family: format!("{}, sans-serif", rendering::fonts::FAMILY),
        }
    }
}

/// A textual snapshot of a rendered label
///
/// Lists every visible line of text as `region: text`, suitable for textual
/// tests and quick inspection.
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    /// Tracking number as shown in the resi box
    pub title: String,
    /// One line per rendered text run
    pub text: String,
}
