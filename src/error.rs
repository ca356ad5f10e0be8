//! Error types for the label renderer

use std::fmt;

use thiserror::Error;

/// Result type alias for label operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which symbology an encoding error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Barcode,
    Qr,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Barcode => f.write_str("Code 128 barcode"),
            SymbolKind::Qr => f.write_str("QR code"),
        }
    }
}

/// Errors that can occur while editing, rendering or exporting a label
#[derive(Error, Debug)]
pub enum Error {
    /// A symbol could not be encoded. Renders recover from this by leaving
    /// the symbol region blank.
    #[error("{symbol} encoding failed: {reason}")]
    EncodingError { symbol: SymbolKind, reason: String },

    /// A value of the wrong kind was assigned to a field
    #[error("Field `{field}` expects a {expected} value")]
    FieldTypeError {
        field: &'static str,
        expected: &'static str,
    },

    /// Field identifier not recognised
    #[error("Unknown label field: {0}")]
    UnknownField(String),

    /// `field=value` assignment could not be parsed
    #[error("Invalid assignment `{0}` (expected FIELD=VALUE)")]
    InvalidAssignment(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to hand the label to an export target
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<fmt::Error> for Error {
    fn from(err: fmt::Error) -> Self {
        Error::RenderError(format!("SVG write failed: {}", err))
    }
}
