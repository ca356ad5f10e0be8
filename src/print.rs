//! Print trigger: hands a rendered label to a host-side sink.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use log::info;

use crate::rendering::RenderedLabel;
use crate::{Error, Result};

/// Output encodings a label can be exported in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            other => Err(Error::ConfigError(format!("Unsupported export format: {}", other))),
        }
    }
}

/// Something that can receive a finished label. Printing returns no data.
pub trait PrintTarget: Send + Sync {
    fn print(&self, label: &RenderedLabel) -> Result<()>;
}

/// Writes the label to a file
#[derive(Debug, Clone)]
pub struct FileExport {
    path: PathBuf,
    format: ExportFormat,
}

impl FileExport {
    pub fn new(path: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Export in the format named by the file extension
    pub fn for_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = ExportFormat::from_path(&path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Cannot tell export format from {:?}; use .svg or .png",
                path
            ))
        })?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }
}

impl PrintTarget for FileExport {
    fn print(&self, label: &RenderedLabel) -> Result<()> {
        let bytes = match self.format {
            ExportFormat::Svg => label.to_svg()?.into_bytes(),
            #[cfg(feature = "raster")]
            ExportFormat::Png => label.to_png()?,
            #[cfg(not(feature = "raster"))]
            ExportFormat::Png => {
                return Err(Error::ExportError(
                    "PNG export requires the `raster` feature".into(),
                ))
            }
        };
        fs::write(&self.path, &bytes).map_err(|e| {
            Error::ExportError(format!("Writing {:?}: {}", self.path, e))
        })?;
        info!("exported {} label to {:?} ({} bytes)", self.format, self.path, bytes.len());
        Ok(())
    }
}

/// A finished job as seen by [`RecordingPrinter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    /// SHA-256 of the label SVG
    pub digest: String,
    pub title: String,
}

/// Keeps every printed job in memory
#[derive(Debug, Default)]
pub struct RecordingPrinter {
    jobs: Mutex<Vec<PrintJob>>,
}

impl RecordingPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<PrintJob> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PrintTarget for RecordingPrinter {
    fn print(&self, label: &RenderedLabel) -> Result<()> {
        let job = PrintJob {
            digest: label.digest()?,
            title: label.text_snapshot().title,
        };
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(job);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a/label.SVG")), Some(ExportFormat::Svg));
        assert_eq!(ExportFormat::from_path(Path::new("label.png")), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::from_path(Path::new("label.pdf")), None);
        assert_eq!(ExportFormat::from_path(Path::new("label")), None);
    }

    #[test]
    fn unknown_extension_is_a_config_error() {
        assert!(matches!(FileExport::for_path("out.txt"), Err(Error::ConfigError(_))));
    }
}
