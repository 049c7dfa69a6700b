//! Input file handling: format detection and YAML document loading.
//!
//! Only YAML input is read. The legacy CTI and XML formats are detected by
//! extension and rejected with [`Error::UnsupportedFormat`] before any I/O.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

mod loader;

pub use loader::{DATA_PATH_ENV, DocumentLoader, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Cti,
    Xml,
}

impl Format {
    /// Detects the format from a file extension, case-insensitively.
    ///
    /// Anything that is not a legacy format is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("cti") => Format::Cti,
            Some("xml") => Format::Xml,
            _ => Format::Yaml,
        }
    }

    /// Fails for formats that are recognized but no longer read.
    pub fn ensure_supported(path: &Path) -> Result<()> {
        match Self::from_path(path) {
            Format::Yaml => Ok(()),
            format => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                format,
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "YAML"),
            Format::Cti => write!(f, "CTI"),
            Format::Xml => write!(f, "XML"),
        }
    }
}
