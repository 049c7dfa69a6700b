//! Error types for phase construction.
//!
//! Every failure in the construction pipeline is fatal for the call that
//! raised it. Errors are grouped by what went wrong: malformed input
//! ([`Error::Structural`]), a name that could not be resolved
//! ([`Error::ReferenceNotFound`]), an unknown model key
//! ([`Error::ModelNotFound`]), and contradictory declarations
//! ([`Error::Consistency`]).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::io::Format;

/// Position of a node inside a parsed document.
///
/// Carries the originating file (if the document came from a file) and the
/// key path from the document root, e.g. `phases[1].species`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    file: Option<Arc<Path>>,
    path: String,
}

impl Location {
    pub fn new(file: Option<Arc<Path>>, path: impl Into<String>) -> Self {
        Self {
            file,
            path: path.into(),
        }
    }

    /// Location of a document root.
    pub fn root(file: Option<Arc<Path>>) -> Self {
        Self::new(file, String::new())
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn shared_file(&self) -> Option<Arc<Path>> {
        self.file.clone()
    }

    pub(crate) fn child_key(&self, key: &str) -> Self {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };
        Self::new(self.file.clone(), path)
    }

    pub(crate) fn child_index(&self, index: usize) -> Self {
        Self::new(self.file.clone(), format!("{}[{}]", self.path, index))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}", file.display())?,
            None => f.write_str("<input>")?,
        }
        if self.path.is_empty() {
            f.write_str(": <root>")
        } else {
            write!(f, ": {}", self.path)
        }
    }
}

/// What kind of named thing could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Element,
    Species,
    Section,
    File,
    Phase,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Element => write!(f, "element"),
            ReferenceKind::Species => write!(f, "species"),
            ReferenceKind::Section => write!(f, "section"),
            ReferenceKind::File => write!(f, "file"),
            ReferenceKind::Phase => write!(f, "phase"),
        }
    }
}

/// Which factory a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Thermo,
    StandardState,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Thermo => write!(f, "thermo"),
            RegistryKind::StandardState => write!(f, "standard-state"),
        }
    }
}

/// Errors raised while loading documents or assembling a phase.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing field, or a value of the wrong shape.
    #[error("{location}: {message}")]
    Structural { location: Location, message: String },

    /// A referenced element, species, section, file or phase does not exist.
    #[error("{location}: {kind} '{name}' not found in {source_name}")]
    ReferenceNotFound {
        kind: ReferenceKind,
        name: String,
        source_name: String,
        location: Location,
    },

    /// No constructor is registered under the requested key or alias.
    #[error("{registry} model '{key}' not found")]
    ModelNotFound { registry: RegistryKind, key: String },

    /// Declarations that contradict each other.
    #[error("{location}: {message}")]
    Consistency { location: Location, message: String },

    /// A legacy input format that is rejected instead of being mis-parsed.
    #[error("the {format} format is no longer supported: {}", path.display())]
    UnsupportedFormat { path: PathBuf, format: Format },

    /// A chain of section redirects that revisits one of its own hops.
    #[error("circular section reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    /// A deprecation notice promoted to an error by configuration.
    #[error("{origin}: deprecated: {message}")]
    Deprecated { origin: String, message: String },

    /// Registry key or alias conflicts.
    #[error("cannot register '{key}': {detail}")]
    Registration { key: String, detail: String },

    /// An operation on a phase object that violates its invariants.
    #[error("phase '{phase}': {detail}")]
    InvalidPhase { phase: String, detail: String },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn structural(location: &Location, message: impl Into<String>) -> Self {
        Self::Structural {
            location: location.clone(),
            message: message.into(),
        }
    }

    pub fn consistency(location: &Location, message: impl Into<String>) -> Self {
        Self::Consistency {
            location: location.clone(),
            message: message.into(),
        }
    }

    pub fn not_found(
        kind: ReferenceKind,
        name: impl Into<String>,
        source_name: impl Into<String>,
        location: &Location,
    ) -> Self {
        Self::ReferenceNotFound {
            kind,
            name: name.into(),
            source_name: source_name.into(),
            location: location.clone(),
        }
    }

    pub fn invalid_phase(phase: &str, detail: impl Into<String>) -> Self {
        Self::InvalidPhase {
            phase: phase.to_string(),
            detail: detail.into(),
        }
    }

    pub fn registration(key: &str, detail: impl Into<String>) -> Self {
        Self::Registration {
            key: key.to_string(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for phase construction.
pub type Result<T> = std::result::Result<T, Error>;
