//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// Result alias for host export operations.
pub type Result<T> = std::result::Result<T, HostsError>;

/// Errors returned while loading an nginx configuration tree.
#[derive(Debug, Error)]
pub enum HostsError {
    /// A configuration file could not be opened, read or listed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not well-formed.
    #[error("parse error in {origin}: {source}")]
    Parse {
        /// File path or caller-supplied label of the document.
        origin: String,
        /// Position and cause.
        #[source]
        source: ParseError,
    },

    /// An `include` argument is not a valid glob pattern.
    #[error("invalid include pattern {pattern:?}: {source}")]
    Pattern {
        /// The pattern after joining with the config directory.
        pattern: String,
        /// The underlying error.
        #[source]
        source: glob::PatternError,
    },

    /// A file includes itself, directly or through other files.
    #[error("circular include of {}", .path.display())]
    CircularInclude {
        /// The file that was about to be entered a second time.
        path: PathBuf,
        /// Files being expanded when the cycle was found, outermost first.
        chain: Vec<PathBuf>,
    },

    /// Invalid configuration values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl HostsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the underlying I/O error is `NotFound`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
