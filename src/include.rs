//! `include` expansion.
//!
//! Patterns are shell globs, relative ones joined to the configuration
//! directory. Matched files are processed in lexicographic path order so the
//! result never depends on directory listing order.

use std::path::{Path, PathBuf};

use crate::error::{HostsError, Result};
use crate::parser::{self, ConfigNode};

/// One parsed file matched by an include pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedFile {
    /// Canonical absolute path of the file.
    pub path: PathBuf,
    /// Top-level nodes of the file.
    pub nodes: Vec<ConfigNode>,
}

/// Expands `include` patterns and guards against include cycles.
///
/// The resolver tracks the files whose contents are currently being walked.
/// Callers bracket each walk with [`enter`](Self::enter) and
/// [`leave`](Self::leave); entering a file that is already on that stack is a
/// [`HostsError::CircularInclude`].
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    base_dir: PathBuf,
    active: Vec<PathBuf>,
}

impl IncludeResolver {
    /// Creates a resolver for patterns relative to `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            active: Vec::new(),
        }
    }

    /// Returns the base directory for relative patterns.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Expands `pattern` and returns the concatenated nodes of every match.
    ///
    /// A pattern matching nothing yields an empty list.
    ///
    /// # Errors
    ///
    /// See [`expand`](Self::expand).
    pub fn resolve(&self, pattern: &str) -> Result<Vec<ConfigNode>> {
        Ok(self
            .expand(pattern)?
            .into_iter()
            .flat_map(|file| file.nodes)
            .collect())
    }

    /// Expands `pattern`, then reads and parses every matched file.
    ///
    /// All files are parsed before any is returned, in sorted path order.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Pattern`] for invalid glob syntax,
    /// [`HostsError::Io`] if a directory cannot be listed or a matched file
    /// cannot be read, and [`HostsError::Parse`] if a matched file is not
    /// well-formed.
    pub fn expand(&self, pattern: &str) -> Result<Vec<IncludedFile>> {
        let full = self.full_pattern(pattern);
        let mut paths = Vec::new();
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..glob::MatchOptions::new()
        };
        let matches = glob::glob_with(&full, options).map_err(|source| HostsError::Pattern {
            pattern: full.clone(),
            source,
        })?;
        for entry in matches {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                HostsError::io(path, e.into_error())
            })?;
            paths.push(path);
        }
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        if paths.is_empty() {
            tracing::debug!(
                pattern = %full,
                base_dir = %self.base_dir().display(),
                "Include pattern matched no files"
            );
        }

        paths
            .into_iter()
            .map(|path| -> Result<IncludedFile> {
                let nodes = load(&path)?;
                let path = canonical(&path)?;
                tracing::debug!(path = %path.display(), nodes = nodes.len(), "Included file");
                Ok(IncludedFile { path, nodes })
            })
            .collect()
    }

    /// Marks `path` as being walked.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::CircularInclude`] if `path` is already being walked.
    pub fn enter(&mut self, path: &Path) -> Result<()> {
        if self.active.iter().any(|p| p == path) {
            tracing::warn!(path = %path.display(), "Circular include detected");
            return Err(HostsError::CircularInclude {
                path: path.to_path_buf(),
                chain: self.active.clone(),
            });
        }
        self.active.push(path.to_path_buf());
        Ok(())
    }

    /// Ends the walk of the most recently entered file.
    pub fn leave(&mut self) {
        self.active.pop();
    }

    /// Number of files currently being walked.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    fn full_pattern(&self, pattern: &str) -> String {
        if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            self.base_dir.join(pattern).to_string_lossy().into_owned()
        }
    }
}

/// Reads and parses one configuration file.
///
/// # Errors
///
/// Returns [`HostsError::Io`] if the file cannot be read and
/// [`HostsError::Parse`] if it is not well-formed.
pub fn load(path: &Path) -> Result<Vec<ConfigNode>> {
    let source = std::fs::read_to_string(path).map_err(|e| HostsError::io(path, e))?;
    parser::parse(&source).map_err(|source| HostsError::Parse {
        origin: path.display().to_string(),
        source,
    })
}

/// Resolves symlinks and `..` so the same file always has the same key.
pub(crate) fn canonical(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| HostsError::io(path, e))
}
