//! Server discovery session.

use std::fmt;
use std::io::Read;
use std::ops::Index;
use std::path::Path;

use crate::config::ExportConfig;
use crate::error::{HostsError, Result};
use crate::include::{self, IncludeResolver};
use crate::parser::{self, ConfigNode};
use crate::render;
use crate::server::ServerRecord;
use crate::walker::TreeWalker;

/// Every `server` block found in one or more nginx configuration documents.
///
/// Records are kept in discovery order: declaration order, depth-first
/// through includes. Each `load_*` call appends to the same collection.
///
/// # Example
///
/// ```
/// use nginx_hosts::{ExportConfig, ServerCollection};
///
/// let mut servers = ServerCollection::new(ExportConfig::new().with_default_addr("9.9.9.9"));
/// servers
///     .load_str(
///         "server { listen 80; server_name a.com b.com; }\n\
///          server { listen 443; server_name a.com; }",
///         "inline",
///     )
///     .unwrap();
///
/// assert_eq!(servers.len(), 2);
/// assert_eq!(servers.render(), "9.9.9.9 b.com\n9.9.9.9 a.com");
/// ```
#[derive(Debug)]
pub struct ServerCollection {
    config: ExportConfig,
    includes: IncludeResolver,
    servers: Vec<ServerRecord>,
}

impl ServerCollection {
    /// Creates an empty collection; relative includes resolve against
    /// `config.config_dir`.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let includes = IncludeResolver::new(config.config_dir.clone());
        Self {
            config,
            includes,
            servers: Vec::new(),
        }
    }

    /// Returns the export configuration.
    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Parses and walks a configuration document held in memory.
    ///
    /// `origin` labels the document in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Parse`] if the document is not well-formed, or
    /// any error raised while expanding its includes.
    pub fn load_str(&mut self, source: &str, origin: &str) -> Result<()> {
        let nodes = parser::parse(source).map_err(|source| HostsError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        self.walk(&nodes)
    }

    /// Reads a document from `reader` and walks it.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`] if reading fails, otherwise as
    /// [`load_str`](Self::load_str).
    pub fn load_reader(&mut self, mut reader: impl Read, origin: &str) -> Result<()> {
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(|e| HostsError::io(origin, e))?;
        self.load_str(&source, origin)
    }

    /// Reads, parses and walks the file at `path`.
    ///
    /// The file takes part in include cycle detection, so a file including
    /// itself is reported as [`HostsError::CircularInclude`].
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`] if the file cannot be read, otherwise as
    /// [`load_str`](Self::load_str).
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let nodes = include::load(path)?;
        let canonical = include::canonical(path)?;
        tracing::info!(path = %path.display(), "Loading nginx configuration");

        self.includes.enter(&canonical)?;
        let result = self.walk(&nodes);
        self.includes.leave();
        result
    }

    fn walk(&mut self, nodes: &[ConfigNode]) -> Result<()> {
        let before = self.servers.len();
        TreeWalker::new(&mut self.includes, &mut self.servers).walk_main(nodes)?;
        tracing::debug!(found = self.servers.len() - before, "Walked configuration");
        Ok(())
    }

    /// Number of servers found so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Returns `true` if no server has been found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Returns the server at `index` in discovery order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ServerRecord> {
        self.servers.get(index)
    }

    /// Iterates over servers in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, ServerRecord> {
        self.servers.iter()
    }

    /// All servers in discovery order.
    #[must_use]
    pub fn as_slice(&self) -> &[ServerRecord] {
        &self.servers
    }

    /// Renders in the configured output format.
    #[must_use]
    pub fn render(&self) -> String {
        render::render(&self.servers, &self.config)
    }

    /// Renders hosts-file lines regardless of the configured format.
    #[must_use]
    pub fn render_hosts(&self) -> String {
        render::render_hosts(&self.servers, &self.config)
    }

    /// Renders dnsmasq lines regardless of the configured format.
    #[must_use]
    pub fn render_dnsmasq(&self) -> String {
        render::render_dnsmasq(&self.servers, &self.config)
    }
}

impl Index<usize> for ServerCollection {
    type Output = ServerRecord;

    fn index(&self, index: usize) -> &ServerRecord {
        &self.servers[index]
    }
}

impl<'a> IntoIterator for &'a ServerCollection {
    type Item = &'a ServerRecord;
    type IntoIter = std::slice::Iter<'a, ServerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.servers.iter()
    }
}

impl fmt::Display for ServerCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, server) in self.servers.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{server}")?;
        }
        Ok(())
    }
}
