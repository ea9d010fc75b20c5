//! Configuration tree traversal.
//!
//! Three contexts mirror where nginx allows `server` blocks:
//!
//! | context  | `http` block | `server` block | `include` | `listen` / `server_name` |
//! |----------|--------------|----------------|-----------|--------------------------|
//! | main     | enter http   | new record     | splice    | ignored                  |
//! | http     | ignored      | new record     | splice    | ignored                  |
//! | server   | ignored      | ignored        | splice    | added to the record      |
//!
//! An include is spliced in place: the matched files' nodes are walked in the
//! context that contained the `include` directive.

use crate::error::Result;
use crate::include::IncludeResolver;
use crate::parser::ConfigNode;
use crate::server::ServerRecord;

/// Walks parsed nodes and appends a [`ServerRecord`] per `server` block.
pub struct TreeWalker<'a> {
    includes: &'a mut IncludeResolver,
    servers: &'a mut Vec<ServerRecord>,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker appending to `servers`.
    pub const fn new(
        includes: &'a mut IncludeResolver,
        servers: &'a mut Vec<ServerRecord>,
    ) -> Self {
        Self { includes, servers }
    }

    /// Walks top-level nodes.
    ///
    /// # Errors
    ///
    /// Propagates any include expansion error.
    pub fn walk_main(&mut self, nodes: &[ConfigNode]) -> Result<()> {
        for node in nodes {
            match node {
                ConfigNode::Block { name, children, .. } if name == "http" => {
                    self.walk_http(children)?;
                }
                ConfigNode::Block { name, children, .. } if name == "server" => {
                    self.walk_server_block(children)?;
                }
                ConfigNode::Directive { name, argument } if name == "include" => {
                    self.walk_include(argument, |w, nodes| w.walk_main(nodes))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Walks the contents of an `http` block.
    ///
    /// # Errors
    ///
    /// Propagates any include expansion error.
    pub fn walk_http(&mut self, nodes: &[ConfigNode]) -> Result<()> {
        for node in nodes {
            match node {
                ConfigNode::Block { name, children, .. } if name == "server" => {
                    self.walk_server_block(children)?;
                }
                ConfigNode::Directive { name, argument } if name == "include" => {
                    self.walk_include(argument, |w, nodes| w.walk_http(nodes))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Walks the contents of a `server` block into `server`.
    ///
    /// # Errors
    ///
    /// Propagates any include expansion error.
    pub fn walk_server(&mut self, nodes: &[ConfigNode], server: &mut ServerRecord) -> Result<()> {
        for node in nodes {
            let ConfigNode::Directive { name, argument } = node else {
                continue;
            };
            match name.as_str() {
                "listen" => server.add_address(argument),
                "server_name" => server.add_name(argument),
                "include" => {
                    self.walk_include(argument, |w, nodes| w.walk_server(nodes, server))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn walk_server_block(&mut self, nodes: &[ConfigNode]) -> Result<()> {
        let mut server = ServerRecord::new();
        self.walk_server(nodes, &mut server)?;
        tracing::debug!(
            index = self.servers.len(),
            names = ?server.names(),
            addresses = ?server.addresses(),
            "Found server block"
        );
        self.servers.push(server);
        Ok(())
    }

    /// Expands `pattern` and walks each matched file with `walk`.
    fn walk_include<F>(&mut self, pattern: &str, mut walk: F) -> Result<()>
    where
        F: FnMut(&mut Self, &[ConfigNode]) -> Result<()>,
    {
        let files = self.includes.expand(pattern)?;
        tracing::debug!(
            pattern = %pattern,
            files = files.len(),
            depth = self.includes.depth(),
            "Expanding include"
        );
        for file in &files {
            self.includes.enter(&file.path)?;
            let result = walk(self, &file.nodes);
            self.includes.leave();
            result?;
        }
        Ok(())
    }
}
