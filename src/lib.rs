//! # nginx-hosts
//!
//! Export the virtual hosts of an nginx configuration as `/etc/hosts` lines
//! or dnsmasq `address=` overrides, so local name resolution can follow the
//! web server configuration.
//!
//! The configuration tree is walked from the main file: `server` blocks are
//! collected at top level and inside `http`, and `include` directives are
//! expanded as sorted glob matches, recursively and in place.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use nginx_hosts::{ExportConfig, OutputFormat, ServerCollection};
//!
//! let config = ExportConfig::new()
//!     .with_use_listen(true)
//!     .with_excluded_hosts(["localhost"])
//!     .with_format(OutputFormat::Dnsmasq);
//!
//! let mut servers = ServerCollection::new(config);
//! servers.load_file("/etc/nginx/nginx.conf")?;
//! println!("{}", servers.render());
//! ```
//!
//! ## Name precedence
//!
//! A host name is bound to at most one server. When several `server` blocks
//! declare the same name, the one declared last wins; servers are written in
//! declaration order.
//!
//! ## Address selection
//!
//! Every name is bound to [`ExportConfig::default_addr`] unless
//! [`ExportConfig::use_listen`] is set, in which case the first
//! `listen <ipv4>:<port>` of the server is used when present.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod include;
pub mod parser;
pub mod render;
pub mod server;
pub mod util;
pub mod walker;

pub use collection::ServerCollection;
pub use config::{ExportConfig, OutputFormat};
pub use error::{HostsError, Result};
pub use include::IncludeResolver;
pub use parser::{ConfigNode, ParseError};
pub use server::ServerRecord;
pub use walker::TreeWalker;
