//! Per-`server` block state.

use std::fmt;

use crate::util::is_ipv4_literal;

/// Listen addresses and host names collected from one `server` block.
///
/// # Example
///
/// ```
/// use nginx_hosts::ServerRecord;
///
/// let mut server = ServerRecord::new();
/// server.add_address(" unix:/run/app.sock ");
/// server.add_address("10.0.0.5:443 ssl");
/// server.add_name("app.local 0.0.0.0 www.app.local");
///
/// assert_eq!(server.names(), ["app.local", "www.app.local"]);
/// assert_eq!(server.resolved_address("127.0.0.1", true), "10.0.0.5");
/// assert_eq!(server.resolved_address("127.0.0.1", false), "127.0.0.1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerRecord {
    addresses: Vec<String>,
    names: Vec<String>,
}

impl ServerRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            addresses: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Raw `listen` arguments in declaration order.
    #[must_use]
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Host names in declaration order, IPv4 literals excluded.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Appends a `listen` argument.
    pub fn add_address(&mut self, raw: &str) {
        self.addresses.push(raw.trim().to_string());
    }

    /// Appends the names of a `server_name` argument.
    ///
    /// Tokens that are IPv4 literals are dropped.
    pub fn add_name(&mut self, raw: &str) {
        self.names.extend(
            raw.split_whitespace()
                .filter(|name| !is_ipv4_literal(name))
                .map(ToString::to_string),
        );
    }

    /// Address to bind this server's names to.
    ///
    /// With `use_listen`, the IPv4 host part of the first `listen` argument
    /// of the form `<ipv4>:<rest>` wins. Otherwise, or if no argument has
    /// that form, `default` is returned.
    #[must_use]
    pub fn resolved_address<'a>(&'a self, default: &'a str, use_listen: bool) -> &'a str {
        if !use_listen {
            return default;
        }
        self.addresses
            .iter()
            .filter_map(|addr| {
                let mut parts = addr.split(':');
                let host = parts.next()?;
                parts.next()?;
                is_ipv4_literal(host).then_some(host)
            })
            .next()
            .unwrap_or(default)
    }
}

impl fmt::Display for ServerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.addresses, self.names)
    }
}
