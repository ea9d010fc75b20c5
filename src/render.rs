//! Output formats.
//!
//! Servers are visited last-declared first so a name declared by several
//! servers is bound to the latest one. The collected lines are then reversed
//! as a whole: servers come out in declaration order, and the hosts lines of
//! a single server come out last name first.

use std::collections::HashSet;

use crate::config::{ExportConfig, OutputFormat};
use crate::server::ServerRecord;

/// Renders `servers` in the format selected by `config`.
#[must_use]
pub fn render(servers: &[ServerRecord], config: &ExportConfig) -> String {
    match config.format {
        OutputFormat::Hosts => render_hosts(servers, config),
        OutputFormat::Dnsmasq => render_dnsmasq(servers, config),
    }
}

/// Renders `address name` lines for a hosts file.
///
/// Excluded names, names already bound to a later server and wildcard names
/// (containing `*`) are skipped.
///
/// ```
/// use nginx_hosts::{render::render_hosts, ExportConfig, ServerRecord};
///
/// let mut server = ServerRecord::new();
/// server.add_name("app.local *.app.local");
///
/// assert_eq!(render_hosts(&[server], &ExportConfig::new()), "127.0.0.1 app.local");
/// ```
#[must_use]
pub fn render_hosts(servers: &[ServerRecord], config: &ExportConfig) -> String {
    let mut names = Names::new(config);
    let mut lines = Vec::new();

    for server in servers.iter().rev() {
        let addr = server.resolved_address(&config.default_addr, config.use_listen);
        for name in server.names() {
            if name.contains('*') || !names.claim(name) {
                continue;
            }
            lines.push(format!("{addr} {name}"));
        }
    }

    lines.reverse();
    lines.join("\n")
}

/// Renders one `address=/name1/name2/address` line per server for dnsmasq.
///
/// Excluded names and names already bound to a later server are skipped.
/// Wildcard names are kept. A server left without names produces no line.
#[must_use]
pub fn render_dnsmasq(servers: &[ServerRecord], config: &ExportConfig) -> String {
    let mut names = Names::new(config);
    let mut lines = Vec::new();

    for server in servers.iter().rev() {
        let addr = server.resolved_address(&config.default_addr, config.use_listen);
        let claimed: Vec<&str> = server
            .names()
            .iter()
            .map(String::as_str)
            .filter(|name| names.claim(name))
            .collect();
        if !claimed.is_empty() {
            lines.push(format!("address=/{}/{addr}", claimed.join("/")));
        }
    }

    lines.reverse();
    lines.join("\n")
}

/// Names already emitted plus the exclusion list.
struct Names<'a> {
    excluded: HashSet<&'a str>,
    seen: HashSet<String>,
}

impl<'a> Names<'a> {
    fn new(config: &'a ExportConfig) -> Self {
        Self {
            excluded: config.excluded_hosts.iter().map(String::as_str).collect(),
            seen: HashSet::new(),
        }
    }

    /// Marks `name` as emitted. Returns `false` if it is excluded or was
    /// already emitted.
    fn claim(&mut self, name: &str) -> bool {
        if self.excluded.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string())
    }
}
