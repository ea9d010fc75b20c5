//! Export configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::HostsError;

/// Default nginx configuration directory, used to resolve relative includes.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/nginx";

/// Default main configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/nginx/nginx.conf";

/// Default address bound to every exported name.
pub const DEFAULT_ADDR: &str = "127.0.0.1";

/// Output format of the rendered name list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `address name` pairs, one per line, as in `/etc/hosts`.
    #[default]
    Hosts,
    /// `address=/name1/name2/address` lines for dnsmasq.
    Dnsmasq,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hosts => f.write_str("hosts"),
            Self::Dnsmasq => f.write_str("dnsmasq"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = HostsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hosts" => Ok(Self::Hosts),
            "dnsmasq" => Ok(Self::Dnsmasq),
            other => Err(HostsError::InvalidConfig(format!(
                "unknown output format {other:?} (expected hosts or dnsmasq)"
            ))),
        }
    }
}

/// Settings shared by loading and rendering.
///
/// # Example
///
/// ```
/// use nginx_hosts::{ExportConfig, OutputFormat};
///
/// let config = ExportConfig::new()
///     .with_default_addr("10.0.0.1")
///     .with_use_listen(true)
///     .with_format(OutputFormat::Dnsmasq);
///
/// assert_eq!(config.default_addr, "10.0.0.1");
/// assert!(config.use_listen);
/// assert_eq!(config.config_dir.to_str(), Some("/etc/nginx"));
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Base directory for relative `include` patterns.
    pub config_dir: PathBuf,

    /// Address used when no usable `listen` address is found.
    pub default_addr: String,

    /// Take the address from the first `listen <ipv4>:<port>` of each server.
    pub use_listen: bool,

    /// Names never written to the output.
    pub excluded_hosts: Vec<String>,

    /// Selected output format.
    pub format: OutputFormat,
}

impl ExportConfig {
    /// Creates a config with the stock nginx layout and `127.0.0.1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            default_addr: DEFAULT_ADDR.to_string(),
            use_listen: false,
            excluded_hosts: Vec::new(),
            format: OutputFormat::Hosts,
        }
    }

    /// Overrides the include base directory.
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Overrides the fallback address.
    #[must_use]
    pub fn with_default_addr(mut self, addr: impl Into<String>) -> Self {
        self.default_addr = addr.into();
        self
    }

    /// Prefers addresses from `listen` directives.
    #[must_use]
    pub const fn with_use_listen(mut self, use_listen: bool) -> Self {
        self.use_listen = use_listen;
        self
    }

    /// Replaces the exclusion list.
    #[must_use]
    pub fn with_excluded_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the output format.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Checks values that cannot be caught by the type system.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::InvalidConfig`] if the default address is empty
    /// or contains whitespace.
    pub fn validate(&self) -> crate::Result<()> {
        let addr = self.default_addr.trim();
        if addr.is_empty() || addr.contains(char::is_whitespace) {
            return Err(HostsError::InvalidConfig(format!(
                "default address {:?} is not a usable address",
                self.default_addr
            )));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a comma-separated host list, trimming entries and dropping empty ones.
#[must_use]
pub fn parse_host_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(ToString::to_string)
        .collect()
}
