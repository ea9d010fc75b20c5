//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::collection::ServerCollection;
use crate::config::{
    DEFAULT_ADDR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, ExportConfig, OutputFormat,
    parse_host_list,
};
use crate::error::Result;

/// Export hosts found in nginx configuration into the hosts or dnsmasq format
#[derive(Parser, Debug)]
#[command(name = "nginx-hosts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// nginx configuration file(s)
    #[arg(short = 'c', long, num_args = 1.., default_value = DEFAULT_CONFIG_FILE)]
    pub config_files: Vec<PathBuf>,

    /// nginx configuration directory, base of relative includes
    #[arg(short = 'd', long, default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Default address
    #[arg(short = 'a', long, default_value = DEFAULT_ADDR)]
    pub default_addr: String,

    /// Use the address from 'listen' directives
    #[arg(short = 'l', long)]
    pub use_listen: bool,

    /// Excluded hostnames, comma-separated
    #[arg(short = 'e', long, default_value = "")]
    pub excluded_hosts: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Hosts)]
    pub format: OutputFormat,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the export configuration from the flags.
    #[must_use]
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::new()
            .with_config_dir(&self.config_dir)
            .with_default_addr(&self.default_addr)
            .with_use_listen(self.use_listen)
            .with_excluded_hosts(parse_host_list(&self.excluded_hosts))
            .with_format(self.format)
    }

    /// Loads every configuration file and renders the result.
    ///
    /// Nothing is rendered unless all files load successfully.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while validating flags or loading files.
    pub fn run(&self) -> Result<String> {
        let config = self.export_config();
        config.validate()?;

        let mut servers = ServerCollection::new(config);
        for path in &self.config_files {
            servers.load_file(path)?;
        }
        tracing::info!(
            servers = servers.len(),
            format = %servers.config().format,
            "Rendering hosts"
        );
        Ok(servers.render())
    }
}
