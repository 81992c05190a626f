//! Server configuration.
//!
//! Settings come from three layers, highest priority first: command line
//! flags (or their environment variables), an optional YAML file given with
//! `--config`, and built-in defaults.
//!
//! ```yaml
//! server:
//!   host: 127.0.0.1
//!   read_timeout_secs: 10
//!   write_timeout_secs: 10
//! credentials: database/users.json
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;

use crate::http::connection::Timeouts;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_CREDENTIALS: &str = "database/users.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "stile")]
#[command(about = "Serves static files from a sandboxed root and checks a login form")]
#[command(version)]
pub struct Cli {
    /// TCP port to listen on
    pub port: u16,

    /// Directory served as the document root
    pub root: PathBuf,

    /// Address to bind
    #[arg(long, env = "STILE_HOST")]
    pub host: Option<String>,

    /// JSON file mapping usernames to passwords
    #[arg(long, env = "STILE_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Optional YAML configuration file
    #[arg(long, env = "STILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Deadline for receiving the whole request, in seconds; 0 disables it
    #[arg(long)]
    pub read_timeout_secs: Option<u64>,

    /// Deadline for writing a response in seconds, 0 disables it
    #[arg(long)]
    pub write_timeout_secs: Option<u64>,
}

/// Contents of the optional YAML file. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub credentials: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub read_timeout_secs: Option<u64>,
    pub write_timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub root: PathBuf,
    pub credentials: PathBuf,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Config {
    /// Parses the process arguments and resolves them into a `Config`.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Merges CLI arguments over the optional config file and validates the
    /// result.
    ///
    /// # Errors
    ///
    /// Fails when the port is 0, when the root is missing or not a
    /// directory, or when the config file cannot be read.
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        Self::merge(cli, file)
    }

    pub fn merge(cli: Cli, file: FileConfig) -> anyhow::Result<Self> {
        if cli.port == 0 {
            bail!("invalid port number: 0");
        }

        if !cli.root.is_dir() {
            bail!(
                "the provided directory {} is invalid or does not exist",
                cli.root.display()
            );
        }

        let read_timeout_secs = cli
            .read_timeout_secs
            .or(file.server.read_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let write_timeout_secs = cli
            .write_timeout_secs
            .or(file.server.write_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            host: cli
                .host
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port,
            root: cli.root,
            credentials: cli
                .credentials
                .or(file.credentials)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS)),
            read_timeout: seconds(read_timeout_secs),
            write_timeout: seconds(write_timeout_secs),
        })
    }

    /// `host:port`, with IPv6 hosts bracketed.
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            read: self.read_timeout,
            write: self.write_timeout,
        }
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
