//! Server configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command line flags (which may also come from the environment).
//!
//! ```yaml
//! server:
//!   port: 8080
//!   max_connections: 128
//!   read_timeout_secs: 5
//!   framing: content-length
//! site:
//!   root: ./www
//! identity:
//!   name: my-box
//!   owners: ["ops@example.com"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::http::writer::Framing;

pub const DEFAULT_PORT: u16 = 8080;

/// Command line flags.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tinyserve", version, about = "Minimal static file server")]
pub struct Cli {
    /// Port to listen on. Malformed values fall back to the default
    #[arg(short = 'p', long = "port", env = "TINYSERVE_PORT")]
    pub port: Option<String>,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", env = "TINYSERVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Site root directory
    #[arg(short = 'r', long = "root", env = "TINYSERVE_ROOT")]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on connections handled at once
    pub max_connections: usize,
    /// Deadline for receiving the whole request head. 0 disables it.
    pub read_timeout_secs: u64,
    /// Deadline for sending the whole response. 0 disables it.
    pub write_timeout_secs: u64,
    pub max_head_bytes: usize,
    pub framing: Framing,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub root: PathBuf,
    /// Relative to `root` unless absolute
    pub images: PathBuf,
    /// Relative to `root` unless absolute
    pub misc: PathBuf,
    pub index: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub name: String,
    pub owners: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_connections: 256,
            read_timeout_secs: 10,
            write_timeout_secs: 30,
            max_head_bytes: crate::http::parser::MAX_HEAD_BYTES,
            framing: Framing::Legacy,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("www"),
            images: PathBuf::from("images"),
            misc: PathBuf::from("misc"),
            index: "index.html".to_string(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: format!("tinyserve/{}", env!("CARGO_PKG_VERSION")),
            owners: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_secs > 0).then(|| Duration::from_secs(self.write_timeout_secs))
    }
}

impl SiteConfig {
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(&self.images)
    }

    pub fn misc_dir(&self) -> PathBuf {
        self.root.join(&self.misc)
    }
}

impl Config {
    /// Builds the configuration from parsed command line flags.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(raw) = cli.port.as_deref() {
            cfg.server.port = parse_port(raw, cfg.server.port);
        }

        if let Some(root) = &cli.root {
            cfg.site.root = root.clone();
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Parses a port flag, keeping `fallback` when the value is not a usable port.
pub fn parse_port(raw: &str, fallback: u16) -> u16 {
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            tracing::warn!(value = raw, fallback, "Invalid port, using fallback");
            fallback
        }
    }
}
