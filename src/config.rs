//! Command-line flags layered over an optional TOML file.
//!
//! Precedence, highest first: flag, file, built-in default.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::Level;

use crate::constants::DEFAULT_ENDPOINT;
use crate::error::{Error, Result};
use crate::terminal::CellMetrics;
use crate::window::MinimumSize;

const DEFAULT_POLL_INTERVAL_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinSizeVariant {
    /// 200×150 px.
    #[default]
    Default,
    /// 350×200 px.
    Large,
}

impl From<MinSizeVariant> for MinimumSize {
    fn from(variant: MinSizeVariant) -> Self {
        match variant {
            MinSizeVariant::Default => MinimumSize::DEFAULT,
            MinSizeVariant::Large => MinimumSize::LARGE,
        }
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "ssh-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Window manager for concurrent remote shell sessions"
)]
pub struct Cli {
    /// TOML file with default settings.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// WebSocket bridge every session connects to.
    #[arg(short = 'e', long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Glyph cell width in pixels. Detected from the terminal when omitted.
    #[arg(long = "cell-width", value_name = "PX")]
    pub cell_width: Option<u16>,

    /// Glyph cell height in pixels. Detected from the terminal when omitted.
    #[arg(long = "cell-height", value_name = "PX")]
    pub cell_height: Option<u16>,

    /// Smallest size windows can be resized to.
    #[arg(long = "min-size", value_enum, value_name = "VARIANT")]
    pub min_size: Option<MinSizeVariant>,

    /// Write logs to this file. Logging is off otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Maximum log level (error, warn, info, debug, trace).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Event poll interval of the UI loop.
    #[arg(long = "poll-interval-ms", value_name = "MS")]
    pub poll_interval_ms: Option<u64>,
}

/// Settings as read from the TOML file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub cell_width: Option<u16>,
    pub cell_height: Option<u16>,
    pub min_size: Option<MinSizeVariant>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| Error::Config(format_toml_error(&err)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml(&text)
    }
}

fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();
    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }
    msg
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: String,
    /// `None` means detect from the terminal, falling back to 8×16.
    pub cell_metrics: Option<CellMetrics>,
    pub min_size: MinSizeVariant,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cell_metrics: None,
            min_size: MinSizeVariant::Default,
            log_file: None,
            log_level: Level::INFO,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl Config {
    /// Read the file named by `--config` (if any) and merge the flags over it.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let defaults = Self::default();

        let endpoint = cli
            .endpoint
            .clone()
            .or(file.endpoint)
            .unwrap_or(defaults.endpoint);
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(Error::Config(format!(
                "endpoint must start with ws:// or wss://, got {endpoint:?}"
            )));
        }

        let cell_width = cli.cell_width.or(file.cell_width);
        let cell_height = cli.cell_height.or(file.cell_height);
        if cell_width == Some(0) || cell_height == Some(0) {
            return Err(Error::Config("cell metrics must be greater than zero".into()));
        }
        let cell_metrics = match (cell_width, cell_height) {
            (None, None) => None,
            (width, height) => {
                let fallback = CellMetrics::default();
                Some(CellMetrics::new(
                    width.unwrap_or(fallback.width),
                    height.unwrap_or(fallback.height),
                ))
            }
        };

        let log_level = match cli.log_level.as_deref().or(file.log_level.as_deref()) {
            Some(level) => Level::from_str(level)
                .map_err(|_| Error::Config(format!("unknown log level {level:?}")))?,
            None => defaults.log_level,
        };

        let poll_interval_ms = cli
            .poll_interval_ms
            .or(file.poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if poll_interval_ms == 0 {
            return Err(Error::Config("poll interval must be greater than zero".into()));
        }

        Ok(Self {
            endpoint,
            cell_metrics,
            min_size: cli.min_size.or(file.min_size).unwrap_or_default(),
            log_file: cli.log_file.clone().or(file.log_file),
            log_level,
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }

    pub fn minimum_size(&self) -> MinimumSize {
        self.min_size.into()
    }
}
