//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};
use crate::consts::DEFAULT_BASE_URL;
use crate::fetch::{DEFAULT_RETRIES, DEFAULT_TIMEOUT};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "apodview")]
#[command(about = "NASA's Astronomy Picture of the Day in the terminal", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Open video entries in the browser without asking
    #[arg(short, long, global = true)]
    pub(crate) yes: bool,

    /// Archive root URL
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) base_url: Option<String>,

    /// HTTP timeout in seconds (0 disables it)
    #[arg(long, global = true, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,

    /// Retries per request after a network failure
    #[arg(long, global = true, value_name = "N")]
    pub(crate) retries: Option<usize>,

    /// Download directory taken from the config file
    #[arg(skip)]
    pub(crate) save_dir: Option<PathBuf>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.base_url.is_none() {
            self.base_url = config.base_url.clone();
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout_secs;
        }
        if self.retries.is_none() {
            self.retries = config.retries;
        }
        if self.save_dir.is_none() {
            self.save_dir = config.save_dir.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// `None` when the timeout was set to 0
    pub(crate) fn timeout(&self) -> Option<Duration> {
        match self.timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_TIMEOUT),
        }
    }

    pub(crate) fn retries(&self) -> usize {
        self.retries.unwrap_or(DEFAULT_RETRIES)
    }
}
