//! Configuration management for the block hit calculator
//!
//! Supports configuration via command line arguments, environment variables,
//! and configuration files (YAML/JSON). Command line values win over file
//! values.

use crate::provider::DEFAULT_PROVIDER_URL;
use crate::session::CalculationRequest;
use crate::share::ShareParams;
use crate::{Error, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Result output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One labelled line per result field
    Text,
    /// The full calculation as JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Complete configuration for the calculator
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(
    name = "block-hit-calculator",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mining profitability calculator",
    long_about = "Estimates the time to find a block and the daily earnings for a hashrate, using live difficulty, block reward and price data"
)]
pub struct Config {
    /// Print program info and exit
    #[arg(long)]
    #[serde(skip)]
    pub info: bool,

    /// Print the parsed configuration and exit
    #[arg(long)]
    #[serde(skip)]
    pub print_config: bool,

    /// Configuration file path (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// List the coin catalog and exit
    #[arg(long)]
    #[serde(skip)]
    pub list: bool,

    /// Filter the listed catalog by name or symbol
    #[arg(long, value_name = "TERM")]
    #[serde(skip)]
    pub search: Option<String>,

    /// Coin symbol, e.g. BTC (case-insensitive; any provider symbol is accepted)
    #[arg(short = 'c', long)]
    pub coin: Option<String>,

    /// Hashrate value in the selected unit
    #[arg(short = 'r', long)]
    pub hashrate: Option<String>,

    /// Hashrate unit (H/s, kH/s, MH/s, GH/s, TH/s, PH/s, EH/s)
    #[arg(short = 'u', long)]
    pub unit: Option<String>,

    /// Pool fee in percent
    #[arg(short = 'f', long)]
    pub pool_fee: Option<String>,

    /// Share-link query string to prefill from, e.g. "c=BTC&h=100&u=TH/s"
    #[arg(short = 'q', long, value_name = "QUERY")]
    #[serde(skip)]
    pub query: Option<String>,

    /// Page URL used to print a share link after a calculation
    #[arg(long, value_name = "URL")]
    pub share_base_url: Option<String>,

    /// Also print an HTML embed snippet (requires --share-base-url)
    #[arg(long)]
    #[serde(default)]
    pub embed: bool,

    /// Result output format
    #[arg(short = 'o', long, default_value = "text")]
    #[serde(default = "default_output")]
    pub output: OutputFormat,

    /// Market data provider base URL
    #[arg(long, default_value = DEFAULT_PROVIDER_URL)]
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Provider API key
    #[arg(long, env = "MINERSTAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// HTTP timeout in milliseconds
    #[arg(long, default_value = "30000")]
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,

    /// Log level
    #[arg(short = 'l', long, default_value = "warn")]
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, default_value = "text")]
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Config {
    /// Parse the command line and merge the config file if specified
    pub async fn load() -> Result<Self> {
        Self::from_cli(Self::parse()).await
    }

    async fn from_cli(mut config: Self) -> Result<Self> {
        if let Some(config_file) = &config.config_file {
            let file_config = Self::load_from_file(config_file).await?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    async fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;

        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(Error::from)
        } else {
            // Default to YAML
            serde_yaml::from_str(&content).map_err(Error::from)
        }
    }

    /// Merge CLI config with file config (CLI takes precedence)
    fn merge_with_file(mut self, file_config: Self) -> Self {
        self.coin = self.coin.or(file_config.coin);
        self.hashrate = self.hashrate.or(file_config.hashrate);
        self.unit = self.unit.or(file_config.unit);
        self.pool_fee = self.pool_fee.or(file_config.pool_fee);
        self.api_key = self.api_key.or(file_config.api_key);
        self.share_base_url = self.share_base_url.or(file_config.share_base_url);

        // Valued options keep their CLI defaults unless the file changes them
        if self.provider_url == DEFAULT_PROVIDER_URL {
            self.provider_url = file_config.provider_url;
        }
        if self.http_timeout == default_http_timeout() {
            self.http_timeout = file_config.http_timeout;
        }
        if self.output == default_output() {
            self.output = file_config.output;
        }
        if self.log_level == default_log_level() {
            self.log_level = file_config.log_level;
        }
        if self.log_format == default_log_format() {
            self.log_format = file_config.log_format;
        }
        self.embed |= file_config.embed;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.provider_url)
            .map_err(|e| Error::config(format!("Invalid provider URL: {}", e)))?;

        self.share_base_url()?;

        if self.embed && self.share_base_url.is_none() {
            return Err(Error::config("--embed requires --share-base-url"));
        }

        if self.http_timeout == 0 {
            return Err(Error::config("HTTP timeout must be greater than 0"));
        }

        Ok(())
    }

    /// Share-link parameters from `--query`
    pub fn share_params(&self) -> ShareParams {
        self.query
            .as_deref()
            .map(ShareParams::from_query)
            .unwrap_or_default()
    }

    /// Build the form request: share link first, explicit flags on top
    pub fn request(&self) -> CalculationRequest {
        let mut request = CalculationRequest::default();
        request.prefill(&self.share_params());
        request.prefill(&ShareParams {
            coin: self.coin.clone(),
            hashrate: self.hashrate.clone(),
            unit: self.unit.clone(),
            pool_fee: self.pool_fee.clone(),
        });
        request
    }

    /// Whether to run a calculation
    ///
    /// A share link alone triggers only when it carries coin, hashrate and
    /// unit. An explicit coin or hashrate always triggers, so an incomplete
    /// form reports a validation error instead of silently doing nothing.
    pub fn wants_calculation(&self) -> bool {
        self.share_params().should_auto_calculate() || self.coin.is_some() || self.hashrate.is_some()
    }

    /// Parsed share base URL
    pub fn share_base_url(&self) -> Result<Option<Url>> {
        self.share_base_url
            .as_deref()
            .map(|url| {
                Url::parse(url).map_err(|e| Error::config(format!("Invalid share base URL: {}", e)))
            })
            .transpose()
    }

    /// Get HTTP timeout duration
    pub fn http_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.http_timeout)
    }
}

// Default value functions for serde
fn default_output() -> OutputFormat { OutputFormat::Text }
fn default_provider_url() -> String { DEFAULT_PROVIDER_URL.to_string() }
fn default_http_timeout() -> u64 { 30000 }
fn default_log_level() -> LogLevel { LogLevel::Warn }
fn default_log_format() -> LogFormat { LogFormat::Text }
