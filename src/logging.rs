//! Logging System
//!
//! Structured logging setup on the `tracing` crate for hosts and demos that
//! embed the registry. Library code itself only emits events; installing a
//! subscriber stays the embedder's choice, and this module is that choice
//! made easy.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            color: default_true(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Initialize the logging system.
///
/// Priority order (highest to lowest): environment variables (`TETHER_LOG`,
/// `TETHER_LOG_FORMAT`, `TETHER_LOG_OUTPUT`), then the passed configuration,
/// then defaults.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), LoggingError> {
    let filter = build_env_filter(config)?;
    let format = determine("TETHER_LOG_FORMAT", config.map(|c| c.format.as_str()), "text")?;
    let output = determine("TETHER_LOG_OUTPUT", config.map(|c| c.output.as_str()), "stderr")?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let base_subscriber = Registry::default().with(filter);

    let result = match (format.as_str(), output.as_str()) {
        ("json", "stdout") => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        ("json", _) => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (_, "stdout") => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        _ => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}

fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_env("TETHER_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidValue {
        field: "level",
        value: format!("{} ({})", level, e),
    })
}

/// Resolve a setting from an environment variable, the config, or a default,
/// validating against the values this module supports.
fn determine(
    env_var: &'static str,
    configured: Option<&str>,
    default: &str,
) -> Result<String, LoggingError> {
    let value = std::env::var(env_var)
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| default.to_string());

    let valid = match env_var {
        "TETHER_LOG_FORMAT" => matches!(value.as_str(), "json" | "text"),
        _ => matches!(value.as_str(), "stdout" | "stderr"),
    };
    if !valid {
        return Err(LoggingError::InvalidValue {
            field: if env_var == "TETHER_LOG_FORMAT" {
                "format"
            } else {
                "output"
            },
            value,
        });
    }
    Ok(value)
}
