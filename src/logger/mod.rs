//! Logger initialisation
//!
//! A single `tracing-subscriber` registry with an `EnvFilter` and one `fmt`
//! layer in the configured format. Everything in the crate logs through the
//! `tracing` macros, so tests may swap in their own subscriber with
//! `tracing::subscriber::with_default`.

use std::io::IsTerminal;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggerSettings;

/// Log format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid formats are: full, compact, json", s),
        }
    }
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

/// Builds the filter from a level (`info`) or a directive list
/// (`schoolhub_link=debug,tower_http=warn`).
pub fn env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("Invalid log filter '{}'", level))
}

/// Installs the global subscriber.
///
/// # Errors
/// Fails on an invalid level or format, or when a global subscriber is
/// already installed.
pub fn init_logger(settings: &LoggerSettings) -> anyhow::Result<()> {
    let filter = env_filter(&settings.level)?;
    let format: LogFormat = settings.format.parse()?;
    let use_ansi = settings.colored && std::io::stdout().is_terminal();

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(use_ansi).with_target(true))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().with_ansi(use_ansi).with_target(true).compact())
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_current_span(true))
            .try_init(),
    };

    result.context("Failed to install the global tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("Json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_format_as_str_matches_parse() {
        for format in [LogFormat::Full, LogFormat::Compact, LogFormat::Json] {
            assert_eq!(format.as_str().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_env_filter_accepts_levels_and_directives() {
        assert!(env_filter("info").is_ok());
        assert!(env_filter("schoolhub_link=debug,tower_http=warn,info").is_ok());
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        assert!(env_filter("schoolhub_link=verbose").is_err());
    }

    #[test]
    fn test_init_logger_rejects_unknown_format() {
        let settings = LoggerSettings {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(init_logger(&settings).is_err());
    }
}
