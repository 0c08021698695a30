//! Merges command line overrides into file-based configuration.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, settings::Settings};

/// Applies CLI overrides on top of loaded settings.
///
/// Precedence, lowest first: configuration files, `SCHOOLHUB_*`
/// variables, global flags (`--verbose`/`--quiet`), then subcommand flags.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration for `cli` in `environment`.
    ///
    /// # Errors
    /// Returns `ConfigError` if loading or validation fails.
    pub fn load(cli: &Cli, environment: Environment) -> Result<Self, ConfigError> {
        let loader = match cli.config {
            Some(ref path) => ConfigLoader::from_file(path)?,
            None => ConfigLoader::new()?,
        };

        let settings = loader.with_environment(environment).load()?;
        Ok(Self::new(settings))
    }

    /// Returns the merged and re-validated settings.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn valid_base_config() -> Settings {
        let mut config = Settings::default();
        config.jwt.secret = "merger-tests-secret-0123456789abcdef".to_string();
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(valid_base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_merge_without_overrides_keeps_base() {
        let merged = merge(&["schoolhub-link"]).unwrap();
        assert_eq!(merged, valid_base_config());
    }

    #[test]
    fn test_merge_verbose_and_quiet_flags() {
        assert_eq!(merge(&["schoolhub-link", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["schoolhub-link", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_merge_serve_address() {
        let merged = merge(&["schoolhub-link", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .unwrap();
        assert_eq!(merged.server.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["schoolhub-link", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merge_revalidates() {
        let cli = Cli::try_parse_from(["schoolhub-link", "serve"]).unwrap();
        let result = ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field, .. }) if field == "jwt.secret"
        ));
    }
}
