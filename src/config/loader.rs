//! Configuration loader for schoolhub-link
//!
//! `ConfigLoader` assembles `Settings` from layered TOML files and
//! `SCHOOLHUB_*` environment variables, then validates the result.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "SCHOOLHUB_CONFIG_DIR";

const CONFIG_FILE_ENV: &str = "SCHOOLHUB_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_PREFIX: &str = "SCHOOLHUB";

/// Separator for nested keys: `SCHOOLHUB_CLIENT__RETRY__MAX_RETRIES`
const ENV_SEPARATOR: &str = "__";

/// Layered configuration loader
///
/// Sources, lowest priority first:
/// 1. `default.toml` (required)
/// 2. `{environment}.toml` (optional)
/// 3. `local.toml` (optional, not committed)
/// 4. `SCHOOLHUB_*` environment variables
///
/// In single-file mode (`SCHOOLHUB_CONFIG_FILE` or `--config`) only that
/// file and the environment variables are read.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `SCHOOLHUB_CONFIG_DIR`, `SCHOOLHUB_CONFIG_FILE`
    /// and `SCHOOLHUB_APP_ENV`.
    ///
    /// # Errors
    ///
    /// - `ConflictingSources` if both `SCHOOLHUB_CONFIG_DIR` and
    ///   `SCHOOLHUB_CONFIG_FILE` are set
    /// - `UnknownEnvironment` if `SCHOOLHUB_APP_ENV` names no environment
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_var.is_some() {
            return Err(ConfigError::ConflictingSources);
        }

        Ok(Self {
            config_dir: config_dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env()?,
        })
    }

    /// Loader for a single explicit file, as passed with `--config`.
    ///
    /// # Errors
    /// `UnknownEnvironment` if `SCHOOLHUB_APP_ENV` names no environment.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env()?,
        })
    }

    /// Overrides the environment read from `SCHOOLHUB_APP_ENV`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load and validate configuration from all sources.
    ///
    /// # Errors
    ///
    /// - `MissingFile` when the required file is missing
    /// - `Load` when a source is unreadable or does not fit `Settings`
    /// - `Invalid` when a value is out of range
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.build_config()?.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        Self::add_env_source(builder)
            .build()
            .map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    /// `SCHOOLHUB_SERVER__PORT` -> `server.port`,
    /// `SCHOOLHUB_PEERS__COURSES` -> `peers.courses`
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}
