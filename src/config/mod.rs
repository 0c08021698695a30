//! Layered configuration for schoolhub-link
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `SCHOOLHUB_*` environment variables
//! 5. command line flags of `serve`

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, ClientSettings, JwtConfig, LoggerSettings, RetrySettings, ServerConfig,
    Settings,
};
