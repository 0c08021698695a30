//! Configuration validation logic
//!
//! Each section validates itself; `Settings::validate` returns the first
//! failure so the process refuses to start on a bad configuration.

use crate::config::error::ConfigError;
use crate::config::settings::{ClientSettings, JwtConfig, LoggerSettings, ServerConfig, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Minimum length of the shared JWT secret
const MIN_JWT_SECRET_LEN: usize = 32;

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid(
                "server.host",
                "Host is required. Use 127.0.0.1 for local access or 0.0.0.0 for all interfaces.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::invalid(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - A plain level must be one of: trace, debug, info, warn, error.
    ///   Directives containing `=` or `,` are handed to `EnvFilter` as-is.
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        let is_directive = level.contains('=') || level.contains(',');
        if !is_directive && !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::invalid(
                "jwt.secret",
                "JWT secret cannot be empty. Set SCHOOLHUB_JWT__SECRET.",
            ));
        }

        if self.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                field: "jwt.secret".to_string(),
                message: format!(
                    "JWT secret should be at least {} characters for security",
                    MIN_JWT_SECRET_LEN
                ),
            });
        }

        if self.token_expiration_hours <= 0 {
            return Err(ConfigError::invalid(
                "jwt.token_expiration_hours",
                "Token expiration must be positive",
            ));
        }

        Ok(())
    }
}

impl ClientSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "client.timeout_ms",
                "Peer request timeout must be greater than 0 milliseconds.",
            ));
        }

        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "client.connect_timeout_ms",
                "Connect timeout must be greater than 0 milliseconds.",
            ));
        }

        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::Invalid {
                field: "client.retry.base_delay_ms".to_string(),
                message: format!(
                    "Base delay ({}ms) cannot exceed max delay ({}ms).",
                    self.retry.base_delay_ms, self.retry.max_delay_ms
                ),
            });
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.jwt.validate()?;
        self.client.validate()?;
        self.validate_peers()?;
        Ok(())
    }

    fn validate_peers(&self) -> Result<(), ConfigError> {
        for (name, url) in &self.peers {
            let scheme_ok = reqwest::Url::parse(url)
                .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
                .unwrap_or(false);

            if !scheme_ok {
                return Err(ConfigError::Invalid {
                    field: format!("peers.{}", name),
                    message: format!(
                        "Invalid base URL '{}'. Expected an absolute http:// or https:// URL.",
                        url
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::RetrySettings;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.jwt.secret = "a".repeat(32);
        settings
    }

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::Invalid { field, .. } => field,
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_settings() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_server_config_valid_port_boundaries() {
        for port in [1, 65535] {
            let config = ServerConfig {
                port,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_logger_levels() {
        for level in ["trace", "DEBUG", "info", "warn", "error", "schoolhub_link=debug,info"] {
            let settings = LoggerSettings {
                level: level.to_string(),
                ..Default::default()
            };
            assert!(settings.validate().is_ok(), "level should be valid: {}", level);
        }

        let settings = LoggerSettings {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");
    }

    #[test]
    fn test_logger_invalid_format() {
        let settings = LoggerSettings {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.format");
    }

    #[test]
    fn test_jwt_secret_required() {
        let err = Settings::default().validate().unwrap_err();
        assert_eq!(field_of(err), "jwt.secret");
    }

    #[test]
    fn test_jwt_secret_too_short() {
        let config = JwtConfig {
            secret: "short".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "jwt.secret");
    }

    #[test]
    fn test_jwt_non_positive_expiration() {
        let config = JwtConfig {
            secret: "a".repeat(32),
            token_expiration_hours: 0,
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "jwt.token_expiration_hours"
        );
    }

    #[test]
    fn test_client_zero_timeout() {
        let settings = ClientSettings {
            timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "client.timeout_ms");
    }

    #[test]
    fn test_client_base_delay_above_max() {
        let settings = ClientSettings {
            retry: RetrySettings {
                max_retries: 1,
                base_delay_ms: 5_000,
                max_delay_ms: 1_000,
            },
            ..Default::default()
        };
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "client.retry.base_delay_ms"
        );
    }

    #[test]
    fn test_peer_urls() {
        let mut settings = valid_settings();
        settings
            .peers
            .insert("courses".to_string(), "http://courses:4002".to_string());
        settings
            .peers
            .insert("users".to_string(), "https://users.internal".to_string());
        assert!(settings.validate().is_ok());

        settings
            .peers
            .insert("grades".to_string(), "grades:4004".to_string());
        assert_eq!(field_of(settings.validate().unwrap_err()), "peers.grades");
    }
}
