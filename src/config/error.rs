//! Reasons a service refuses to start on its configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required configuration file {} is missing", .path.display())]
    MissingFile { path: PathBuf },

    /// A source could not be read, or the merged sources do not fit
    /// `Settings`.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A loaded value is out of range; `field` is the dotted TOML path.
    #[error("invalid {field}: {message}")]
    Invalid { field: String, message: String },

    #[error(
        "unknown environment '{value}' in SCHOOLHUB_APP_ENV; expected development, test, staging or production"
    )]
    UnknownEnvironment { value: String },

    #[error("SCHOOLHUB_CONFIG_DIR and SCHOOLHUB_CONFIG_FILE are both set; use one or the other")]
    ConflictingSources,
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let error = ConfigError::MissingFile {
            path: PathBuf::from("config/default.toml"),
        };
        assert!(error.to_string().contains("config/default.toml"));

        let error = ConfigError::invalid("jwt.secret", "too short");
        assert_eq!(error.to_string(), "invalid jwt.secret: too short");

        let error = ConfigError::UnknownEnvironment {
            value: "prd".to_string(),
        };
        assert!(error.to_string().contains("'prd'"));
    }
}
