//! Which deployment a service process belongs to.
//!
//! The environment picks the `config/{environment}.toml` layer and decides
//! whether the boundary handler may put internal error detail on the wire.
//! Only an explicit `development` does that: an unset `SCHOOLHUB_APP_ENV`
//! means production, and a value that names no environment stops start-up.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub const ENV_VAR: &'static str = "SCHOOLHUB_APP_ENV";

    /// Resolves `SCHOOLHUB_APP_ENV`.
    ///
    /// # Errors
    /// `ConfigError::UnknownEnvironment` when the variable is set to
    /// something that is not an environment name or alias.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(std::env::var(Self::ENV_VAR).ok().as_deref())
    }

    /// Unset or blank is production; anything else must parse.
    fn resolve(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(name) => name.parse(),
        }
    }

    /// Whether internal error detail may be shown to clients.
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let environment = match name.to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => {
                return Err(ConfigError::UnknownEnvironment {
                    value: name.to_string(),
                });
            }
        };
        Ok(environment)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_aliases() {
        for (name, expected) in [
            ("development", Environment::Development),
            ("DEV", Environment::Development),
            ("test", Environment::Test),
            ("stage", Environment::Staging),
            ("Production", Environment::Production),
            ("prod", Environment::Production),
        ] {
            assert_eq!(name.parse::<Environment>().unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn test_unset_resolves_to_production() {
        assert_eq!(Environment::resolve(None).unwrap(), Environment::Production);
        assert_eq!(Environment::resolve(Some("  ")).unwrap(), Environment::Production);
        assert!(!Environment::resolve(None).unwrap().is_development());
    }

    #[test]
    fn test_misspelled_value_is_an_error() {
        match Environment::resolve(Some("prd")) {
            Err(ConfigError::UnknownEnvironment { value }) => assert_eq!(value, "prd"),
            other => panic!("Expected UnknownEnvironment, got {:?}", other),
        }
    }

    #[test]
    fn test_only_development_is_development() {
        assert!(Environment::Development.is_development());
        for environment in [Environment::Test, Environment::Staging, Environment::Production] {
            assert!(!environment.is_development(), "{environment}");
        }
    }
}
