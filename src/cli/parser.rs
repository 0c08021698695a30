//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::auth::Role;

/// Host process for a SchoolHub service's inter-service contract
#[derive(Parser, Debug)]
#[command(name = "schoolhub-link")]
#[command(version, about = "SchoolHub inter-service host")]
#[command(long_about = "
Runs one SchoolHub service's HTTP surface: a uniform JSON envelope on every
response, JWT authentication, and typed clients for the peer services listed
under [peers] that forward the caller's token.

EXAMPLES:
    # Start the server with layered configuration from ./config
    schoolhub-link serve

    # Local development: config/development.toml and unmasked internal errors
    schoolhub-link --env dev serve

    # Start on a custom address with a single configuration file
    schoolhub-link --config /etc/schoolhub/attendance.toml serve --host 0.0.0.0 --port 4003

    # Check configuration without starting the server
    schoolhub-link serve --dry-run

    # Issue a development token signed with the configured secret
    schoolhub-link token --user-id t-1 --email kim@school.test --role teacher --full-name 'Kim Park'
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads only this TOML file (plus SCHOOLHUB_* environment variables)
    /// instead of the layered files under ./config.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (SCHOOLHUB_APP_ENV, production when unset)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Debug level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Error level logging only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   schoolhub-link serve                           # Start with defaults
    ///   schoolhub-link serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   schoolhub-link serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override, takes precedence over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a signed bearer token for local testing
    ///
    /// The token is signed with jwt.secret from the loaded configuration, so
    /// every service sharing that secret accepts it.
    Token {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        email: String,

        /// admin, teacher or student
        #[arg(long)]
        role: Role,

        #[arg(long)]
        full_name: String,

        /// Lifetime in hours; defaults to jwt.token_expiration_hours
        #[arg(long, value_parser = super::validation::validate_token_hours)]
        hours: Option<i64>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["schoolhub-link"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "schoolhub-link",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "warning",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                log_level,
                dry_run,
            }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert_eq!(log_level.map(|l| l.as_str()), Some("warn"));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {:?}", other),
        }
    }

    #[test]
    fn test_token_command() {
        let cli = Cli::try_parse_from([
            "schoolhub-link",
            "token",
            "--user-id",
            "s-9",
            "--email",
            "jo@school.test",
            "--role",
            "student",
            "--full-name",
            "Jo Yoon",
            "--hours",
            "2",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Token { role, hours, .. }) => {
                assert_eq!(role, Role::Student);
                assert_eq!(hours, Some(2));
            }
            other => panic!("Expected Token command, got {:?}", other),
        }
    }

    #[test]
    fn test_token_command_rejects_unknown_role() {
        let result = Cli::try_parse_from([
            "schoolhub-link",
            "token",
            "--user-id",
            "x",
            "--email",
            "x@school.test",
            "--role",
            "janitor",
            "--full-name",
            "X",
        ]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_env_aliases() {
        let cli = Cli::try_parse_from(["schoolhub-link", "--env", "prod"]).unwrap();
        assert_eq!(
            cli.env.map(crate::config::Environment::from),
            Some(crate::config::Environment::Production)
        );
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let result = Cli::try_parse_from(["schoolhub-link", "--verbose", "--quiet"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }
}
