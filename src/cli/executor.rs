//! Command executor for dispatching CLI commands

use super::config_merger::ConfigurationMerger;
use super::parser::{Cli, Commands};
use crate::auth::{UserPayload, issue_token};
use crate::config::{Environment, settings::Settings};
use crate::logger::init_logger;
use crate::server::Server;

/// Loads configuration for `cli` and runs the selected command.
///
/// No subcommand means `serve`. Without `--env` the environment comes from
/// `SCHOOLHUB_APP_ENV`, and production when that is unset.
///
/// # Errors
/// Configuration, logger, token signing or server errors.
pub async fn execute_command(cli: Cli) -> anyhow::Result<()> {
    let environment = match cli.env {
        Some(env) => Environment::from(env),
        None => Environment::from_env()?,
    };

    let settings = ConfigurationMerger::load(&cli, environment)?.merge_cli_args(&cli)?;

    match cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            print!("{}", dry_run_report(&settings, environment));
            Ok(())
        }
        Some(Commands::Serve { .. }) | None => {
            init_logger(&settings.logger)?;
            Server::new(settings, environment).run().await
        }
        Some(Commands::Token {
            user_id,
            email,
            role,
            full_name,
            hours,
        }) => {
            let user = UserPayload {
                user_id,
                email,
                role,
                full_name,
            };
            let hours = hours.unwrap_or(settings.jwt.token_expiration_hours);
            println!("{}", issue_token(user, &settings.jwt.secret, hours)?);
            Ok(())
        }
    }
}

/// Summary printed by `serve --dry-run` once the configuration validated.
fn dry_run_report(settings: &Settings, environment: Environment) -> String {
    let mut report = String::new();
    report.push_str("✓ Configuration is valid\n");
    report.push_str(&format!("✓ Environment: {}\n", environment));
    report.push_str(&format!(
        "✓ Server would bind to: {}\n",
        settings.server.address()
    ));
    report.push_str(&format!(
        "✓ Logger: level={} format={}\n",
        settings.logger.level, settings.logger.format
    ));
    report.push_str(&format!(
        "✓ Peer client: timeout={}ms retries={}\n",
        settings.client.timeout_ms, settings.client.retry.max_retries
    ));
    if settings.peers.is_empty() {
        report.push_str("✓ No peer services configured\n");
    }
    for (name, url) in &settings.peers {
        report.push_str(&format!("✓ Peer {} -> {}\n", name, url));
    }
    report
}
