//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::middleware::ErrorBoundary;
use crate::api::routes::create_router;
use crate::client::ReqwestTransport;
use crate::config::{Environment, settings::Settings};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Start the server and run until shutdown signal
    ///
    /// 1. Installs the error boundary for the environment
    /// 2. Builds the shared transport and one client per peer
    /// 3. Binds to the configured address
    /// 4. Serves with graceful shutdown
    ///
    /// # Errors
    /// - Invalid peer base URLs or HTTP client construction
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.environment,
            "Application starting"
        );

        ErrorBoundary::for_environment(self.environment).install();

        tracing::info!(
            timeout_ms = self.settings.client.timeout_ms,
            max_retries = self.settings.client.retry.max_retries,
            peers = ?self.settings.peers.keys().collect::<Vec<_>>(),
            "Peer client configuration loaded"
        );

        tracing::info!(
            token_expiration_hours = self.settings.jwt.token_expiration_hours,
            secret_configured = !self.settings.jwt.secret.is_empty(),
            "JWT configuration loaded"
        );

        let transport = ReqwestTransport::new(self.settings.client.transport_options())
            .context("Failed to build the peer HTTP client")?;
        let state = AppState::from_settings(&self.settings, self.environment, Arc::new(transport))
            .context("Failed to configure peer services")?;

        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires; the other
/// one still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
