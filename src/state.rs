//! Application state for Axum web framework.

use std::sync::Arc;

use crate::client::{PeerRegistry, Transport};
use crate::config::{ApplicationConfig, Environment, JwtConfig, Settings};

/// Shared state handed to every handler and to `auth_middleware`.
///
/// Cloning is cheap: the configuration sits behind `Arc` and the registry
/// shares its clients.
#[derive(Clone)]
pub struct AppState {
    pub application: Arc<ApplicationConfig>,
    pub environment: Environment,
    /// JWT configuration for token verification
    pub jwt_config: Arc<JwtConfig>,
    /// Clients for every configured peer service
    pub peers: PeerRegistry,
}

impl AppState {
    pub fn new(
        application: ApplicationConfig,
        environment: Environment,
        jwt_config: JwtConfig,
        peers: PeerRegistry,
    ) -> Self {
        Self {
            application: Arc::new(application),
            environment,
            jwt_config: Arc::new(jwt_config),
            peers,
        }
    }

    /// Builds the state from loaded settings, creating one client per
    /// `[peers]` entry on top of `transport`.
    ///
    /// # Example
    /// ```ignore
    /// let transport = Arc::new(ReqwestTransport::new(options)?);
    /// let state = AppState::from_settings(&settings, Environment::from_env()?, transport)?;
    /// ```
    pub fn from_settings(
        settings: &Settings,
        environment: Environment,
        transport: Arc<dyn Transport>,
    ) -> anyhow::Result<Self> {
        let peers = PeerRegistry::from_settings(&settings.peers, &settings.client, transport)?;

        Ok(Self::new(
            settings.application.clone(),
            environment,
            settings.jwt.clone(),
            peers,
        ))
    }
}
