use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::ClientError;
use super::service_client::ServiceClient;
use super::transport::Transport;
use crate::config::settings::ClientSettings;
use crate::error::{AppError, AppResult};

/// The peers this service may call, keyed by service name.
///
/// Built once at start-up from the `[peers]` table; every client shares the
/// same transport.
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    peers: Arc<BTreeMap<String, ServiceClient>>,
}

impl PeerRegistry {
    pub fn new(clients: impl IntoIterator<Item = ServiceClient>) -> Self {
        let peers = clients
            .into_iter()
            .map(|client| (client.service_name().to_string(), client))
            .collect();
        Self {
            peers: Arc::new(peers),
        }
    }

    /// Builds one client per configured peer.
    ///
    /// # Errors
    /// Fails on the first peer whose base URL is invalid.
    pub fn from_settings(
        peers: &BTreeMap<String, String>,
        settings: &ClientSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let clients = peers
            .iter()
            .map(|(name, base_url)| {
                ServiceClient::new(name.clone(), base_url.clone(), transport.clone()).map(|client| {
                    client
                        .with_timeout(settings.timeout())
                        .with_retry(settings.retry.policy())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(clients))
    }

    /// Client for the named peer.
    pub fn client(&self, service_name: &str) -> AppResult<&ServiceClient> {
        self.peers.get(service_name).ok_or_else(|| {
            AppError::not_found().with_message(format!("Unknown peer service '{}'", service_name))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.peers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
