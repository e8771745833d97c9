use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::RegistrationConfig;
use crate::data::api::AqiApiClient;
use crate::error::ApiError;

/// Bridge between the push-notification subsystem and the backend's device
/// registration endpoint.
///
/// The push subsystem owns token acquisition and refresh; it only hands
/// tokens over. Each distinct token value is registered once, with bounded
/// retry on transient failures. A token whose registration ultimately fails
/// is not recorded, so the next refresh event tries again.
pub struct RegistrationBridge {
    client: Arc<AqiApiClient>,
    config: RegistrationConfig,
    last_token: Option<String>,
}

impl RegistrationBridge {
    pub fn new(client: Arc<AqiApiClient>, config: RegistrationConfig) -> Self {
        Self {
            client,
            config,
            last_token: None,
        }
    }

    /// Consume token events until the sending side closes.
    pub async fn run(mut self, mut tokens: mpsc::Receiver<String>) {
        while let Some(token) = tokens.recv().await {
            self.on_token(&token).await;
        }
    }

    /// Handle an initial or refreshed token from the push subsystem.
    pub async fn on_token(&mut self, token: &str) {
        if self.last_token.as_deref() == Some(token) {
            // Refresh event delivered a token we already registered
            return;
        }

        match self.register_with_retry(token).await {
            Ok(()) => {
                info!("Device token registered");
                self.last_token = Some(token.to_string());
            }
            Err(err) => warn!("Device registration failed: {}", err),
        }
    }

    /// Token value most recently registered with the backend.
    pub fn last_registered(&self) -> Option<&str> {
        self.last_token.as_deref()
    }

    async fn register_with_retry(&self, token: &str) -> Result<(), ApiError> {
        let mut attempt = 0;
        let mut delay_ms = self.config.base_delay_ms;

        loop {
            attempt += 1;
            match self.client.register_device(token).await {
                Ok(_) => return Ok(()),
                Err(err) if attempt >= self.config.max_attempts || !is_transient(&err) => {
                    return Err(err);
                }
                Err(err) => {
                    warn!("Registration attempt {} failed: {}, retrying", attempt, err);
                    let jitter = rand::thread_rng().gen_range(0..=delay_ms / 4);
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(self.config.max_delay_ms);
                }
            }
        }
    }
}

// A 4xx means the token itself was rejected; retrying cannot help.
fn is_transient(err: &ApiError) -> bool {
    match err {
        ApiError::Network { .. } => true,
        ApiError::Api { status_code, .. } => *status_code >= 500,
        ApiError::Decode(_) => false,
    }
}
