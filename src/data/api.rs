use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::data::types::{Alert, AqiData, Prediction};
use crate::error::ApiError;

/// Per-request timeout, fixed for every operation.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the pollution-monitoring backend.
///
/// Holds one pooled transport handle for its lifetime; all operations are
/// stateless and safe to issue concurrently through a shared reference. No
/// operation retries internally.
pub struct AqiApiClient {
    client: Client,
    base_url: String,
}

impl AqiApiClient {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Fetch the latest air-quality snapshot.
    pub async fn fetch_current(&self) -> Result<AqiData, ApiError> {
        let response = self
            .client
            .get(format!("{}/current", self.base_url))
            .send()
            .await?;
        decode_success(response).await
    }

    /// Fetch historical readings, newest first. `hours` bounds the window;
    /// `None` leaves the window to the server default.
    pub async fn fetch_history(&self, hours: Option<u32>) -> Result<Vec<AqiData>, ApiError> {
        let mut request = self.client.get(format!("{}/history", self.base_url));
        if let Some(hours) = hours {
            request = request.query(&[("hours", hours)]);
        }
        decode_success(request.send().await?).await
    }

    /// Fetch active alerts.
    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        let response = self
            .client
            .get(format!("{}/alerts", self.base_url))
            .send()
            .await?;
        decode_success(response).await
    }

    /// Fetch the AQI forecast.
    pub async fn fetch_prediction(&self) -> Result<Prediction, ApiError> {
        let response = self
            .client
            .get(format!("{}/prediction", self.base_url))
            .send()
            .await?;
        decode_success(response).await
    }

    /// Register a push-notification device token. The server answers 200 for
    /// an already-known token and 201 for a new one; both count as success.
    pub async fn register_device(&self, token: &str) -> Result<bool, ApiError> {
        let response = self
            .client
            .post(format!("{}/register-device", self.base_url))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            Ok(true)
        } else {
            Err(status_error(status))
        }
    }

    /// Deactivate a previously registered device token.
    pub async fn unregister_device(&self, token: &str) -> Result<bool, ApiError> {
        let response = self
            .client
            .post(format!("{}/unregister-device", self.base_url))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(true)
        } else {
            Err(status_error(status))
        }
    }

    /// Probe backend reachability.
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(true)
        } else {
            Err(status_error(status))
        }
    }

    /// Release the transport handle. Consuming `self` means a client cannot
    /// be used after shutdown.
    pub fn shutdown(self) {}
}

// Success is HTTP 200 exactly; the body of a failed response is not parsed.
async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(status_error(status));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn status_error(status: StatusCode) -> ApiError {
    ApiError::Api {
        status_code: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    }
}
