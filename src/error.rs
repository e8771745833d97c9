//! Error types for the AirWatch backend client.

use thiserror::Error;

/// Errors surfaced by [`crate::data::api::AqiApiClient`] operations.
///
/// Callers can tell "server reachable but rejected" (`Api`) apart from
/// "server unreachable" (`Network`). Both are recoverable; the client never
/// retries internally.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server responded with a non-success HTTP status. The failure body is
    /// not parsed.
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status_code: u16,
        /// Human-readable description of the status.
        message: String,
    },

    /// Transport failed before a server response arrived (DNS failure,
    /// connection refused, timeout).
    #[error("network error: {message}")]
    Network {
        /// Description of the transport fault.
        message: String,
    },

    /// A success response carried a body that failed model decode.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network {
            message: err.to_string(),
        }
    }
}

/// A `timestamp` field that was present in the input but not a valid
/// date-time string. Missing timestamps never produce this; they default to
/// the decode time instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed timestamp: {0:?}")]
pub struct MalformedTimestamp(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_status() {
        let err = ApiError::Api {
            status_code: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error (503): Service Unavailable");
    }

    #[test]
    fn malformed_timestamp_display_quotes_input() {
        let err = MalformedTimestamp("not-a-date".to_string());
        assert_eq!(err.to_string(), "malformed timestamp: \"not-a-date\"");
    }
}
