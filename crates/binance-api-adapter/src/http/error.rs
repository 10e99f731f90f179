/*
[INPUT]:  Error sources (transport, API error bodies, serialization, caller input)
[OUTPUT]: Structured error types that keep the failure kinds distinguishable
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error returned by the exchange: `{"code": -1121, "msg": "Invalid symbol."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub msg: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.msg, self.code)
    }
}

/// Main error type for the Binance adapter
#[derive(Error, Debug)]
pub enum BinanceApiError {
    /// No response was obtained (connect failure, reset, timeout)
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response carrying a structured error body
    #[error("API error (HTTP {status}): {error}")]
    Api { status: StatusCode, error: ApiError },

    /// Non-2xx response whose body was absent or not an error structure
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    /// Successful response whose body did not match the declared result type
    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// Request object rejected before anything was sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed operation table, base URL or transport setup
    #[error("configuration error: {0}")]
    Config(String),

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The transport runtime dropped the call before it completed
    #[error("call cancelled before completion")]
    Cancelled,
}

impl BinanceApiError {
    /// True when no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, BinanceApiError::Transport(_))
    }

    /// True for decoded `{code, msg}` failures.
    pub fn is_api_error(&self) -> bool {
        matches!(self, BinanceApiError::Api { .. })
    }

    /// The decoded exchange error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            BinanceApiError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BinanceApiError::Api { status, .. } | BinanceApiError::Http { status, .. } => {
                Some(*status)
            }
            BinanceApiError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Hint for caller-side retry policies. Nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        match self {
            BinanceApiError::Transport(err) => err.is_timeout() || err.is_connect(),
            BinanceApiError::Api { error, .. } => matches!(error.code, -1000 | -1001 | -1003 | -1015 | -1016),
            BinanceApiError::Http { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Result type alias for Binance operations
pub type Result<T> = std::result::Result<T, BinanceApiError>;

/// Maps non-2xx responses onto [`BinanceApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorDecoder;

impl ErrorDecoder {
    /// Decode a failure response. Never panics, whatever the body holds.
    pub fn decode(status: StatusCode, body: &[u8]) -> BinanceApiError {
        if let Ok(error) = serde_json::from_slice::<ApiError>(body) {
            return BinanceApiError::Api { status, error };
        }

        let text = String::from_utf8_lossy(body).trim().to_string();
        let message = if text.is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            text
        };

        BinanceApiError::Http { status, message }
    }
}
