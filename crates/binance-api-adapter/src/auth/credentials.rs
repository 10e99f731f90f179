/*
[INPUT]:  API key and secret (explicit values or environment variables)
[OUTPUT]: Immutable credential pair with a redacted secret
[POS]:    Auth layer - credential storage
[UPDATE]: When credential sources or environment variable names change
*/

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::http::{BinanceApiError, Result};

const API_KEY_VAR: &str = "BINANCE_API_KEY";
const SECRET_KEY_VAR: &str = "BINANCE_SECRET_KEY";

/// API key and secret used for authenticated requests.
///
/// The secret lives in a [`SecretString`], so it is zeroed on drop and never
/// shows up in `Debug` output.
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
    secret_key: SecretString,
}

impl ApiCredentials {
    /// Create credentials from explicit values.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Load credentials from `BINANCE_API_KEY` and `BINANCE_SECRET_KEY`.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| BinanceApiError::Config(format!("missing environment variable {API_KEY_VAR}")))?;
        let secret_key = std::env::var(SECRET_KEY_VAR).map_err(|_| {
            BinanceApiError::Config(format!("missing environment variable {SECRET_KEY_VAR}"))
        })?;

        Ok(Self::new(api_key, secret_key))
    }

    /// Build credentials only when both halves are non-empty.
    pub fn from_parts(api_key: Option<&str>, secret_key: Option<&str>) -> Option<Self> {
        match (api_key, secret_key) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(Self::new(key, secret))
            }
            _ => None,
        }
    }

    /// The public API key. Safe to log.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// True when both the key and the secret are non-empty.
    ///
    /// Incomplete credentials never authenticate a client.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Expose the secret for signing. Never log the return value.
    pub(crate) fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
