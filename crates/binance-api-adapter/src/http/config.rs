/*
[INPUT]:  Environment selection, pool limits, timeouts, header values
[OUTPUT]: Transport configuration with production defaults
[POS]:    HTTP layer - transport configuration
[UPDATE]: When adding connection options or new environments
*/

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::http::BinanceApiError;

/// Default tolerance for stale signed requests, in milliseconds.
pub const DEFAULT_RECEIVING_WINDOW: u64 = 60_000;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.14; rv:67.0) Gecko/20100101 Firefox/67.0";
const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Binance environment (production or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinanceEnvironment {
    #[default]
    Production,
    Testnet,
}

impl BinanceEnvironment {
    /// Base URL for general API operations.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.binance.com",
            Self::Testnet => "https://testnet.binance.vision",
        }
    }

    /// Base URL for asset-info operations, historically served from the web host.
    pub fn asset_base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://www.binance.com",
            Self::Testnet => "https://testnet.binance.vision",
        }
    }

    /// Read `BINANCE_ENVIRONMENT`, falling back to production.
    pub fn from_env() -> Self {
        std::env::var("BINANCE_ENVIRONMENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for BinanceEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for BinanceEnvironment {
    type Err = BinanceApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" | "mainnet" => Ok(Self::Production),
            "testnet" | "test" | "sandbox" => Ok(Self::Testnet),
            _ => Err(BinanceApiError::Config(format!(
                "invalid environment '{s}', expected 'production' or 'testnet'"
            ))),
        }
    }
}

/// Transport configuration, shared by every client built from one [`Transport`].
///
/// [`Transport`]: crate::http::Transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub environment: BinanceEnvironment,
    /// Overrides the environment's API base URL (e.g. a mock server).
    pub api_base_url: Option<String>,
    /// Overrides the environment's asset-info base URL.
    pub asset_base_url: Option<String>,
    /// Ceiling on requests in flight across all hosts.
    pub max_requests: usize,
    /// Ceiling on requests in flight to a single host.
    pub max_requests_per_host: usize,
    pub keep_alive_interval: Duration,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Threads of the transport runtime that performs all network I/O.
    pub worker_threads: usize,
    pub api_key_header: String,
    pub user_agent: String,
    pub accept: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            environment: BinanceEnvironment::Production,
            api_base_url: None,
            asset_base_url: None,
            max_requests: 500,
            max_requests_per_host: 500,
            keep_alive_interval: Duration::from_secs(20),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            worker_threads: 2,
            api_key_header: "X-API-KEY".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

impl TransportConfig {
    /// Configuration for the given environment with default limits.
    pub fn for_environment(environment: BinanceEnvironment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// Point both base URLs at one host, typically a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.api_base_url = Some(base_url.clone());
        self.asset_base_url = Some(base_url);
        self
    }

    pub(crate) fn resolved_api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.api_base_url())
    }

    pub(crate) fn resolved_asset_base_url(&self) -> &str {
        self.asset_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.asset_base_url())
    }

    pub(crate) fn validate(&self) -> Result<(), BinanceApiError> {
        if self.max_requests == 0 || self.max_requests_per_host == 0 {
            return Err(BinanceApiError::Config(
                "connection limits must be greater than zero".to_string(),
            ));
        }
        if self.worker_threads == 0 {
            return Err(BinanceApiError::Config(
                "worker_threads must be greater than zero".to_string(),
            ));
        }
        if self.api_key_header.trim().is_empty() {
            return Err(BinanceApiError::Config("api_key_header must not be empty".to_string()));
        }
        Ok(())
    }
}
