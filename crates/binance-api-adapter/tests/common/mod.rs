/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for binance-api-adapter tests

use std::sync::Arc;

use binance_api_adapter::{BinanceApiClientFactory, Transport, TransportConfig};
use wiremock::MockServer;

#[allow(dead_code)]
pub const TEST_API_KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";
#[allow(dead_code)]
pub const TEST_SECRET_KEY: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Transport pointed at `base_url` for both API and asset hosts
#[allow(dead_code)]
pub fn transport_for(base_url: &str) -> Arc<Transport> {
    transport_with(TransportConfig::default().with_base_url(base_url))
}

#[allow(dead_code)]
pub fn transport_with(config: TransportConfig) -> Arc<Transport> {
    Transport::shared(config).expect("transport init")
}

/// Factory holding the test credentials
#[allow(dead_code)]
pub fn signed_factory(transport: Arc<Transport>) -> BinanceApiClientFactory {
    BinanceApiClientFactory::with_credentials(transport, TEST_API_KEY, TEST_SECRET_KEY)
}

/// Factory without credentials
#[allow(dead_code)]
pub fn public_factory(transport: Arc<Transport>) -> BinanceApiClientFactory {
    BinanceApiClientFactory::public(transport)
}

/// Standard error body for an unknown order
#[allow(dead_code)]
pub fn unknown_order_body() -> &'static str {
    r#"{"code": -2013, "msg": "Order does not exist."}"#
}
