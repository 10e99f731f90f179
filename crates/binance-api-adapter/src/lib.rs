/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Binance API adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{ApiCredentials, HmacSigner};

// Re-export commonly used types from http
pub use http::{
    ApiError,
    BinanceApiAsyncRestClient,
    BinanceApiCallbackRestClient,
    BinanceApiClientFactory,
    BinanceApiError,
    BinanceApiRestClient,
    BinanceEnvironment,
    Result,
    Transport,
    TransportConfig,
};

// Re-export all types
pub use types::*;
