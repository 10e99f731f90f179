/*
[INPUT]:  Transport configuration, API credentials and operation tables
[OUTPUT]: Bound REST clients and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing the request pipeline
*/

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod executor;
pub mod interceptor;
pub mod operation;
pub mod public;
pub mod request;
pub mod service;
pub mod trade;
pub mod transport;
pub mod user;

pub use error::{ApiError, BinanceApiError, ErrorDecoder, Result};

pub use config::{BinanceEnvironment, DEFAULT_RECEIVING_WINDOW, TransportConfig};
pub use transport::{Transport, TransportStats};

pub use executor::{
    Async, Blocking, Call, Callback, CallbackCall, ExecutionMode, Executor, PendingCall,
    RawResponse, decode_body, decode_response,
};
pub use interceptor::{
    AuthInterceptor, InterceptorChain, PresentationInterceptor, RequestInterceptor,
};
pub use operation::{BaseUrl, HttpMethod, Operation, ParamEncoding, Security};
pub use request::{Params, PendingRequest};
pub use service::{BoundService, ServiceGenerator};

pub use client::{
    BinanceApiAsyncRestClient, BinanceApiCallbackRestClient, BinanceApiClientFactory,
    BinanceApiRestClient, RestClient,
};
