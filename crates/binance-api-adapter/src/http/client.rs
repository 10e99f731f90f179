/*
[INPUT]:  Shared transport, optional API credentials, optional proxy
[OUTPUT]: REST clients in blocking, async or callback execution mode
[POS]:    HTTP layer - client factory and facade core
[UPDATE]: When adding client kinds or changing parameter defaulting
*/

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use reqwest::Proxy;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::auth::ApiCredentials;
use crate::http::endpoints::REST_OPERATIONS;
use crate::http::executor::{Async, Blocking, Call, Callback, ExecutionMode};
use crate::http::operation::Operation;
use crate::http::request::Params;
use crate::http::service::{BoundService, ServiceGenerator};
use crate::http::transport::Transport;
use crate::http::{DEFAULT_RECEIVING_WINDOW, Result};

/// Blocking REST client: every method returns `Result<T>`.
pub type BinanceApiRestClient = RestClient<Blocking>;

/// Async REST client: every method returns a [`PendingCall`] future.
///
/// [`PendingCall`]: crate::http::PendingCall
pub type BinanceApiAsyncRestClient = RestClient<Async>;

/// Callback REST client: every method returns a [`CallbackCall`] to enqueue.
///
/// [`CallbackCall`]: crate::http::CallbackCall
pub type BinanceApiCallbackRestClient = RestClient<Callback>;

/// Creates REST clients that share one [`Transport`].
///
/// Each client gets its own request pipeline; the connection pool, limits
/// and worker threads stay shared.
#[derive(Debug, Clone)]
pub struct BinanceApiClientFactory {
    transport: Arc<Transport>,
    credentials: Option<ApiCredentials>,
}

impl BinanceApiClientFactory {
    /// Credentials with an empty key or secret are discarded, so the
    /// resulting clients are public.
    pub fn new(transport: Arc<Transport>, credentials: Option<ApiCredentials>) -> Self {
        Self {
            transport,
            credentials: credentials.filter(ApiCredentials::is_complete),
        }
    }

    /// Factory for authenticated clients.
    pub fn with_credentials(
        transport: Arc<Transport>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self::new(transport, Some(ApiCredentials::new(api_key, secret_key)))
    }

    /// Factory for clients limited to public endpoints.
    pub fn public(transport: Arc<Transport>) -> Self {
        Self::new(transport, None)
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub fn new_rest_client(&self) -> Result<BinanceApiRestClient> {
        self.new_client(None)
    }

    pub fn new_rest_client_with_proxy(&self, proxy: Proxy) -> Result<BinanceApiRestClient> {
        self.new_client(Some(proxy))
    }

    pub fn new_async_rest_client(&self) -> Result<BinanceApiAsyncRestClient> {
        self.new_client(None)
    }

    pub fn new_async_rest_client_with_proxy(&self, proxy: Proxy) -> Result<BinanceApiAsyncRestClient> {
        self.new_client(Some(proxy))
    }

    pub fn new_callback_rest_client(&self) -> Result<BinanceApiCallbackRestClient> {
        self.new_client(None)
    }

    pub fn new_callback_rest_client_with_proxy(
        &self,
        proxy: Proxy,
    ) -> Result<BinanceApiCallbackRestClient> {
        self.new_client(Some(proxy))
    }

    /// Client in any execution mode.
    pub fn new_client<M: ExecutionMode>(&self, proxy: Option<Proxy>) -> Result<RestClient<M>> {
        let service = ServiceGenerator::bind(
            REST_OPERATIONS,
            Arc::clone(&self.transport),
            self.credentials.as_ref(),
            proxy,
        )?;
        Ok(RestClient {
            service,
            _mode: PhantomData,
        })
    }
}

/// REST facade over one bound service. `M` picks how results are delivered.
///
/// Endpoint methods are grouped in `public`, `trade` and `user`.
pub struct RestClient<M: ExecutionMode> {
    service: BoundService,
    _mode: PhantomData<M>,
}

impl<M: ExecutionMode> RestClient<M> {
    pub fn is_authenticated(&self) -> bool {
        self.service.is_authenticated()
    }

    pub fn transport(&self) -> &Arc<Transport> {
        self.service.executor().transport()
    }

    pub(crate) fn call<T>(&self, operation: &'static Operation, params: Params) -> Result<Call<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.service.call(operation, params)
    }

    pub(crate) fn dispatch<T>(&self, call: Result<Call<T>>) -> M::Output<T>
    where
        T: Send + 'static,
    {
        M::dispatch(self.service.executor(), call)
    }

    pub(crate) fn send<T>(&self, operation: &'static Operation, params: Params) -> M::Output<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.dispatch(self.call(operation, params))
    }

    /// Send an operation whose response body carries nothing of interest.
    pub(crate) fn send_empty(&self, operation: &'static Operation, params: Params) -> M::Output<()> {
        self.dispatch(self.call::<IgnoredAny>(operation, params).map(|call| call.map(|_| ())))
    }
}

impl<M: ExecutionMode> Clone for RestClient<M> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            _mode: PhantomData,
        }
    }
}

impl<M: ExecutionMode> fmt::Debug for RestClient<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("mode", &std::any::type_name::<M>())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Append `recvWindow` and `timestamp`, defaulting to the standard window and now.
pub(crate) fn with_signing_window(params: Params, recv_window: Option<u64>, timestamp: Option<i64>) -> Params {
    params
        .with("recvWindow", recv_window.unwrap_or(DEFAULT_RECEIVING_WINDOW))
        .with("timestamp", timestamp.unwrap_or_else(|| Utc::now().timestamp_millis()))
}
