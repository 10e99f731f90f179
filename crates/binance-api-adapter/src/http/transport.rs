/*
[INPUT]:  Transport configuration (base URLs, pool limits, keep-alive, timeouts)
[OUTPUT]: Shared connection pool, request limits and worker runtime
[POS]:    HTTP layer - long-lived transport shared by every client
[UPDATE]: When adding connection options or changing pool/limit behavior
*/

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use reqwest::{Client, ClientBuilder, Proxy, Url};
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::http::operation::BaseUrl;
use crate::http::{BinanceApiError, Result, TransportConfig};

/// Snapshot of transport activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportStats {
    pub in_flight: usize,
    pub peak_in_flight: usize,
    pub completed: u64,
}

/// Bounds requests in flight overall and per destination host.
#[derive(Debug)]
pub(crate) struct Dispatcher {
    overall: Arc<Semaphore>,
    per_host_limit: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    completed: AtomicU64,
}

impl Dispatcher {
    fn new(max_requests: usize, max_requests_per_host: usize) -> Self {
        Self {
            overall: Arc::new(Semaphore::new(max_requests)),
            per_host_limit: max_requests_per_host,
            hosts: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            completed: AtomicU64::new(0),
        }
    }

    fn host_semaphore(&self, host: &str) -> Arc<Semaphore> {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
            .clone()
    }

    /// Wait for a host slot, then an overall slot.
    ///
    /// Host first, so a call queued behind a busy host never holds an
    /// overall slot that another host could use.
    pub(crate) async fn acquire(self: &Arc<Self>, host: &str) -> Result<DispatchPermit> {
        let host_permit = self
            .host_semaphore(host)
            .acquire_owned()
            .await
            .map_err(|_| BinanceApiError::Cancelled)?;
        let overall_permit = self
            .overall
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| BinanceApiError::Cancelled)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        Ok(DispatchPermit {
            _host: host_permit,
            _overall: overall_permit,
            dispatcher: Arc::clone(self),
        })
    }

    fn stats(&self) -> TransportStats {
        TransportStats {
            in_flight: self.in_flight.load(Ordering::SeqCst),
            peak_in_flight: self.peak_in_flight.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
        }
    }
}

/// Slot held for the full round trip of one request.
pub(crate) struct DispatchPermit {
    _host: OwnedSemaphorePermit,
    _overall: OwnedSemaphorePermit,
    dispatcher: Arc<Dispatcher>,
}

impl Drop for DispatchPermit {
    fn drop(&mut self) {
        self.dispatcher.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.dispatcher.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Worker runtime that never blocks when dropped, even from async code.
#[derive(Debug)]
struct WorkerRuntime(Option<Runtime>);

impl WorkerRuntime {
    fn handle(&self) -> Option<&Handle> {
        self.0.as_ref().map(Runtime::handle)
    }
}

impl Drop for WorkerRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// Long-lived transport shared by every client created from it.
///
/// Construct once at startup, wrap in an [`Arc`] and hand it to each
/// [`BinanceApiClientFactory`]. All network I/O runs on the transport's
/// own worker threads.
///
/// [`BinanceApiClientFactory`]: crate::http::BinanceApiClientFactory
#[derive(Debug)]
pub struct Transport {
    config: TransportConfig,
    client: Client,
    dispatcher: Arc<Dispatcher>,
    runtime: WorkerRuntime,
    api_base_url: Url,
    asset_base_url: Url,
}

impl Transport {
    /// Build the pool, limits and worker runtime.
    pub fn new(config: TransportConfig) -> Result<Self> {
        config.validate()?;

        let api_base_url = Url::parse(config.resolved_api_base_url())?;
        let asset_base_url = Url::parse(config.resolved_asset_base_url())?;
        let client = client_builder(&config)
            .build()
            .map_err(|e| BinanceApiError::Config(format!("failed to build HTTP client: {e}")))?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name("binance-transport")
            .enable_all()
            .build()
            .map_err(|e| BinanceApiError::Config(format!("failed to start transport runtime: {e}")))?;

        info!(
            environment = %config.environment,
            api_base_url = %api_base_url,
            max_requests = config.max_requests,
            max_requests_per_host = config.max_requests_per_host,
            "transport initialized"
        );

        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(config.max_requests, config.max_requests_per_host)),
            config,
            client,
            runtime: WorkerRuntime(Some(runtime)),
            api_base_url,
            asset_base_url,
        })
    }

    /// Same as [`Transport::new`], already wrapped for sharing.
    pub fn shared(config: TransportConfig) -> Result<Arc<Self>> {
        Self::new(config).map(Arc::new)
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn stats(&self) -> TransportStats {
        self.dispatcher.stats()
    }

    pub fn base_url(&self, base: BaseUrl) -> &Url {
        match base {
            BaseUrl::Api => &self.api_base_url,
            BaseUrl::AssetInfo => &self.asset_base_url,
        }
    }

    /// The pooled client used by every pipeline without a proxy.
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// A client with the same settings that routes through `proxy`.
    ///
    /// The shared base client is left untouched; request limits and the
    /// worker runtime stay shared.
    pub(crate) fn proxied_client(&self, proxy: Proxy) -> Result<Client> {
        debug!("building proxied client");
        client_builder(&self.config)
            .proxy(proxy)
            .build()
            .map_err(|e| BinanceApiError::Config(format!("failed to build proxied client: {e}")))
    }

    pub(crate) fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Handle to the worker runtime, or `Cancelled` once it has shut down.
    pub(crate) fn handle(&self) -> Result<&Handle> {
        self.runtime.handle().ok_or(BinanceApiError::Cancelled)
    }

    /// Run `future` on a transport worker thread.
    pub(crate) fn spawn<F>(&self, future: F) -> Result<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle().map(|handle| handle.spawn(future))
    }

    /// Stop the worker runtime while the transport itself stays alive.
    #[cfg(test)]
    pub(crate) fn stop_workers(&mut self) {
        if let Some(runtime) = self.runtime.0.take() {
            runtime.shutdown_background();
        }
    }
}

fn client_builder(config: &TransportConfig) -> ClientBuilder {
    Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .tcp_keepalive(config.keep_alive_interval)
        .pool_max_idle_per_host(config.max_requests_per_host)
}
