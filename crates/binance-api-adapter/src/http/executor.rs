/*
[INPUT]:  Bound calls (pending request + result decoder) and an execution mode
[OUTPUT]: Decoded results delivered by blocking, future or callback
[POS]:    HTTP layer - request execution and response decoding
[UPDATE]: When adding execution modes or changing response/error mapping
*/

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, mpsc};
use std::task::{Context, Poll};
use std::time::Instant;

use futures_util::FutureExt;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::http::interceptor::InterceptorChain;
use crate::http::request::PendingRequest;
use crate::http::transport::Transport;
use crate::http::{BinanceApiError, ErrorDecoder, Result};

/// Fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Decode a JSON body. An empty body decodes as `null`.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let trimmed = body.trim_ascii();
    let json: &[u8] = if trimmed.is_empty() { b"null" } else { trimmed };

    serde_json::from_slice(json).map_err(|source| BinanceApiError::Decode {
        source,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Map a buffered response to the call's outcome.
///
/// 2xx bodies go to `decoder`; anything else goes to [`ErrorDecoder`].
pub fn decode_response<T>(
    response: RawResponse,
    decoder: impl FnOnce(&[u8]) -> Result<T>,
) -> Result<T> {
    if response.status.is_success() {
        decoder(&response.body)
    } else {
        Err(ErrorDecoder::decode(response.status, &response.body))
    }
}

type BodyDecoder<T> = Box<dyn FnOnce(&[u8]) -> Result<T> + Send>;

/// A request bound to an operation, plus how to decode its result.
pub struct Call<T> {
    request: PendingRequest,
    decoder: BodyDecoder<T>,
}

impl<T: DeserializeOwned + 'static> Call<T> {
    pub(crate) fn new(request: PendingRequest) -> Self {
        Self {
            request,
            decoder: Box::new(decode_body::<T>),
        }
    }
}

impl<T> Call<T> {
    pub fn request(&self) -> &PendingRequest {
        &self.request
    }
}

impl<T: 'static> Call<T> {
    /// Transform the decoded value, e.g. to unwrap a single-field envelope.
    pub fn map<U, F>(self, f: F) -> Call<U>
    where
        U: 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let decoder = self.decoder;
        Call {
            request: self.request,
            decoder: Box::new(move |body: &[u8]| decoder(body).map(f)),
        }
    }
}

impl<T> fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call").field("request", &self.request).finish()
    }
}

/// Sends calls through one pipeline: interceptors, limits, pool, decoding.
#[derive(Debug, Clone)]
pub struct Executor {
    transport: Arc<Transport>,
    client: Client,
    chain: InterceptorChain,
}

impl Executor {
    pub(crate) fn new(transport: Arc<Transport>, client: Client, chain: InterceptorChain) -> Self {
        Self {
            transport,
            client,
            chain,
        }
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// One full round trip. Every execution mode ends up here.
    pub fn run<T: Send + 'static>(
        &self,
        call: Call<T>,
    ) -> impl Future<Output = Result<T>> + Send + 'static {
        let transport = Arc::clone(&self.transport);
        let client = self.client.clone();
        let chain = self.chain.clone();

        async move {
            let Call { request, decoder } = call;
            let request = chain.apply(request)?;
            let operation = request.operation();
            let host = host_key(request.url());

            let permit = transport.dispatcher().acquire(&host).await?;
            debug!(
                operation = operation.name,
                method = %operation.method,
                path = operation.path,
                "sending request"
            );
            let started = Instant::now();

            let response = request.into_builder(&client).send().await.map_err(|e| {
                let e = e.without_url();
                warn!(operation = operation.name, error = %e, "request failed");
                BinanceApiError::Transport(e)
            })?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| BinanceApiError::Transport(e.without_url()))?;
            drop(permit);

            let elapsed_ms = started.elapsed().as_millis() as u64;
            let result = decode_response(
                RawResponse {
                    status,
                    body: body.to_vec(),
                },
                decoder,
            );
            match &result {
                Ok(_) => debug!(operation = operation.name, %status, elapsed_ms, "request completed"),
                Err(err) => warn!(
                    operation = operation.name,
                    %status,
                    elapsed_ms,
                    code = err.api_error().map(|e| e.code),
                    "request returned error"
                ),
            }
            result
        }
    }

    fn spawn<T: Send + 'static>(&self, call: Call<T>) -> Result<JoinHandle<Result<T>>> {
        self.transport.spawn(self.run(call))
    }

    /// Block the current thread until the call completes.
    ///
    /// The I/O runs on a transport worker while this thread is parked, so
    /// it is safe to call from any thread, including one inside an async
    /// runtime.
    pub fn execute_blocking<T: Send + 'static>(&self, call: Call<T>) -> Result<T> {
        let (tx, rx) = mpsc::sync_channel(1);
        let future = self.run(call);
        self.transport.spawn(async move {
            let _ = tx.send(future.await);
        })?;
        rx.recv().unwrap_or(Err(BinanceApiError::Cancelled))
    }

    /// Start the call on a worker thread and return a handle to await.
    pub fn execute_async<T: Send + 'static>(&self, call: Call<T>) -> PendingCall<T> {
        match self.spawn(call) {
            Ok(handle) => PendingCall::running(handle),
            Err(err) => PendingCall::failed(err),
        }
    }

    /// Start the call and deliver its outcome to exactly one of the closures.
    ///
    /// When the worker runtime is gone, `on_failure` runs on the calling
    /// thread with [`BinanceApiError::Cancelled`].
    pub fn enqueue<T, S, F>(&self, call: Call<T>, on_success: S, on_failure: F)
    where
        T: Send + 'static,
        S: FnOnce(T) + Send + 'static,
        F: FnOnce(BinanceApiError) + Send + 'static,
    {
        let handle = match self.transport.handle() {
            Ok(handle) => handle,
            Err(err) => {
                error!(error = %err, "transport runtime unavailable");
                on_failure(err);
                return;
            }
        };

        let future = self.run(call);
        handle.spawn(async move {
            match future.await {
                Ok(value) => on_success(value),
                Err(err) => on_failure(err),
            }
        });
    }
}

/// `host:port` key for per-host limits.
fn host_key(url: &reqwest::Url) -> String {
    match (url.host_str(), url.port_or_known_default()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

/// Future returned by async-mode clients.
///
/// Dropping it stops waiting but lets the request finish on the worker.
pub struct PendingCall<T> {
    state: PendingState<T>,
}

enum PendingState<T> {
    Running(JoinHandle<Result<T>>),
    Failed(Option<BinanceApiError>),
}

impl<T> PendingCall<T> {
    fn running(handle: JoinHandle<Result<T>>) -> Self {
        Self {
            state: PendingState::Running(handle),
        }
    }

    pub(crate) fn failed(err: BinanceApiError) -> Self {
        Self {
            state: PendingState::Failed(Some(err)),
        }
    }
}

impl<T> Future for PendingCall<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            PendingState::Running(handle) => handle
                .poll_unpin(cx)
                .map(|joined| joined.unwrap_or(Err(BinanceApiError::Cancelled))),
            PendingState::Failed(err) => {
                Poll::Ready(Err(err.take().unwrap_or(BinanceApiError::Cancelled)))
            }
        }
    }
}

impl<T> fmt::Debug for PendingCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            PendingState::Running(_) => "running",
            PendingState::Failed(_) => "failed",
        };
        f.debug_struct("PendingCall").field("state", &state).finish()
    }
}

/// Call handle returned by callback-mode clients.
#[must_use = "nothing is sent until `enqueue` is called"]
pub struct CallbackCall<T> {
    executor: Executor,
    call: Result<Call<T>>,
}

impl<T: Send + 'static> CallbackCall<T> {
    /// Send the call. Exactly one closure runs, once.
    ///
    /// Requests rejected during assembly invoke `on_failure` right away on
    /// the calling thread; everything else completes on a worker thread.
    pub fn enqueue<S, F>(self, on_success: S, on_failure: F)
    where
        S: FnOnce(T) + Send + 'static,
        F: FnOnce(BinanceApiError) + Send + 'static,
    {
        match self.call {
            Ok(call) => self.executor.enqueue(call, on_success, on_failure),
            Err(err) => on_failure(err),
        }
    }
}

impl<T> fmt::Debug for CallbackCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCall")
            .field("call", &self.call.as_ref().map(|call| call.request()))
            .finish()
    }
}

/// How a client delivers results. Chosen once, when the client is built.
pub trait ExecutionMode: Send + Sync + 'static {
    type Output<T: Send + 'static>;

    fn dispatch<T: Send + 'static>(executor: &Executor, call: Result<Call<T>>) -> Self::Output<T>;
}

/// Results are returned directly; the caller's thread waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blocking;

/// Results are returned as [`PendingCall`] futures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Async;

/// Results are delivered to closures through [`CallbackCall::enqueue`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Callback;

impl ExecutionMode for Blocking {
    type Output<T: Send + 'static> = Result<T>;

    fn dispatch<T: Send + 'static>(executor: &Executor, call: Result<Call<T>>) -> Result<T> {
        executor.execute_blocking(call?)
    }
}

impl ExecutionMode for Async {
    type Output<T: Send + 'static> = PendingCall<T>;

    fn dispatch<T: Send + 'static>(executor: &Executor, call: Result<Call<T>>) -> PendingCall<T> {
        match call {
            Ok(call) => executor.execute_async(call),
            Err(err) => PendingCall::failed(err),
        }
    }
}

impl ExecutionMode for Callback {
    type Output<T: Send + 'static> = CallbackCall<T>;

    fn dispatch<T: Send + 'static>(executor: &Executor, call: Result<Call<T>>) -> CallbackCall<T> {
        CallbackCall {
            executor: executor.clone(),
            call,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::TransportConfig;
    use crate::http::operation::Operation;
    use crate::http::request::Params;
    use serde::Deserialize;
    use serde::de::IgnoredAny;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Price {
        symbol: String,
        price: String,
    }

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).expect("status"),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_success_body_is_decoded() {
        let price: Price = decode_response(
            raw(200, r#"{"symbol":"BTCUSDT","price":"42000.10"}"#),
            decode_body,
        )
        .expect("decode");

        assert_eq!(
            price,
            Price {
                symbol: "BTCUSDT".into(),
                price: "42000.10".into()
            }
        );
    }

    #[test]
    fn test_empty_body_is_no_content() {
        decode_response::<serde::de::IgnoredAny>(raw(200, ""), decode_body).expect("empty body");
        let empty: Option<Price> = decode_response(raw(200, "  \n"), decode_body).expect("blank body");
        assert!(empty.is_none());
    }

    #[test]
    fn test_error_status_uses_error_decoder() {
        let err = decode_response::<Price>(
            raw(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#),
            decode_body,
        )
        .unwrap_err();

        let api = err.api_error().expect("api error");
        assert_eq!((api.code, api.msg.as_str()), (-1121, "Invalid symbol."));
    }

    #[test]
    fn test_error_status_never_reaches_decoder() {
        let err = decode_response::<()>(raw(503, "busy"), |_| panic!("decoder must not run"))
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_mismatched_success_body_is_decode_error() {
        let err = decode_response::<Price>(raw(200, "[1,2]"), decode_body).unwrap_err();
        match err {
            BinanceApiError::Decode { body, .. } => assert_eq!(body, "[1,2]"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_host_key_includes_port() {
        let url = reqwest::Url::parse("https://api.binance.com/api/v3/ping").expect("url");
        assert_eq!(host_key(&url), "api.binance.com:443");
        let url = reqwest::Url::parse("http://127.0.0.1:8080/x").expect("url");
        assert_eq!(host_key(&url), "127.0.0.1:8080");
    }

    static PING: Operation = Operation::get("ping", "/api/v3/ping");

    fn ping_call() -> Call<IgnoredAny> {
        let url = reqwest::Url::parse("http://127.0.0.1:9/api/v3/ping").expect("url");
        Call::new(PendingRequest::new(&PING, url, Params::new()).expect("request"))
    }

    fn stopped_executor() -> Executor {
        let mut transport = Transport::new(TransportConfig::default().with_base_url("http://127.0.0.1:9"))
            .expect("transport");
        transport.stop_workers();
        let client = transport.client().clone();
        Executor::new(Arc::new(transport), client, InterceptorChain::default())
    }

    #[test]
    fn test_enqueue_without_workers_runs_failure_on_caller() {
        let executor = stopped_executor();
        let caller = std::thread::current().id();
        let (tx, rx) = mpsc::channel();
        let success_tx = tx.clone();

        executor.enqueue(
            ping_call(),
            move |_| {
                let _ = success_tx.send(Err("success callback ran"));
            },
            move |err| {
                let _ = tx.send(Ok((std::thread::current().id(), err)));
            },
        );

        let (thread, err) = rx.try_recv().expect("callback ran").expect("failure callback");
        assert_eq!(thread, caller);
        assert!(matches!(err, BinanceApiError::Cancelled));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_callback_call_debug_shows_request() {
        let call = CallbackCall {
            executor: stopped_executor(),
            call: Ok(ping_call()),
        };
        let rendered = format!("{call:?}");
        assert!(rendered.contains("CallbackCall"));
        assert!(rendered.contains("\"ping\""));
    }

    #[test]
    fn test_blocking_without_workers_is_cancelled() {
        let err = stopped_executor().execute_blocking(ping_call()).unwrap_err();
        assert!(matches!(err, BinanceApiError::Cancelled));
    }

    #[tokio::test]
    async fn test_async_without_workers_is_cancelled() {
        let err = stopped_executor().execute_async(ping_call()).await.unwrap_err();
        assert!(matches!(err, BinanceApiError::Cancelled));
    }

    #[tokio::test]
    async fn test_failed_pending_call_resolves_immediately() {
        let err = PendingCall::<u8>::failed(BinanceApiError::InvalidRequest("bad".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, BinanceApiError::InvalidRequest(_)));
    }
}
