/*
[INPUT]:  Static operation table, shared transport, optional credentials and proxy
[OUTPUT]: Bound service producing typed calls over one request pipeline
[POS]:    HTTP layer - service generation (operation table -> pipeline)
[UPDATE]: When the operation table rules or pipeline wiring change
*/

use std::collections::HashSet;
use std::ptr;
use std::sync::Arc;

use reqwest::Proxy;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::ApiCredentials;
use crate::http::executor::{Call, Executor};
use crate::http::interceptor::InterceptorChain;
use crate::http::operation::{Operation, Security};
use crate::http::request::{PendingRequest, Params, SIGNATURE_PARAM};
use crate::http::transport::Transport;
use crate::http::{BinanceApiError, Result};

/// Binds an operation table to a request pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceGenerator;

impl ServiceGenerator {
    /// Build one pipeline for `credentials` on top of the shared transport.
    ///
    /// With a `proxy`, the pipeline gets its own client that routes through
    /// it; the transport's base client is never touched.
    pub fn bind(
        operations: &'static [&'static Operation],
        transport: Arc<Transport>,
        credentials: Option<&ApiCredentials>,
        proxy: Option<Proxy>,
    ) -> Result<BoundService> {
        Self::validate(operations)?;

        let chain = InterceptorChain::for_credentials(credentials, transport.config())?;
        let client = match proxy {
            Some(proxy) => transport.proxied_client(proxy)?,
            None => transport.client().clone(),
        };

        debug!(
            operations = operations.len(),
            authenticated = credentials.is_some(),
            steps = ?chain.step_names(),
            "service bound"
        );

        Ok(BoundService {
            operations,
            executor: Executor::new(transport, client, chain),
            authenticated: credentials.is_some(),
        })
    }

    /// Reject tables that could never produce a valid request.
    pub fn validate(operations: &[&Operation]) -> Result<()> {
        let mut names = HashSet::new();
        for op in operations {
            if !names.insert(op.name) {
                return Err(malformed(op, "duplicate operation name"));
            }
            if !op.path.starts_with('/') {
                return Err(malformed(op, "path must start with '/'"));
            }

            let mut params = HashSet::new();
            for param in op.params {
                if !params.insert(*param) {
                    return Err(malformed(op, &format!("parameter '{param}' declared twice")));
                }
            }
            if params.contains(SIGNATURE_PARAM) {
                return Err(malformed(op, "'signature' is reserved for the auth step"));
            }
            if op.security == Security::Signed && !params.contains("timestamp") {
                return Err(malformed(op, "signed operations must declare 'timestamp'"));
            }
        }
        Ok(())
    }
}

fn malformed(op: &Operation, reason: &str) -> BinanceApiError {
    BinanceApiError::Config(format!("operation '{}': {reason}", op.name))
}

/// Operation table wired to one request pipeline.
#[derive(Debug, Clone)]
pub struct BoundService {
    operations: &'static [&'static Operation],
    executor: Executor,
    authenticated: bool,
}

impl BoundService {
    /// Build the call for `operation` without sending it.
    pub fn call<T: DeserializeOwned + Send + 'static>(
        &self,
        operation: &'static Operation,
        params: Params,
    ) -> Result<Call<T>> {
        if !self.operations.iter().any(|op| ptr::eq(*op, operation)) {
            return Err(BinanceApiError::Config(format!(
                "operation '{}' is not bound to this service",
                operation.name
            )));
        }
        if operation.security.requires_api_key() && !self.authenticated {
            return Err(BinanceApiError::InvalidRequest(format!(
                "operation '{}' requires API credentials",
                operation.name
            )));
        }

        let url = self
            .executor
            .transport()
            .base_url(operation.base)
            .join(operation.path)?;
        PendingRequest::new(operation, url, params).map(Call::new)
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn operations(&self) -> &'static [&'static Operation] {
        self.operations
    }
}
