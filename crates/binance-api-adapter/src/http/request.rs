/*
[INPUT]:  Operation descriptor, resolved URL, caller-supplied parameters
[OUTPUT]: Un-executed request with ordered, encoded parameters and headers
[POS]:    HTTP layer - pending request representation
[UPDATE]: When parameter encoding or signature placement changes
*/

use std::fmt;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use url::form_urlencoded;

use crate::http::operation::{Operation, ParamEncoding};
use crate::http::{BinanceApiError, Result};

/// Name of the trailing signature parameter.
pub const SIGNATURE_PARAM: &str = "signature";

/// Caller-supplied parameters, in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Add a parameter only when a value is present.
    pub fn with_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Encoded bytes frozen at signing time plus their signature.
#[derive(Clone)]
struct SignedPayload {
    payload: String,
    signature: String,
}

/// A fully parameterized request that has not been sent yet.
///
/// Parameters are fixed at construction. After that, only headers can be
/// added and a signature attached, so the signature always comes last and
/// covers exactly the bytes that are sent.
#[derive(Clone)]
pub struct PendingRequest {
    operation: &'static Operation,
    url: Url,
    pairs: Vec<(&'static str, String)>,
    headers: HeaderMap,
    signed: Option<SignedPayload>,
}

impl PendingRequest {
    /// Order `params` by the operation's declared parameter list.
    pub(crate) fn new(operation: &'static Operation, url: Url, params: Params) -> Result<Self> {
        let mut indexed = Vec::with_capacity(params.pairs.len());
        for (key, value) in params.pairs {
            let index = operation.param_index(key).ok_or_else(|| {
                BinanceApiError::Config(format!(
                    "parameter '{key}' is not declared for operation '{}'",
                    operation.name
                ))
            })?;
            if indexed.iter().any(|(i, _, _)| *i == index) {
                return Err(BinanceApiError::Config(format!(
                    "parameter '{key}' supplied twice for operation '{}'",
                    operation.name
                )));
            }
            indexed.push((index, key, value));
        }
        indexed.sort_by_key(|(index, _, _)| *index);

        Ok(Self {
            operation,
            url,
            pairs: indexed.into_iter().map(|(_, k, v)| (k, v)).collect(),
            headers: HeaderMap::new(),
            signed: None,
        })
    }

    pub fn operation(&self) -> &'static Operation {
        self.operation
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parameters in wire order, excluding the signature.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_signed(&self) -> bool {
        self.signed.is_some()
    }

    /// Form-urlencoded parameters without the signature.
    pub fn encoded_params(&self) -> String {
        match &self.signed {
            Some(signed) => signed.payload.clone(),
            None => encode(&self.pairs),
        }
    }

    /// Exact query string or body that goes on the wire.
    pub fn payload(&self) -> String {
        match &self.signed {
            Some(SignedPayload { payload, signature }) if payload.is_empty() => {
                format!("{SIGNATURE_PARAM}={signature}")
            }
            Some(SignedPayload { payload, signature }) => {
                format!("{payload}&{SIGNATURE_PARAM}={signature}")
            }
            None => encode(&self.pairs),
        }
    }

    /// Set a header, replacing any previous value.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Freeze the encoded parameters and attach `sign(payload)` as the last parameter.
    ///
    /// Signing twice recomputes over the same frozen bytes; the request
    /// never carries more than one signature.
    pub fn sign_with(&mut self, sign: impl FnOnce(&str) -> String) {
        let payload = self.encoded_params();
        let signature = sign(&payload);
        self.signed = Some(SignedPayload { payload, signature });
    }

    pub(crate) fn into_builder(self, client: &Client) -> RequestBuilder {
        let payload = self.payload();
        let mut url = self.url;
        let method = self.operation.method.as_method();

        let builder = match self.operation.encoding {
            ParamEncoding::Query => {
                if !payload.is_empty() {
                    url.set_query(Some(&payload));
                }
                client.request(method, url)
            }
            ParamEncoding::Form => client
                .request(method, url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(payload),
        };

        builder.headers(self.headers)
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("operation", &self.operation.name)
            .field("method", &self.operation.method)
            .field("path", &self.operation.path)
            .field("param_count", &self.pairs.len())
            .field("signed", &self.is_signed())
            .finish()
    }
}

fn encode(pairs: &[(&'static str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
