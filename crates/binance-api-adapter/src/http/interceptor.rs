/*
[INPUT]:  Pending requests, optional credentials, presentation headers
[OUTPUT]: Requests carrying API-key header, signature, user-agent and accept headers
[POS]:    HTTP layer - ordered per-request mutation steps
[UPDATE]: When adding interceptor steps or changing header/signature placement
*/

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderName, HeaderValue, USER_AGENT};

use crate::auth::{ApiCredentials, HmacSigner};
use crate::http::operation::Security;
use crate::http::request::PendingRequest;
use crate::http::{BinanceApiError, Result, TransportConfig};

/// One mutation step applied to every outgoing request.
pub trait RequestInterceptor: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn intercept(&self, request: PendingRequest) -> Result<PendingRequest>;
}

/// Adds the API-key header and, for signed operations, the trailing signature.
pub struct AuthInterceptor {
    credentials: ApiCredentials,
    header_name: HeaderName,
    header_value: HeaderValue,
}

impl AuthInterceptor {
    pub fn new(credentials: ApiCredentials, header_name: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|e| BinanceApiError::Config(format!("invalid API key header name: {e}")))?;
        let mut header_value = HeaderValue::from_str(credentials.api_key())
            .map_err(|e| BinanceApiError::Config(format!("invalid API key: {e}")))?;
        header_value.set_sensitive(true);

        Ok(Self {
            credentials,
            header_name,
            header_value,
        })
    }
}

impl fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("header_name", &self.header_name)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl RequestInterceptor for AuthInterceptor {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn intercept(&self, mut request: PendingRequest) -> Result<PendingRequest> {
        let security = request.operation().security;
        if security.requires_api_key() {
            request.set_header(self.header_name.clone(), self.header_value.clone());
        }
        if security == Security::Signed {
            let secret = self.credentials.expose_secret();
            request.sign_with(|payload| HmacSigner::sign(secret, payload));
        }
        Ok(request)
    }
}

/// Sets the fixed user-agent and accept headers.
#[derive(Debug, Clone)]
pub struct PresentationInterceptor {
    user_agent: HeaderValue,
    accept: HeaderValue,
}

impl PresentationInterceptor {
    pub fn new(user_agent: &str, accept: &str) -> Result<Self> {
        Ok(Self {
            user_agent: HeaderValue::from_str(user_agent)
                .map_err(|e| BinanceApiError::Config(format!("invalid user agent: {e}")))?,
            accept: HeaderValue::from_str(accept)
                .map_err(|e| BinanceApiError::Config(format!("invalid accept header: {e}")))?,
        })
    }
}

impl RequestInterceptor for PresentationInterceptor {
    fn name(&self) -> &'static str {
        "presentation"
    }

    fn intercept(&self, mut request: PendingRequest) -> Result<PendingRequest> {
        request.set_header(USER_AGENT, self.user_agent.clone());
        request.set_header(ACCEPT, self.accept.clone());
        Ok(request)
    }
}

/// Ordered list of interceptors applied before a request is sent.
#[derive(Debug, Clone, Default)]
pub struct InterceptorChain {
    steps: Vec<Arc<dyn RequestInterceptor>>,
}

impl InterceptorChain {
    /// Auth step (only with credentials) followed by the presentation step.
    pub fn for_credentials(
        credentials: Option<&ApiCredentials>,
        config: &TransportConfig,
    ) -> Result<Self> {
        let mut chain = Self::default();
        if let Some(credentials) = credentials {
            chain = chain.with(AuthInterceptor::new(credentials.clone(), &config.api_key_header)?);
        }
        Ok(chain.with(PresentationInterceptor::new(&config.user_agent, &config.accept)?))
    }

    pub fn with(mut self, step: impl RequestInterceptor + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn apply(&self, request: PendingRequest) -> Result<PendingRequest> {
        self.steps
            .iter()
            .try_fold(request, |request, step| step.intercept(request))
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::operation::Operation;
    use crate::http::request::Params;
    use reqwest::Url;

    static PUBLIC: Operation = Operation::get("depth", "/api/v3/depth").params(&["symbol"]);
    static KEYED: Operation = Operation::post("stream", "/api/v3/userDataStream").security(Security::ApiKey);
    static SIGNED: Operation = Operation::get("account", "/api/v3/account")
        .params(&["recvWindow", "timestamp"])
        .security(Security::Signed);

    fn pending(op: &'static Operation, params: Params) -> PendingRequest {
        let url = Url::parse("https://api.binance.com").expect("url").join(op.path).expect("join");
        PendingRequest::new(op, url, params).expect("pending request")
    }

    fn chain(credentials: Option<&ApiCredentials>) -> InterceptorChain {
        InterceptorChain::for_credentials(credentials, &TransportConfig::default()).expect("chain")
    }

    #[test]
    fn test_chain_order() {
        let creds = ApiCredentials::new("key", "secret");
        assert_eq!(chain(Some(&creds)).step_names(), vec!["auth", "presentation"]);
        assert_eq!(chain(None).step_names(), vec!["presentation"]);
    }

    #[test]
    fn test_signed_request_gets_key_and_signature() {
        let creds = ApiCredentials::new("my-key", "secret");
        let req = chain(Some(&creds))
            .apply(pending(&SIGNED, Params::new().with("timestamp", 1).with("recvWindow", 5000)))
            .expect("apply");

        let expected = HmacSigner::sign("secret", "recvWindow=5000&timestamp=1");
        assert_eq!(req.headers().get("x-api-key").expect("key header"), "my-key");
        assert_eq!(req.payload(), format!("recvWindow=5000&timestamp=1&signature={expected}"));
        assert!(req.headers().get(USER_AGENT).is_some());
        assert!(req.headers().get(ACCEPT).is_some());
    }

    #[test]
    fn test_api_key_operation_is_not_signed() {
        let creds = ApiCredentials::new("my-key", "secret");
        let req = chain(Some(&creds)).apply(pending(&KEYED, Params::new())).expect("apply");

        assert!(req.headers().get("x-api-key").is_some());
        assert!(!req.is_signed());
        assert_eq!(req.payload(), "");
    }

    #[test]
    fn test_public_request_never_carries_credentials() {
        let creds = ApiCredentials::new("my-key", "secret");
        let req = chain(Some(&creds))
            .apply(pending(&PUBLIC, Params::new().with("symbol", "BTCUSDT")))
            .expect("apply");

        assert!(req.headers().get("x-api-key").is_none());
        assert!(!req.payload().contains("signature="));
    }

    #[test]
    fn test_unauthenticated_chain_adds_only_presentation_headers() {
        let req = chain(None)
            .apply(pending(&SIGNED, Params::new().with("timestamp", 1)))
            .expect("apply");

        assert!(req.headers().get("x-api-key").is_none());
        assert!(!req.is_signed());
        assert_eq!(req.headers().len(), 2);
    }

    #[test]
    fn test_custom_header_name() {
        let config = TransportConfig {
            api_key_header: "X-MBX-APIKEY".to_string(),
            ..TransportConfig::default()
        };
        let creds = ApiCredentials::new("my-key", "secret");
        let req = InterceptorChain::for_credentials(Some(&creds), &config)
            .expect("chain")
            .apply(pending(&KEYED, Params::new()))
            .expect("apply");

        assert_eq!(req.headers().get("x-mbx-apikey").expect("key header"), "my-key");
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let creds = ApiCredentials::new("bad\nkey", "secret");
        let err = InterceptorChain::for_credentials(Some(&creds), &TransportConfig::default())
            .unwrap_err();
        assert!(matches!(err, BinanceApiError::Config(_)));
    }
}
