/*
[INPUT]:  Static endpoint metadata (method, path, base URL, security, parameters)
[OUTPUT]: Operation descriptors consumed by the bound service
[POS]:    HTTP layer - operation schema
[UPDATE]: When the descriptor schema changes (not when adding endpoints)
*/

use std::fmt;

use reqwest::Method;

/// HTTP verb of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_method(&self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// Which host serves an operation.
///
/// Asset-info endpoints live on a different host than the rest of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrl {
    Api,
    AssetInfo,
}

/// Authentication an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// Public endpoint.
    None,
    /// API-key header only.
    ApiKey,
    /// API-key header plus a trailing `signature` parameter.
    Signed,
}

impl Security {
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Security::None)
    }
}

/// Where encoded parameters travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamEncoding {
    /// URL query string.
    Query,
    /// `application/x-www-form-urlencoded` request body.
    Form,
}

/// Static description of one exchange operation.
///
/// `params` lists every accepted parameter in wire order; requests are
/// always serialized in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub base: BaseUrl,
    pub security: Security,
    pub encoding: ParamEncoding,
    pub params: &'static [&'static str],
}

impl Operation {
    pub const fn get(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            path,
            base: BaseUrl::Api,
            security: Security::None,
            encoding: ParamEncoding::Query,
            params: &[],
        }
    }

    pub const fn post(name: &'static str, path: &'static str) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(name, path)
        }
    }

    pub const fn put(name: &'static str, path: &'static str) -> Self {
        Self {
            method: HttpMethod::Put,
            ..Self::get(name, path)
        }
    }

    pub const fn delete(name: &'static str, path: &'static str) -> Self {
        Self {
            method: HttpMethod::Delete,
            ..Self::get(name, path)
        }
    }

    pub const fn params(self, params: &'static [&'static str]) -> Self {
        Self { params, ..self }
    }

    pub const fn security(self, security: Security) -> Self {
        Self { security, ..self }
    }

    pub const fn encoding(self, encoding: ParamEncoding) -> Self {
        Self { encoding, ..self }
    }

    pub const fn base(self, base: BaseUrl) -> Self {
        Self { base, ..self }
    }

    /// Position of `key` in the declared parameter list.
    pub fn param_index(&self, key: &str) -> Option<usize> {
        self.params.iter().position(|p| *p == key)
    }
}
