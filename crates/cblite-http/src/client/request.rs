//! Request descriptor for the shared request pipeline.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Characters left intact when encoding query parameter values, matching
/// what `encodeURIComponent` leaves alone.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Everything needed to issue one request: method, query parameters, body,
/// and the JSON/credentials flags. Constructed per call, discarded after use.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub method: reqwest::Method,
    /// Query parameters, serialized in insertion order.
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Attach a `Content-Type: application/json` header.
    pub json: bool,
    /// Attach the client's configured credentials.
    pub with_credentials: bool,
}

impl RequestOptions {
    pub fn new(method: reqwest::Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(reqwest::Method::GET)
    }

    pub fn put() -> Self {
        Self::new(reqwest::Method::PUT)
    }

    pub fn post() -> Self {
        Self::new(reqwest::Method::POST)
    }

    pub fn delete() -> Self {
        Self::new(reqwest::Method::DELETE)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn with_params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.params.extend(params);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.with_credentials = true;
        self
    }

    /// `key=value` pairs joined by `&`, values percent-encoded. Empty when
    /// there are no parameters.
    pub fn query_string(&self) -> String {
        let mut serialized = String::new();
        for (key, value) in &self.params {
            if !serialized.is_empty() {
                serialized.push('&');
            }
            serialized.push_str(key);
            serialized.push('=');
            serialized.extend(utf8_percent_encode(value, QUERY_VALUE));
        }
        serialized
    }
}
