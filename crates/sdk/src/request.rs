//! Request descriptors and per-call options

use serde_json::Value;
use std::fmt;

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Method of a state-changing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutateMethod {
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl From<MutateMethod> for HttpMethod {
    fn from(method: MutateMethod) -> Self {
        match method {
            MutateMethod::Post => HttpMethod::Post,
            MutateMethod::Put => HttpMethod::Put,
            MutateMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// A single physical request
///
/// Built per call and consumed by [`Client::dispatch`](crate::Client::dispatch).
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Method
    pub method: HttpMethod,
    /// Absolute URL, or a path relative to the configured base URL
    pub url: String,
    /// JSON body; never sent with GET
    pub body: Option<Value>,
    /// Header overrides, applied in order on top of the default headers
    pub headers: Vec<(String, String)>,
    /// Log the request and response
    pub log: bool,
}

impl Request {
    /// Create a request
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: Vec::new(),
            log: true,
        }
    }

    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Set the JSON body
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header override
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add several header overrides
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Enable or disable logging for this request
    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Body to send, taking the method into account
    pub fn effective_body(&self) -> Option<&Value> {
        match self.method {
            HttpMethod::Get => None,
            _ => self.body.as_ref(),
        }
    }

    /// Whether the URL is absolute and bypasses the base URL
    pub fn is_absolute(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

/// Options of a GET request
#[derive(Debug, Clone, PartialEq)]
pub struct GetOptions {
    /// Add a random query parameter to defeat HTTP caches
    pub cache_bust: bool,
    /// API key, sent as `X-API-Key`
    pub api_key: Option<String>,
    /// Header overrides
    pub headers: Vec<(String, String)>,
    /// Log the request and response
    pub log: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            cache_bust: false,
            api_key: None,
            headers: Vec::new(),
            log: true,
        }
    }
}

impl GetOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Defeat HTTP caches for this request
    pub fn cache_bust(mut self, cache_bust: bool) -> Self {
        self.cache_bust = cache_bust;
        self
    }

    /// Authenticate with an API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Add a header override
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Enable or disable logging
    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Headers to send: the API key first, then the overrides
    pub(crate) fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        if let Some(key) = &self.api_key {
            headers.push((crate::API_KEY_HEADER.to_string(), key.clone()));
        }
        headers.extend(self.headers.iter().cloned());
        headers
    }
}

/// Options of a state-changing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpOptions {
    /// JSON body
    pub body: Option<Value>,
    /// Header overrides
    pub headers: Vec<(String, String)>,
    /// Log the request and response
    pub log: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            body: None,
            headers: Vec::new(),
            log: true,
        }
    }
}

impl HttpOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JSON body
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header override
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Enable or disable logging
    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }
}
