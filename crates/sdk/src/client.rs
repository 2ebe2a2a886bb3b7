//! SDK client implementation
//!
//! This module provides the main client and its rate-limited transport. Every
//! physical request, including pagination follow-ups, goes through
//! [`Client::dispatch`] and therefore through the client's [`RateLimiter`].

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use crate::models::V2Response;
use crate::query::{build_query_with_cache, QueryParams};
use crate::rate_limit::RateLimiter;
use crate::request::{GetOptions, HttpOptions, MutateMethod, Request};
use crate::response::ApiResponse;
use crate::services::{
    CategoryService, GameService, LeaderboardService, LevelService, RunService, UserService,
    V2Service,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, HOST, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

/// Main SDK client
///
/// Cloning is cheap; clones share the HTTP connection pool and the limiter.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    limiter: Arc<RateLimiter>,
}

impl Client {
    /// Create a new client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new client with the given configuration
    ///
    /// The client throttles through the process-wide [`RateLimiter::shared`].
    pub fn new(config: ClientConfig) -> SdkResult<Self> {
        Self::with_limiter(config, RateLimiter::shared())
    }

    /// Create a new client that throttles through the given limiter
    pub fn with_limiter(config: ClientConfig, limiter: Arc<RateLimiter>) -> SdkResult<Self> {
        config.validate()?;
        limiter.config().validate()?;

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| SdkError::config(format!("Invalid user agent: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SdkError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                limiter,
            }),
        })
    }

    /// Create a client from environment variables
    pub fn from_env() -> SdkResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the limiter every request of this client goes through
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.inner.limiter
    }

    /// Get the game service
    pub fn games(&self) -> GameService {
        GameService::new(self.clone())
    }

    /// Get the category service
    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.clone())
    }

    /// Get the level service
    pub fn levels(&self) -> LevelService {
        LevelService::new(self.clone())
    }

    /// Get the leaderboard service
    pub fn leaderboards(&self) -> LeaderboardService {
        LeaderboardService::new(self.clone())
    }

    /// Get the run service
    pub fn runs(&self) -> RunService {
        RunService::new(self.clone())
    }

    /// Get the user service
    pub fn users(&self) -> UserService {
        UserService::new(self.clone())
    }

    /// Get the service for the secondary (v2) API
    pub fn v2(&self) -> V2Service {
        V2Service::new(self.clone())
    }

    /// GET `path` with query parameters
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<T> {
        let url = build_query_with_cache(path, params, options.cache_bust);
        let request = Request::get(url)
            .headers(options.request_headers())
            .log(options.log);

        self.dispatch(request).await
    }

    /// POST, PUT or DELETE `path`, authenticated with an API key
    ///
    /// The key is sent as `X-API-Key`; headers in `options` are applied after
    /// it and may override it.
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        path: &str,
        method: MutateMethod,
        api_key: &str,
        options: HttpOptions,
    ) -> SdkResult<T> {
        let mut request = Request::new(method.into(), path)
            .header(crate::API_KEY_HEADER, api_key)
            .headers(options.headers)
            .log(options.log);
        request.body = options.body;

        self.dispatch(request).await
    }

    /// POST, PUT or DELETE against the secondary API, authenticated with a
    /// session cookie
    pub async fn mutate_v2<T: DeserializeOwned>(
        &self,
        path: &str,
        method: MutateMethod,
        session_id: &str,
        options: HttpOptions,
    ) -> SdkResult<V2Response<T>> {
        let url = format!("{}{}", self.inner.config.v2_base_url, path);
        let mut request = Request::new(method.into(), url)
            .header(COOKIE.as_str(), format!("PHPSESSID={}", session_id))
            .headers(options.headers)
            .log(options.log);
        request.body = options.body;

        self.dispatch(request).await
    }

    /// Execute one request through the limiter.
    ///
    /// The body is parsed as JSON whatever the HTTP status; an error payload
    /// is returned as [`SdkError::Service`], anything else must match `T`.
    pub async fn dispatch<T: DeserializeOwned>(&self, request: Request) -> SdkResult<T> {
        let url = self.resolve(&request)?;
        let headers = compose_headers(&url, &request.headers)?;
        let log = request.log && self.inner.config.log_requests;

        let mut builder = self
            .inner
            .http
            .request(request.method.into(), url.clone())
            .headers(headers);

        if let Some(body) = request.effective_body() {
            builder = builder.json(body);
        }

        if log {
            debug!(method = %request.method, url = %url, "Sending request");
        }

        let (status_code, text) = self
            .inner
            .limiter
            .schedule(|| async move {
                let response = builder.send().await?;
                let status_code = response.status().as_u16();
                let text = response.text().await?;
                Ok::<_, SdkError>((status_code, text))
            })
            .await?;

        if log {
            debug!(method = %request.method, url = %url, status = status_code, "Received response");
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            error!(url = %url, status = status_code, "Response is not JSON: {}", e);
            SdkError::InvalidResponse {
                status_code,
                message: format!("Response is not valid JSON: {}", e),
                source: Some(e),
            }
        })?;

        match ApiResponse::<T>::from_json(value) {
            Ok(ApiResponse::Success(data)) => Ok(data),
            Ok(ApiResponse::Error(payload)) => {
                debug!(
                    url = %url,
                    status = payload.status,
                    message = %payload.message,
                    "Service returned an error"
                );
                Err(payload.into())
            }
            Err(e) => {
                error!(url = %url, status = status_code, "Failed to parse response: {}", e);
                Err(SdkError::InvalidResponse {
                    status_code,
                    message: format!("Failed to parse response: {}", e),
                    source: Some(e),
                })
            }
        }
    }

    fn resolve(&self, request: &Request) -> SdkResult<Url> {
        let raw = if request.is_absolute() {
            request.url.clone()
        } else {
            format!("{}{}", self.inner.config.base_url, request.url)
        };

        Url::parse(&raw).map_err(|e| SdkError::InvalidRequest {
            message: format!("Invalid URL '{}': {}", raw, e),
        })
    }
}

/// `Host` of the target followed by the request's overrides; later entries
/// replace earlier ones with the same name.
fn compose_headers(url: &Url, overrides: &[(String, String)]) -> SdkResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let Some(host) = url.host_str() {
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        headers.insert(HOST, header_value(&host)?);
    }

    for (name, value) in overrides {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| SdkError::InvalidRequest {
            message: format!("Invalid header name: {}", name),
        })?;
        headers.insert(name, header_value(value)?);
    }

    Ok(headers)
}

fn header_value(value: &str) -> SdkResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| SdkError::InvalidRequest {
        message: "Invalid header value".to_string(),
    })
}

/// Client builder for ergonomic configuration
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    limiter: Option<Arc<RateLimiter>>,
}

impl ClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment
    pub fn from_env(mut self) -> SdkResult<Self> {
        self.config = ClientConfig::from_env()?;
        Ok(self)
    }

    /// Set the v1 base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the v2 base URL
    pub fn v2_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.v2_base_url = url.into();
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Enable or disable request logging
    pub fn log_requests(mut self, log: bool) -> Self {
        self.config.log_requests = log;
        self
    }

    /// Throttle through an existing limiter instead of the shared one
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Build the client
    pub fn build(self) -> SdkResult<Client> {
        match self.limiter {
            Some(limiter) => Client::with_limiter(self.config, limiter),
            None => Client::new(self.config),
        }
    }
}
