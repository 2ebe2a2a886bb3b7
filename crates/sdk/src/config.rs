//! SDK configuration
//!
//! This module provides configuration options for the SDK client.

use crate::error::{SdkError, SdkResult};
use reqwest::header::HeaderValue;

/// Client configuration
///
/// Throttling is not configured here: every client goes through
/// [`RateLimiter::shared`](crate::RateLimiter::shared) unless a limiter is
/// injected with [`ClientBuilder::rate_limiter`](crate::ClientBuilder::rate_limiter).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the v1 API
    pub base_url: String,

    /// Base URL of the secondary (v2) API
    pub v2_base_url: String,

    /// User agent string
    pub user_agent: String,

    /// Log every request and response at debug level
    pub log_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::DEFAULT_API_URL.to_string(),
            v2_base_url: crate::DEFAULT_API_V2_URL.to_string(),
            user_agent: format!("speedrun-sdk/{}", crate::VERSION),
            log_requests: true,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - `SPEEDRUN_API_URL`: Base URL of the v1 API
    /// - `SPEEDRUN_API_V2_URL`: Base URL of the v2 API
    /// - `SPEEDRUN_USER_AGENT`: User agent string
    /// - `SPEEDRUN_LOG_REQUESTS`: `0` or `false` disables request logging
    ///
    /// API keys are passed per call and never read from the environment.
    pub fn from_env() -> SdkResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SPEEDRUN_API_URL") {
            config.base_url = url;
        }

        if let Ok(url) = std::env::var("SPEEDRUN_API_V2_URL") {
            config.v2_base_url = url;
        }

        if let Ok(agent) = std::env::var("SPEEDRUN_USER_AGENT") {
            config.user_agent = agent;
        }

        if let Ok(flag) = std::env::var("SPEEDRUN_LOG_REQUESTS") {
            config.log_requests = parse_flag(&flag)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the v1 base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the v2 base URL
    pub fn with_v2_base_url(mut self, url: impl Into<String>) -> Self {
        self.v2_base_url = url.into();
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Enable or disable request logging
    pub fn with_log_requests(mut self, log: bool) -> Self {
        self.log_requests = log;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        for (name, value) in [("Base URL", &self.base_url), ("V2 base URL", &self.v2_base_url)] {
            if value.is_empty() {
                return Err(SdkError::config(format!("{} cannot be empty", name)));
            }

            url::Url::parse(value)
                .map_err(|e| SdkError::config(format!("Invalid {}: {}", name.to_lowercase(), e)))?;
        }

        if HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(SdkError::config("User agent is not a valid header value"));
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> SdkResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SdkError::config(format!("Invalid boolean value: {}", other))),
    }
}
