//! # speedrun.com SDK
//!
//! Typed Rust client for the speedrun.com REST API.
//!
//! The SDK builds URLs for the documented endpoints, throttles every request
//! through a shared rate limiter, unwraps `{ "data": ... }` envelopes and
//! follows pagination links to return complete collections:
//!
//! - **Games**: games, their categories, levels, variables and records
//! - **Leaderboards**: full-game and individual-level rankings
//! - **Runs**: listing, submission and moderation
//! - **Users**: profiles and personal bests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use speedrun_sdk::{Client, CollectOptions, QueryParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder().build()?;
//!
//!     let params = QueryParams::new().with("name", "celeste");
//!     let games = client.games().list_all(&params, &CollectOptions::new().max(20)).await?;
//!     for game in games {
//!         println!("{}: {}", game.abbreviation, game.names.international);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! The SDK can be configured through environment variables:
//!
//! - `SPEEDRUN_API_URL`: v1 API endpoint URL
//! - `SPEEDRUN_API_V2_URL`: v2 API endpoint URL
//! - `SPEEDRUN_USER_AGENT`: User agent sent with every request
//! - `SPEEDRUN_LOG_REQUESTS`: Set to `false` to silence request logging
//!
//! Or programmatically:
//!
//! ```rust,no_run
//! use speedrun_sdk::{Client, RateLimitConfig, RateLimiter};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! // Clients share one process-wide limiter unless another one is injected.
//! let limiter = Arc::new(RateLimiter::new(
//!     RateLimitConfig::new().with_min_time(Duration::from_millis(500)),
//! ));
//! let client = Client::builder()
//!     .user_agent("my-leaderboard-bot/1.0")
//!     .rate_limiter(limiter)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, SdkError>`. Errors reported by the API
//! keep their payload:
//!
//! ```rust,no_run
//! use speedrun_sdk::{Client, GetOptions, QueryParams, SdkError};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = Client::builder().build()?;
//! match client.games().get("nope", &QueryParams::new(), &GetOptions::new()).await {
//!     Ok(game) => println!("Found: {}", game.names.international),
//!     Err(SdkError::Service(err)) if err.status() == 404 => println!("Game not found"),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod query;
pub mod rate_limit;
pub mod request;
pub mod response;
pub mod services;

// Re-exports
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{SdkError, SdkResult, ServiceError};
pub use models::*;
pub use pagination::CollectOptions;
pub use query::{build_query, build_query_with_cache, QueryParams, QueryValue};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use request::{GetOptions, HttpMethod, HttpOptions, MutateMethod, Request};
pub use response::{is_error_payload, ApiResponse};
pub use services::{build_leaderboard_name, filter_runs, DeletedRun};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{Client, ClientBuilder};
    pub use crate::config::ClientConfig;
    pub use crate::error::{SdkError, SdkResult, ServiceError};
    pub use crate::models::*;
    pub use crate::pagination::CollectOptions;
    pub use crate::query::QueryParams;
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::request::{GetOptions, HttpOptions};
    pub use crate::services::*;
}

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default v1 API URL
pub const DEFAULT_API_URL: &str = "https://www.speedrun.com/api/v1";

/// Default v2 API URL
pub const DEFAULT_API_V2_URL: &str = "https://www.speedrun.com/api/v2";

/// Header carrying the API key of authenticated requests
pub const API_KEY_HEADER: &str = "X-API-Key";
