//! Testing utilities for the speedrun.com SDK
//!
//! This crate provides:
//! - JSON fixtures for every API resource and envelope
//! - `wiremock` helpers serving paginated endpoints with hit-count checks
//! - Log capture through the test harness
//!
//! # Examples
//!
//! ```
//! use speedrun_testing::fixtures::*;
//!
//! let body = page(items("g", 0..2, game), Some("http://localhost/games/page/2"));
//! assert_eq!(body["data"].as_array().unwrap().len(), 2);
//! ```

pub mod fixtures;
pub mod mocks;
pub mod telemetry;

// Re-export commonly used items
pub use mocks::{mount_once, page_path, PagedEndpoint};
pub use telemetry::init_test_tracing;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
pub use wiremock;
