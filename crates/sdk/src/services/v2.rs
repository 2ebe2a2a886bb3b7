//! Secondary (v2) API service
//!
//! Moderation endpoints of the v2 API. They are authenticated with the
//! `PHPSESSID` session cookie of a logged-in user rather than an API key.

use crate::client::Client;
use crate::error::SdkResult;
use crate::models::{Acknowledged, PutRunAssignee, PutRunVerification, V2Response};
use crate::request::{HttpOptions, MutateMethod};
use serde_json::{Map, Value};

/// Service for v2 operations
#[derive(Clone)]
pub struct V2Service {
    client: Client,
}

impl V2Service {
    /// Create a new v2 service
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Set the verification state of a run
    pub async fn put_run_verification(
        &self,
        request: &PutRunVerification,
        session_id: &str,
        options: HttpOptions,
    ) -> SdkResult<V2Response<Acknowledged>> {
        let options = HttpOptions {
            body: Some(serde_json::to_value(request)?),
            ..options
        };

        self.client
            .mutate_v2("/PutRunVerification", MutateMethod::Post, session_id, options)
            .await
    }

    /// Assign a verifier to a run
    ///
    /// A successful assignment is answered with an empty object.
    pub async fn put_run_assignee(
        &self,
        request: &PutRunAssignee,
        session_id: &str,
        options: HttpOptions,
    ) -> SdkResult<V2Response<Map<String, Value>>> {
        let options = HttpOptions {
            body: Some(serde_json::to_value(request)?),
            ..options
        };

        self.client
            .mutate_v2("/PutRunAssignee", MutateMethod::Post, session_id, options)
            .await
    }
}
