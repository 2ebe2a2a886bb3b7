//! User service

use crate::client::Client;
use crate::error::SdkResult;
use crate::models::{Data, RankedRun, User};
use crate::pagination::CollectOptions;
use crate::query::QueryParams;
use crate::request::GetOptions;
use crate::response::unwrap;

/// Service for user operations
#[derive(Clone)]
pub struct UserService {
    client: Client,
}

impl UserService {
    /// Create a new user service
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get every user matching the filters
    pub async fn list_all(&self, params: &QueryParams, options: &CollectOptions) -> SdkResult<Vec<User>> {
        self.client.collect_all("/users", params, options).await
    }

    /// Collect users across all pages, mapping each one as it arrives
    pub async fn list_all_mapped<S, F>(
        &self,
        params: &QueryParams,
        options: &CollectOptions,
        map: F,
    ) -> SdkResult<Vec<S>>
    where
        F: FnMut(User) -> S,
    {
        self.client.collect_all_mapped("/users", params, options, map).await
    }

    /// Get a user by ID or name
    pub async fn get(&self, user: &str, options: &GetOptions) -> SdkResult<User> {
        self.client
            .get::<Data<User>>(&format!("/users/{}", user), &QueryParams::new(), options)
            .await
            .map(unwrap)
    }

    /// Get the personal bests of a user
    pub async fn personal_bests(
        &self,
        user: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Vec<RankedRun>> {
        self.client
            .get::<Data<Vec<RankedRun>>>(&format!("/users/{}/personal-bests", user), params, options)
            .await
            .map(unwrap)
    }
}
