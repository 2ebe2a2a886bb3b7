//! Category service

use crate::client::Client;
use crate::error::SdkResult;
use crate::models::{Category, Data, Leaderboard, Variable};
use crate::pagination::CollectOptions;
use crate::query::QueryParams;
use crate::request::GetOptions;
use crate::response::unwrap;

/// Service for category operations
#[derive(Clone)]
pub struct CategoryService {
    client: Client,
}

impl CategoryService {
    /// Create a new category service
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a category by ID
    pub async fn get(&self, category: &str, params: &QueryParams, options: &GetOptions) -> SdkResult<Category> {
        self.client
            .get::<Data<Category>>(&format!("/categories/{}", category), params, options)
            .await
            .map(unwrap)
    }

    /// Get the variables applicable to a category
    pub async fn variables(
        &self,
        category: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Vec<Variable>> {
        self.client
            .get::<Data<Vec<Variable>>>(&format!("/categories/{}/variables", category), params, options)
            .await
            .map(unwrap)
    }

    /// Get the record leaderboards of a category, across all pages
    pub async fn records_all(
        &self,
        category: &str,
        params: &QueryParams,
        options: &CollectOptions,
    ) -> SdkResult<Vec<Leaderboard>> {
        self.client
            .collect_all(&format!("/categories/{}/records", category), params, options)
            .await
    }

    /// Like [`records_all`](Self::records_all), mapping each leaderboard
    pub async fn records_all_mapped<S, F>(
        &self,
        category: &str,
        params: &QueryParams,
        options: &CollectOptions,
        map: F,
    ) -> SdkResult<Vec<S>>
    where
        F: FnMut(Leaderboard) -> S,
    {
        self.client
            .collect_all_mapped(&format!("/categories/{}/records", category), params, options, map)
            .await
    }
}
