//! Level service

use crate::client::Client;
use crate::error::SdkResult;
use crate::models::{Category, Data, Leaderboard, Level, Variable};
use crate::pagination::CollectOptions;
use crate::query::QueryParams;
use crate::request::GetOptions;
use crate::response::unwrap;

/// Service for individual level operations
#[derive(Clone)]
pub struct LevelService {
    client: Client,
}

impl LevelService {
    /// Create a new level service
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a level by ID
    pub async fn get(&self, level: &str, params: &QueryParams, options: &GetOptions) -> SdkResult<Level> {
        self.client
            .get::<Data<Level>>(&format!("/levels/{}", level), params, options)
            .await
            .map(unwrap)
    }

    /// Get the per-level categories applicable to a level
    pub async fn categories(
        &self,
        level: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Vec<Category>> {
        self.client
            .get::<Data<Vec<Category>>>(&format!("/levels/{}/categories", level), params, options)
            .await
            .map(unwrap)
    }

    /// Get the variables applicable to a level
    pub async fn variables(
        &self,
        level: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Vec<Variable>> {
        self.client
            .get::<Data<Vec<Variable>>>(&format!("/levels/{}/variables", level), params, options)
            .await
            .map(unwrap)
    }

    /// Get the record leaderboards of a level, across all pages
    pub async fn records_all(
        &self,
        level: &str,
        params: &QueryParams,
        options: &CollectOptions,
    ) -> SdkResult<Vec<Leaderboard>> {
        self.client
            .collect_all(&format!("/levels/{}/records", level), params, options)
            .await
    }

    /// Like [`records_all`](Self::records_all), mapping each leaderboard
    pub async fn records_all_mapped<S, F>(
        &self,
        level: &str,
        params: &QueryParams,
        options: &CollectOptions,
        map: F,
    ) -> SdkResult<Vec<S>>
    where
        F: FnMut(Leaderboard) -> S,
    {
        self.client
            .collect_all_mapped(&format!("/levels/{}/records", level), params, options, map)
            .await
    }
}
