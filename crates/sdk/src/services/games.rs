//! Game service
//!
//! Service for browsing games and the categories, levels, variables and
//! records that belong to them.

use crate::client::Client;
use crate::error::SdkResult;
use crate::models::{Category, Data, Game, Leaderboard, Level, Paginated, Variable};
use crate::pagination::CollectOptions;
use crate::query::QueryParams;
use crate::request::GetOptions;
use crate::response::unwrap;

/// Service for game operations
#[derive(Clone)]
pub struct GameService {
    client: Client,
}

impl GameService {
    /// Create a new game service
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get one page of games
    pub async fn list(&self, params: &QueryParams, options: &GetOptions) -> SdkResult<Paginated<Game>> {
        self.client.get("/games", params, options).await
    }

    /// Get every game matching the filters
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use speedrun_sdk::{Client, CollectOptions, QueryParams};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Default::default())?;
    ///
    /// let params = QueryParams::new().with("name", "mario");
    /// let games = client.games().list_all(&params, &CollectOptions::new().max(50)).await?;
    /// for game in &games {
    ///     println!("{} ({})", game.names.international, game.abbreviation);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_all(&self, params: &QueryParams, options: &CollectOptions) -> SdkResult<Vec<Game>> {
        self.client.collect_all("/games", params, options).await
    }

    /// Collect every game matching the filters, mapping each one as it arrives
    pub async fn list_all_mapped<S, F>(
        &self,
        params: &QueryParams,
        options: &CollectOptions,
        map: F,
    ) -> SdkResult<Vec<S>>
    where
        F: FnMut(Game) -> S,
    {
        self.client.collect_all_mapped("/games", params, options, map).await
    }

    /// Get a game by ID or abbreviation
    pub async fn get(&self, game: &str, params: &QueryParams, options: &GetOptions) -> SdkResult<Game> {
        self.client
            .get::<Data<Game>>(&format!("/games/{}", game), params, options)
            .await
            .map(unwrap)
    }

    /// Get every category of a game
    pub async fn categories(
        &self,
        game: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Vec<Category>> {
        self.client
            .get::<Data<Vec<Category>>>(&format!("/games/{}/categories", game), params, options)
            .await
            .map(unwrap)
    }

    /// Get the full-game categories of a game
    pub async fn full_game_categories(
        &self,
        game: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Vec<Category>> {
        let categories = self.categories(game, params, options).await?;
        Ok(categories.into_iter().filter(Category::is_full_game).collect())
    }

    /// Get every level of a game
    pub async fn levels(&self, game: &str, params: &QueryParams, options: &GetOptions) -> SdkResult<Vec<Level>> {
        self.client
            .get::<Data<Vec<Level>>>(&format!("/games/{}/levels", game), params, options)
            .await
            .map(unwrap)
    }

    /// Get every variable of a game
    pub async fn variables(
        &self,
        game: &str,
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Vec<Variable>> {
        self.client
            .get::<Data<Vec<Variable>>>(&format!("/games/{}/variables", game), params, options)
            .await
            .map(unwrap)
    }

    /// Get the record leaderboards of a game, across all pages
    pub async fn records_all(
        &self,
        game: &str,
        params: &QueryParams,
        options: &CollectOptions,
    ) -> SdkResult<Vec<Leaderboard>> {
        self.client
            .collect_all(&format!("/games/{}/records", game), params, options)
            .await
    }

    /// Like [`records_all`](Self::records_all), mapping each leaderboard
    pub async fn records_all_mapped<S, F>(
        &self,
        game: &str,
        params: &QueryParams,
        options: &CollectOptions,
        map: F,
    ) -> SdkResult<Vec<S>>
    where
        F: FnMut(Leaderboard) -> S,
    {
        self.client
            .collect_all_mapped(&format!("/games/{}/records", game), params, options, map)
            .await
    }

    /// Get the games derived from a game (romhacks, category extensions)
    pub async fn derived_games_all(
        &self,
        game: &str,
        params: &QueryParams,
        options: &CollectOptions,
    ) -> SdkResult<Vec<Game>> {
        self.client
            .collect_all(&format!("/games/{}/derived-games", game), params, options)
            .await
    }

    /// Like [`derived_games_all`](Self::derived_games_all), mapping each game
    pub async fn derived_games_all_mapped<S, F>(
        &self,
        game: &str,
        params: &QueryParams,
        options: &CollectOptions,
        map: F,
    ) -> SdkResult<Vec<S>>
    where
        F: FnMut(Game) -> S,
    {
        self.client
            .collect_all_mapped(&format!("/games/{}/derived-games", game), params, options, map)
            .await
    }
}
