//! Leaderboard service
//!
//! Service for fetching full-game and individual-level leaderboards, filtered
//! by variable values.

use crate::client::Client;
use crate::error::SdkResult;
use crate::models::{Data, Leaderboard};
use crate::query::QueryParams;
use crate::request::GetOptions;
use crate::response::unwrap;

/// Service for leaderboard operations
#[derive(Clone)]
pub struct LeaderboardService {
    client: Client,
}

impl LeaderboardService {
    /// Create a new leaderboard service
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get the full-game leaderboard of a category
    ///
    /// `variables` pairs a variable ID with a value ID; each becomes a
    /// `var-<id>` filter. Keys in `params` take precedence.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use speedrun_sdk::{Client, GetOptions, QueryParams};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Default::default())?;
    ///
    /// let board = client
    ///     .leaderboards()
    ///     .full_game("sms", "Any", &[("yn17w4nw", "klrwdvzl")], &QueryParams::new().with("top", 10), &GetOptions::new())
    ///     .await?;
    /// for ranked in &board.runs {
    ///     println!("#{} {}", ranked.place, ranked.run.times.primary);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn full_game(
        &self,
        game: &str,
        category: &str,
        variables: &[(&str, &str)],
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Leaderboard> {
        let query = with_variables(variables, params);
        self.client
            .get::<Data<Leaderboard>>(
                &format!("/leaderboards/{}/category/{}", game, category),
                &query,
                options,
            )
            .await
            .map(unwrap)
    }

    /// Get the leaderboard of a category on one level
    pub async fn level(
        &self,
        game: &str,
        level: &str,
        category: &str,
        variables: &[(&str, &str)],
        params: &QueryParams,
        options: &GetOptions,
    ) -> SdkResult<Leaderboard> {
        let query = with_variables(variables, params);
        self.client
            .get::<Data<Leaderboard>>(
                &format!("/leaderboards/{}/level/{}/{}", game, level, category),
                &query,
                options,
            )
            .await
            .map(unwrap)
    }
}

fn with_variables(variables: &[(&str, &str)], params: &QueryParams) -> QueryParams {
    let mut query = variables
        .iter()
        .fold(QueryParams::new(), |query, (variable, value)| query.variable(variable, *value));

    for (key, value) in params.iter() {
        query.insert(key, value.clone());
    }

    query
}

/// Human-readable leaderboard name, e.g. `Game: Level - Category (v1, v2)`
pub fn build_leaderboard_name(
    game: &str,
    category: &str,
    variables: &[&str],
    level: Option<&str>,
) -> String {
    let mut name = game.to_string();

    if let Some(level) = level.filter(|l| !l.is_empty()) {
        name.push_str(": ");
        name.push_str(level);
    }

    name.push_str(" - ");
    name.push_str(category);

    if !variables.is_empty() {
        name.push_str(&format!(" ({})", variables.join(", ")));
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_leaderboard_name() {
        assert_eq!(build_leaderboard_name("Celeste", "Any%", &[], None), "Celeste - Any%");
        assert_eq!(
            build_leaderboard_name("Celeste", "Any%", &["PC", "Glitchless"], Some("Forsaken City")),
            "Celeste: Forsaken City - Any% (PC, Glitchless)"
        );
        assert_eq!(
            build_leaderboard_name("Celeste", "Any%", &["PC"], Some("")),
            "Celeste - Any% (PC)"
        );
    }

    #[test]
    fn test_variables_become_filters() {
        let params = QueryParams::new().with("top", 3).with("var-abc", "override");
        let query = with_variables(&[("abc", "v1"), ("def", "v2")], &params);
        assert_eq!(query.to_query_string(), "var-abc=override&var-def=v2&top=3");
    }
}
