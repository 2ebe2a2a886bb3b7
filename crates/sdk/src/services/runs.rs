//! Run service
//!
//! Service for listing runs and for submitting and moderating them. Mutations
//! are authenticated with the caller's API key.

use crate::client::Client;
use crate::error::{SdkError, SdkResult};
use crate::models::{Data, ErrorPayload, NewRun, PlayerRef, Run, StatusUpdate};
use crate::pagination::CollectOptions;
use crate::query::QueryParams;
use crate::request::{GetOptions, HttpOptions, MutateMethod};
use crate::response::unwrap;
use serde_json::json;
use tracing::warn;

/// Outcome of a run deletion
#[derive(Debug, Clone)]
pub enum DeletedRun {
    /// The run was deleted; this is its last state
    Deleted(Run),
    /// The service answered with a status 500 error although the deletion
    /// may have gone through
    Erroneous(ErrorPayload),
}

impl DeletedRun {
    /// The deleted run, if the service returned it
    pub fn run(&self) -> Option<&Run> {
        match self {
            DeletedRun::Deleted(run) => Some(run),
            DeletedRun::Erroneous(_) => None,
        }
    }
}

/// Service for run operations
#[derive(Clone)]
pub struct RunService {
    client: Client,
}

impl RunService {
    /// Create a new run service
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get every run matching the filters
    pub async fn list_all(&self, params: &QueryParams, options: &CollectOptions) -> SdkResult<Vec<Run>> {
        self.client.collect_all("/runs", params, options).await
    }

    /// Collect runs across all pages, mapping each one as it arrives
    pub async fn list_all_mapped<S, F>(
        &self,
        params: &QueryParams,
        options: &CollectOptions,
        map: F,
    ) -> SdkResult<Vec<S>>
    where
        F: FnMut(Run) -> S,
    {
        self.client.collect_all_mapped("/runs", params, options, map).await
    }

    /// Get a run by ID
    pub async fn get(&self, id: &str, params: &QueryParams, options: &GetOptions) -> SdkResult<Run> {
        self.client
            .get::<Data<Run>>(&format!("/runs/{}", id), params, options)
            .await
            .map(unwrap)
    }

    /// Submit a new run
    ///
    /// A rejected submission fails with a service error whose `errors` list
    /// names every problem found.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use speedrun_sdk::{Client, HttpOptions, NewRun, NewRunTimes};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Default::default())?;
    ///
    /// let run = NewRun {
    ///     category: "wkpoo02r".to_string(),
    ///     times: NewRunTimes { realtime: Some(1234.5), ..Default::default() },
    ///     ..Default::default()
    /// };
    /// let created = client.runs().submit(&run, "api-key", HttpOptions::new()).await?;
    /// println!("Submitted run {}", created.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(&self, run: &NewRun, api_key: &str, options: HttpOptions) -> SdkResult<Run> {
        let body = json!({ "run": serde_json::to_value(run)? });
        self.client
            .mutate::<Data<Run>>("/runs", MutateMethod::Post, api_key, with_body(options, body))
            .await
            .map(unwrap)
    }

    /// Verify or reject a run
    pub async fn set_status(
        &self,
        id: &str,
        status: &StatusUpdate,
        api_key: &str,
        options: HttpOptions,
    ) -> SdkResult<Run> {
        let body = json!({ "status": serde_json::to_value(status)? });
        self.client
            .mutate::<Data<Run>>(
                &format!("/runs/{}/status", id),
                MutateMethod::Put,
                api_key,
                with_body(options, body),
            )
            .await
            .map(unwrap)
    }

    /// Replace the players of a run
    pub async fn set_players(
        &self,
        id: &str,
        players: &[PlayerRef],
        api_key: &str,
        options: HttpOptions,
    ) -> SdkResult<Run> {
        let body = json!({ "players": serde_json::to_value(players)? });
        self.client
            .mutate::<Data<Run>>(
                &format!("/runs/{}/players", id),
                MutateMethod::Put,
                api_key,
                with_body(options, body),
            )
            .await
            .map(unwrap)
    }

    /// Delete a run
    ///
    /// The service is known to answer some successful deletions with a status
    /// 500 error. With `ignore_500` set such an answer is returned as
    /// [`DeletedRun::Erroneous`] instead of failing.
    pub async fn delete(
        &self,
        id: &str,
        api_key: &str,
        options: HttpOptions,
        ignore_500: bool,
    ) -> SdkResult<DeletedRun> {
        let result = self
            .client
            .mutate::<Data<Run>>(&format!("/runs/{}", id), MutateMethod::Delete, api_key, options)
            .await;

        match result {
            Ok(envelope) => Ok(DeletedRun::Deleted(unwrap(envelope))),
            Err(SdkError::Service(err)) if ignore_500 && err.status() == 500 => {
                warn!(run_id = id, "Run deletion answered with status 500, ignoring");
                Ok(DeletedRun::Erroneous(err.into_payload()))
            }
            Err(err) => Err(err),
        }
    }
}

/// The body is set by the service; a body in `options` is replaced.
fn with_body(options: HttpOptions, body: serde_json::Value) -> HttpOptions {
    HttpOptions {
        body: Some(body),
        ..options
    }
}

/// Keep the runs whose variable values match every `(variable, value)` pair
pub fn filter_runs<I>(runs: I, variables: &[(&str, &str)]) -> Vec<Run>
where
    I: IntoIterator<Item = Run>,
{
    runs.into_iter()
        .filter(|run| {
            variables
                .iter()
                .all(|(variable, value)| run.values.get(*variable).map(String::as_str) == Some(*value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(id: &str, values: &[(&str, &str)]) -> Run {
        serde_json::from_value(json!({
            "id": id,
            "game": "o1y9wo6q",
            "category": "wkpoo02r",
            "status": { "status": "verified" },
            "times": { "primary": "PT20M", "primary_t": 1200.0 },
            "values": values.iter().map(|(k, v)| (k.to_string(), json!(v))).collect::<serde_json::Map<_, _>>(),
        }))
        .unwrap()
    }

    #[test]
    fn test_filter_runs() {
        let runs = vec![
            run("a", &[("platform", "pc"), ("glitches", "yes")]),
            run("b", &[("platform", "pc"), ("glitches", "no")]),
            run("c", &[("platform", "n64")]),
        ];

        let ids = |runs: Vec<Run>| runs.into_iter().map(|r| r.id).collect::<Vec<_>>();

        assert_eq!(ids(filter_runs(runs.clone(), &[])), vec!["a", "b", "c"]);
        assert_eq!(ids(filter_runs(runs.clone(), &[("platform", "pc")])), vec!["a", "b"]);
        assert_eq!(
            ids(filter_runs(runs.clone(), &[("platform", "pc"), ("glitches", "no")])),
            vec!["b"]
        );
        assert!(filter_runs(runs, &[("region", "eu")]).is_empty());
    }

    #[test]
    fn test_with_body_replaces_caller_body() {
        let options = HttpOptions::new().body(json!({ "x": 1 })).header("X-Test", "1");
        let options = with_body(options, json!({ "run": {} }));
        assert_eq!(options.body, Some(json!({ "run": {} })));
        assert_eq!(options.headers.len(), 1);
    }
}
