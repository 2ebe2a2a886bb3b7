//! SDK data models
//!
//! This module provides the envelopes the API wraps every answer in, the error
//! payload it returns on failure, and the resource types used by the services.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// ============================================================================
// Envelopes
// ============================================================================

/// Relation-tagged link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelLink {
    /// Relation name, e.g. `next`, `support`
    pub rel: String,
    /// Target URI
    pub uri: String,
}

impl RelLink {
    /// Create a new link
    pub fn new(rel: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            uri: uri.into(),
        }
    }
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    /// Offset used in the response
    #[serde(default)]
    pub offset: u64,
    /// Page size requested
    #[serde(default)]
    pub max: u64,
    /// Number of elements actually returned
    #[serde(default)]
    pub size: u64,
    /// Links to the previous and next pages
    #[serde(default)]
    pub links: Vec<RelLink>,
}

impl Pagination {
    /// URI of the next page, if any
    pub fn next_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "next")
            .map(|link| link.uri.as_str())
    }
}

/// Paginated envelope: one page of items plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items in this page
    pub data: Vec<T>,
    /// Pagination information
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// URI of the next page, if any
    pub fn next_link(&self) -> Option<&str> {
        self.pagination.next_link()
    }

    /// Check if the page is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Single-resource envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data<T> {
    /// Wrapped value
    pub data: T,
}

impl<T> Data<T> {
    /// Strip the envelope
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Error payload returned by the API in place of a success payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    /// Status reported by the service
    pub status: u16,
    /// Human-readable message
    pub message: String,
    /// Support and issue-report links
    pub links: Vec<RelLink>,
    /// Validation problems, only present for rejected run submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorPayload {
    /// Parse a JSON value as an error payload.
    ///
    /// Returns `None` unless the value is an object with a numeric `status`,
    /// a string `message` and an array `links`. Extra fields are allowed.
    /// Malformed link entries are skipped rather than rejected, so any value
    /// that looks like an error is always turned into one.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let status = obj.get("status")?;
        let message = obj.get("message")?.as_str()?;
        let links = obj.get("links")?.as_array()?;

        let status = match status.as_u64() {
            Some(n) => u16::try_from(n).unwrap_or(u16::MAX),
            None => status.as_f64()? as u16,
        };

        let links = links
            .iter()
            .filter_map(|link| serde_json::from_value::<RelLink>(link.clone()).ok())
            .collect();

        let errors = obj.get("errors").and_then(Value::as_array).map(|errors| {
            errors
                .iter()
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        });

        Some(Self {
            status,
            message: message.to_string(),
            links,
            errors,
        })
    }
}

// ============================================================================
// Shared resource pieces
// ============================================================================

/// Localized names of a game or user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Names {
    /// International name
    pub international: String,
    /// Japanese name
    #[serde(default)]
    pub japanese: Option<String>,
    /// Twitch directory name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitch: Option<String>,
}

/// A reference to another resource: a bare ID, or the resource itself when embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    /// Resource ID
    Id(String),
    /// Embedded resource (`?embed=...`)
    Embedded(Data<Value>),
}

impl Reference {
    /// ID of the referenced resource, if it can be determined
    pub fn id(&self) -> Option<&str> {
        match self {
            Reference::Id(id) => Some(id),
            Reference::Embedded(data) => data.data.get("id").and_then(Value::as_str),
        }
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier
    pub id: String,
    /// Names
    pub names: Names,
    /// Abbreviation used in URLs
    pub abbreviation: String,
    /// Link to the game page
    pub weblink: String,
    /// Release year
    #[serde(default)]
    pub released: Option<i32>,
    /// Related links
    #[serde(default)]
    pub links: Vec<RelLink>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether a category applies to full-game runs or individual levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryType {
    /// Full-game category
    PerGame,
    /// Individual-level category
    PerLevel,
}

/// Category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Link to the category page
    pub weblink: String,
    /// Category type
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Rules text
    #[serde(default)]
    pub rules: Option<String>,
    /// Whether this is a miscellaneous category
    #[serde(default)]
    pub miscellaneous: bool,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// Whether this is a full-game category
    pub fn is_full_game(&self) -> bool {
        self.category_type == CategoryType::PerGame
    }

    /// Whether this is an individual-level category
    pub fn is_per_level(&self) -> bool {
        self.category_type == CategoryType::PerLevel
    }
}

/// Individual level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Link to the level page
    pub weblink: String,
    /// Rules text
    #[serde(default)]
    pub rules: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Custom variable of a game or category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category the variable is restricted to
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the variable must be set on submission
    #[serde(default)]
    pub mandatory: bool,
    /// Whether users may enter arbitrary values
    #[serde(default, rename = "user-defined")]
    pub user_defined: bool,
    /// Whether the variable splits the leaderboard
    #[serde(default, rename = "is-subcategory")]
    pub is_subcategory: bool,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Verification state of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    /// `new`, `verified` or `rejected`
    pub status: String,
    /// Examiner user ID
    #[serde(default)]
    pub examiner: Option<String>,
    /// Verification date
    #[serde(default, rename = "verify-date")]
    pub verify_date: Option<String>,
    /// Rejection reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// Timing information of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTimes {
    /// Primary time as ISO 8601 duration
    pub primary: String,
    /// Primary time in seconds
    pub primary_t: f64,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier
    pub id: String,
    /// Link to the run page
    #[serde(default)]
    pub weblink: Option<String>,
    /// Game the run belongs to
    pub game: Reference,
    /// Level, for individual-level runs
    #[serde(default)]
    pub level: Option<Reference>,
    /// Category
    pub category: Reference,
    /// Runner comment
    #[serde(default)]
    pub comment: Option<String>,
    /// Verification state
    pub status: RunStatus,
    /// Times
    pub times: RunTimes,
    /// Variable values keyed by variable ID
    #[serde(default)]
    pub values: IndexMap<String, String>,
    /// Date the run was played
    #[serde(default)]
    pub date: Option<String>,
    /// Submission timestamp
    #[serde(default)]
    pub submitted: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Run together with its leaderboard place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRun {
    /// Place on the leaderboard
    pub place: u32,
    /// The run
    pub run: Run,
}

/// Leaderboard of a category, optionally restricted to a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Link to the leaderboard page
    #[serde(default)]
    pub weblink: Option<String>,
    /// Game
    pub game: Reference,
    /// Category
    pub category: Reference,
    /// Level, for individual-level leaderboards
    #[serde(default)]
    pub level: Option<Reference>,
    /// Timing method used for sorting
    #[serde(default)]
    pub timing: Option<String>,
    /// Ranked runs
    #[serde(default)]
    pub runs: Vec<RankedRun>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// User
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Names
    pub names: Names,
    /// Link to the profile page
    pub weblink: String,
    /// Site role
    #[serde(default)]
    pub role: Option<String>,
    /// Signup timestamp
    #[serde(default)]
    pub signup: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Run submission and moderation
// ============================================================================

/// Player reference used when submitting or editing runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rel", rename_all = "lowercase")]
pub enum PlayerRef {
    /// Registered user
    User {
        /// User ID
        id: String,
    },
    /// Guest, identified by name
    Guest {
        /// Guest name
        name: String,
    },
}

/// Times of a new run, in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewRunTimes {
    /// Real time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtime: Option<f64>,
    /// Real time without loads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtime_noloads: Option<f64>,
    /// In-game time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingame: Option<f64>,
}

/// Value of a variable on a new run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum VariableValue {
    /// One of the predefined values
    PreDefined {
        /// Value ID
        value: String,
    },
    /// Free-form value for user-defined variables
    UserDefined {
        /// Value text
        value: String,
    },
}

/// Run to submit
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewRun {
    /// Category ID
    pub category: String,
    /// Level ID, for individual-level runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Date played (`YYYY-MM-DD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Region ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Platform ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Auto-verify (super moderators only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Times
    pub times: NewRunTimes,
    /// Players; defaults to the submitting user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerRef>>,
    /// Played on an emulator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emulated: Option<bool>,
    /// Video link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// splits.io ID or URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splitsio: Option<String>,
    /// Variable values keyed by variable ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, VariableValue>>,
}

/// New verification state of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusUpdate {
    /// Verify the run
    Verified,
    /// Reject the run
    Rejected {
        /// Reason shown to the runner
        reason: String,
    },
}

// ============================================================================
// Secondary (v2) API
// ============================================================================

/// Verification state used by the v2 API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunVerificationStatus {
    /// Awaiting verification
    Pending = 0,
    /// Verified
    Verified = 1,
    /// Rejected
    Rejected = 2,
}

impl Serialize for RunVerificationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Body of `PutRunVerification`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRunVerification {
    /// Run ID
    pub run_id: String,
    /// New state
    pub verified: RunVerificationStatus,
    /// Rejection reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of `PutRunAssignee`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRunAssignee {
    /// User ID of the verifier
    pub assignee_id: String,
    /// Run ID
    pub run_id: String,
}

/// Acknowledgement returned by v2 mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledged {
    /// Whether the change was applied
    pub ok: bool,
}

/// Error answer of the v2 API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V2Error {
    /// Error text
    pub error: String,
}

/// Answer of the v2 API: either the expected value or an error object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum V2Response<T> {
    /// Error object
    Error(V2Error),
    /// Expected value
    Success(T),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_next_link() {
        let pagination: Pagination = serde_json::from_value(json!({
            "offset": 0,
            "max": 2,
            "size": 2,
            "links": [
                { "rel": "prev", "uri": "https://example.com/games?offset=0" },
                { "rel": "next", "uri": "https://example.com/games?offset=2" }
            ]
        }))
        .unwrap();

        assert_eq!(
            pagination.next_link(),
            Some("https://example.com/games?offset=2")
        );

        let last = Pagination::default();
        assert_eq!(last.next_link(), None);
    }

    #[test]
    fn test_error_payload_from_json() {
        let value = json!({
            "status": 400,
            "message": "Invalid run",
            "links": [
                { "rel": "support", "uri": "https://hornet.speedrun.com/" },
                { "bogus": true }
            ],
            "errors": ["category is required", 7]
        });

        let payload = ErrorPayload::from_json(&value).unwrap();
        assert_eq!(payload.status, 400);
        assert_eq!(payload.links.len(), 1);
        assert_eq!(
            payload.errors,
            Some(vec!["category is required".to_string(), "7".to_string()])
        );
    }

    #[test]
    fn test_error_payload_rejects_success_shapes() {
        assert!(ErrorPayload::from_json(&json!({ "id": "abc", "name": "Foo" })).is_none());
        assert!(ErrorPayload::from_json(&json!({ "status": "404", "message": "x", "links": [] })).is_none());
        assert!(ErrorPayload::from_json(&json!(null)).is_none());
    }

    #[test]
    fn test_reference_id() {
        let id: Reference = serde_json::from_value(json!("j1npme6p")).unwrap();
        assert_eq!(id.id(), Some("j1npme6p"));

        let embedded: Reference =
            serde_json::from_value(json!({ "data": { "id": "xk9gz2l1", "name": "Any%" } })).unwrap();
        assert_eq!(embedded.id(), Some("xk9gz2l1"));
    }

    #[test]
    fn test_new_run_serialization() {
        let run = NewRun {
            category: "wkpoo02r".to_string(),
            times: NewRunTimes {
                realtime: Some(1234.5),
                ..Default::default()
            },
            players: Some(vec![PlayerRef::Guest {
                name: "someone".to_string(),
            }]),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&run).unwrap(),
            json!({
                "category": "wkpoo02r",
                "times": { "realtime": 1234.5 },
                "players": [{ "rel": "guest", "name": "someone" }]
            })
        );
    }

    #[test]
    fn test_status_update_serialization() {
        assert_eq!(
            serde_json::to_value(StatusUpdate::Verified).unwrap(),
            json!({ "status": "verified" })
        );
        assert_eq!(
            serde_json::to_value(StatusUpdate::Rejected {
                reason: "no video".to_string()
            })
            .unwrap(),
            json!({ "status": "rejected", "reason": "no video" })
        );
    }

    #[test]
    fn test_v2_request_serialization() {
        let body = PutRunVerification {
            run_id: "abc".to_string(),
            verified: RunVerificationStatus::Rejected,
            reason: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "runId": "abc", "verified": 2 })
        );
    }

    #[test]
    fn test_v2_response() {
        let err: V2Response<Acknowledged> = serde_json::from_value(json!({ "error": "nope" })).unwrap();
        assert_eq!(
            err,
            V2Response::Error(V2Error {
                error: "nope".to_string()
            })
        );

        let ok: V2Response<Acknowledged> = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert_eq!(ok, V2Response::Success(Acknowledged { ok: true }));
    }
}
