//! Query string construction
//!
//! Parameters are kept in insertion order and rendered as plain `key=value`
//! pairs joined with `&`. Values are not percent-encoded; the API accepts the
//! raw text and embed lists such as `categories.variables,levels` must reach it
//! unchanged.

use indexmap::IndexMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Query parameter added by cache-busting requests
pub const CACHE_PARAM: &str = "__cache__";

static CACHE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A single query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Text value
    Str(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{}", n),
            QueryValue::Float(n) => write!(f, "{}", n),
            QueryValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Str(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Int(value as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Insertion-ordered query parameters
///
/// Setting a key that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: IndexMap<String, QueryValue>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.params.insert(key.into(), value.into());
    }

    /// Remove a parameter, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.params.shift_remove(key)
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// Request embedded resources (`embed=...`)
    pub fn embed(self, embeds: &[&str]) -> Self {
        self.with("embed", embeds.join(","))
    }

    /// Restrict a leaderboard to a variable value (`var-<variable>=<value>`)
    pub fn variable(self, variable_id: &str, value_id: impl Into<QueryValue>) -> Self {
        self.with(format!("var-{}", variable_id), value_id)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over the parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as `k1=v1&k2=v2`
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Append `params` to `path` as a query string.
///
/// Returns the path unchanged when there are no parameters.
pub fn build_query(path: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    format!("{}?{}", path, params.to_query_string())
}

/// Like [`build_query`], optionally adding a random [`CACHE_PARAM`] token so
/// that two otherwise identical requests produce different URLs.
pub fn build_query_with_cache(path: &str, params: &QueryParams, cache_bust: bool) -> String {
    if !cache_bust {
        return build_query(path, params);
    }

    let mut params = params.clone();
    params.insert(CACHE_PARAM, cache_token());
    build_query(path, &params)
}

/// Random alphanumeric token, unique within the process
fn cache_token() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    let count = CACHE_COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{}{}", random, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_params_leave_path_unchanged() {
        assert_eq!(build_query("/games", &QueryParams::new()), "/games");
    }

    #[test]
    fn test_params_in_insertion_order() {
        let params = QueryParams::new().with("name", "foo").with("max", 5);
        assert_eq!(build_query("/games", &params), "/games?name=foo&max=5");
    }

    #[test]
    fn test_value_coercion() {
        let params = QueryParams::new()
            .with("emulators", true)
            .with("video-only", false)
            .with("top", 3u32)
            .with("ratio", 1.5);
        assert_eq!(
            params.to_query_string(),
            "emulators=true&video-only=false&top=3&ratio=1.5"
        );
    }

    #[test]
    fn test_values_are_not_encoded() {
        let params = QueryParams::new()
            .embed(&["categories.variables", "levels"])
            .with("name", "super mario");
        assert_eq!(
            build_query("/games", &params),
            "/games?embed=categories.variables,levels&name=super mario"
        );
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut params = QueryParams::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        assert_eq!(params.to_query_string(), "a=3&b=2");

        params.remove("a");
        assert_eq!(params.to_query_string(), "b=2");
    }

    #[test]
    fn test_variable_filter() {
        let params = QueryParams::new().variable("m5ly6jn4", "p12z471x");
        assert_eq!(params.to_query_string(), "var-m5ly6jn4=p12z471x");
    }

    #[test]
    fn test_cache_bust_produces_distinct_urls() {
        let params = QueryParams::new().with("name", "foo");
        let first = build_query_with_cache("/games", &params, true);
        let second = build_query_with_cache("/games", &params, true);

        assert_ne!(first, second);
        assert!(first.starts_with("/games?name=foo&__cache__="));
        assert_eq!(build_query_with_cache("/games", &params, false), "/games?name=foo");
    }

    #[test]
    fn test_cache_bust_on_empty_params() {
        let url = build_query_with_cache("/games", &QueryParams::new(), true);
        let token = url.strip_prefix("/games?__cache__=").unwrap();
        assert!(!token.is_empty());
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    proptest! {
        #[test]
        fn prop_pairs_keep_insertion_order(keys in proptest::collection::vec("[a-z]{1,6}", 1..8)) {
            let mut expected: Vec<String> = Vec::new();
            let mut params = QueryParams::new();
            for (i, key) in keys.iter().enumerate() {
                if params.get(key).is_none() {
                    expected.push(key.clone());
                }
                params.insert(key.as_str(), i as i64);
            }

            let rendered = build_query("/p", &params);
            let query = rendered.strip_prefix("/p?").unwrap();
            let rendered_keys: Vec<&str> = query
                .split('&')
                .map(|pair| pair.split('=').next().unwrap())
                .collect();
            prop_assert_eq!(rendered_keys, expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
