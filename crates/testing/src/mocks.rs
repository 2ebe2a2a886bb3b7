//! HTTP mocks for paginated and single-shot endpoints.
//!
//! Built on `wiremock`. Pages after the first are served from
//! `{path}/page/{n}`, so each page is matched by path alone and its hit count
//! can be asserted independently.

use crate::fixtures::page;
use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Path serving page `index` (zero-based) of `base`
pub fn page_path(base: &str, index: usize) -> String {
    if index == 0 {
        base.to_string()
    } else {
        format!("{}/page/{}", base, index + 1)
    }
}

enum PageBody {
    Items(Vec<Value>),
    Error(Value),
}

/// A paginated GET endpoint
///
/// ```no_run
/// use speedrun_testing::{fixtures, PagedEndpoint};
/// use wiremock::MockServer;
///
/// # async fn example() {
/// let server = MockServer::start().await;
/// PagedEndpoint::new("/games")
///     .page(fixtures::items("g", 0..2, fixtures::game))
///     .page(fixtures::items("g", 2..3, fixtures::game))
///     .expect_hits(&[1, 1])
///     .mount(&server)
///     .await;
/// # }
/// ```
pub struct PagedEndpoint {
    path: String,
    pages: Vec<PageBody>,
    hits: Vec<u64>,
}

impl PagedEndpoint {
    /// Endpoint whose first page is served at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pages: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// Append a page of items
    pub fn page(mut self, items: Vec<Value>) -> Self {
        self.pages.push(PageBody::Items(items));
        self
    }

    /// Append a page answering with an error payload
    ///
    /// The HTTP status is taken from the payload's `status` field.
    pub fn error_page(mut self, payload: Value) -> Self {
        self.pages.push(PageBody::Error(payload));
        self
    }

    /// Expected number of requests per page, in page order
    ///
    /// Pages without an entry are not checked.
    pub fn expect_hits(mut self, hits: &[u64]) -> Self {
        self.hits = hits.to_vec();
        self
    }

    /// Mount every page on `server`
    pub async fn mount(self, server: &MockServer) {
        let count = self.pages.len();

        for (index, body) in self.pages.into_iter().enumerate() {
            let template = match body {
                PageBody::Items(items) => {
                    let next = (index + 1 < count)
                        .then(|| format!("{}{}", server.uri(), page_path(&self.path, index + 1)));
                    ResponseTemplate::new(200).set_body_json(page(items, next.as_deref()))
                }
                PageBody::Error(payload) => {
                    let status = payload["status"].as_u64().unwrap_or(500) as u16;
                    ResponseTemplate::new(status).set_body_json(payload)
                }
            };

            let mut mock = Mock::given(method("GET"))
                .and(path(page_path(&self.path, index)))
                .respond_with(template);

            if let Some(hits) = self.hits.get(index) {
                mock = mock.expect(*hits);
            }

            mock.mount(server).await;
        }
    }
}

/// Serve `body` with `status` for `verb` requests to `route`, expecting
/// exactly one call
pub async fn mount_once(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}
