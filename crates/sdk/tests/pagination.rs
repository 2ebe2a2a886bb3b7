//! Auto-pagination against a mock HTTP server.

use serde_json::Value;
use speedrun_sdk::{
    Client, CollectOptions, Game, GetOptions, QueryParams, RateLimitConfig, RateLimiter, SdkError,
};
use speedrun_testing::{fixtures, init_test_tracing, PagedEndpoint};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn unthrottled() -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(RateLimitConfig::new().with_min_time(Duration::ZERO)))
}

fn client(server: &MockServer) -> Client {
    init_test_tracing();
    Client::builder()
        .base_url(server.uri())
        .rate_limiter(unthrottled())
        .build()
        .unwrap()
}

fn ids(games: &[Game]) -> Vec<&str> {
    games.iter().map(|g| g.id.as_str()).collect()
}

#[tokio::test]
async fn test_collects_every_page_in_order() {
    let server = MockServer::start().await;

    PagedEndpoint::new("/games")
        .page(fixtures::items("g", 0..2, fixtures::game))
        .page(fixtures::items("g", 2..4, fixtures::game))
        .page(fixtures::items("g", 4..5, fixtures::game))
        .expect_hits(&[1, 1, 1])
        .mount(&server)
        .await;

    let games = client(&server)
        .games()
        .list_all(&QueryParams::new(), &CollectOptions::new())
        .await
        .unwrap();

    assert_eq!(ids(&games), vec!["g0", "g1", "g2", "g3", "g4"]);
}

#[tokio::test]
async fn test_single_page_without_next_link() {
    let server = MockServer::start().await;

    PagedEndpoint::new("/users")
        .page(fixtures::items("u", 0..3, fixtures::user))
        .expect_hits(&[1])
        .mount(&server)
        .await;

    let users = client(&server)
        .users()
        .list_all(&QueryParams::new().with("name", "abc"), &CollectOptions::new())
        .await
        .unwrap();

    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn test_max_truncates_and_stops_fetching() {
    let server = MockServer::start().await;

    PagedEndpoint::new("/games")
        .page(fixtures::items("g", 0..2, fixtures::game))
        .page(fixtures::items("g", 2..4, fixtures::game))
        .page(fixtures::items("g", 4..6, fixtures::game))
        .expect_hits(&[1, 1, 0])
        .mount(&server)
        .await;

    let games = client(&server)
        .games()
        .list_all(&QueryParams::new(), &CollectOptions::new().max(3))
        .await
        .unwrap();

    assert_eq!(ids(&games), vec!["g0", "g1", "g2"]);
}

#[tokio::test]
async fn test_max_on_page_boundary() {
    let server = MockServer::start().await;

    PagedEndpoint::new("/games")
        .page(fixtures::items("g", 0..2, fixtures::game))
        .page(fixtures::items("g", 2..4, fixtures::game))
        .expect_hits(&[1, 0])
        .mount(&server)
        .await;

    let games = client(&server)
        .games()
        .list_all(&QueryParams::new(), &CollectOptions::new().max(2))
        .await
        .unwrap();

    assert_eq!(ids(&games), vec!["g0", "g1"]);
}

#[tokio::test]
async fn test_max_below_one_makes_no_request() {
    let server = MockServer::start().await;

    PagedEndpoint::new("/games")
        .page(fixtures::items("g", 0..2, fixtures::game))
        .expect_hits(&[0])
        .mount(&server)
        .await;

    let client = client(&server);

    for max in [0, -5] {
        let games = client
            .games()
            .list_all(&QueryParams::new(), &CollectOptions::new().max(max))
            .await
            .unwrap();
        assert!(games.is_empty());
    }
}

#[tokio::test]
async fn test_error_page_aborts_collection() {
    let server = MockServer::start().await;

    PagedEndpoint::new("/runs")
        .page(fixtures::items("r", 0..2, fixtures::run))
        .error_page(fixtures::error_payload(503, "Service unavailable"))
        .page(fixtures::items("r", 4..6, fixtures::run))
        .expect_hits(&[1, 1, 0])
        .mount(&server)
        .await;

    let err = client(&server)
        .runs()
        .list_all(&QueryParams::new(), &CollectOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Service(_)));
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_mapped_collection() {
    let server = MockServer::start().await;

    PagedEndpoint::new("/games")
        .page(fixtures::items("g", 0..2, fixtures::game))
        .page(fixtures::items("g", 2..3, fixtures::game))
        .mount(&server)
        .await;

    let mut seen = 0;
    let abbreviations: Vec<String> = client(&server)
        .collect_all_mapped(
            "/games",
            &QueryParams::new(),
            &CollectOptions::new(),
            |game: Game| {
                seen += 1;
                game.abbreviation.to_uppercase()
            },
        )
        .await
        .unwrap();

    assert_eq!(abbreviations, vec!["G0", "G1", "G2"]);
    assert_eq!(seen, 3);
}

#[tokio::test]
async fn test_next_pages_keep_api_key() {
    let server = MockServer::start().await;
    let next = format!("{}/games/page/2", server.uri());

    Mock::given(method("GET"))
        .and(path("/games"))
        .and(header("x-api-key", "secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::page(fixtures::items("g", 0..1, fixtures::game), Some(&next))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/games/page/2"))
        .and(header("x-api-key", "secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::page(fixtures::items("g", 1..2, fixtures::game), None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = CollectOptions::new().get_options(GetOptions::new().api_key("secret"));
    let games: Vec<Value> = client(&server)
        .collect_all("/games", &QueryParams::new(), &options)
        .await
        .unwrap();

    assert_eq!(games.len(), 2);
    assert_eq!(games[1]["id"], "g1");
}
