use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use cinematch_api::api::{create_router, AppState};
use cinematch_api::error::{AppError, AppResult};
use cinematch_api::models::{
    CatalogSearchHit, Genre, MovieRecord, ProviderEntry, RegionAvailability, RegionPreference,
};
use cinematch_api::services::providers::{CatalogProvider, GenerativeProvider};

// Test doubles

enum GenerativeScript {
    Text(String),
    RateLimited,
    Unavailable,
}

struct FakeGenerative {
    script: GenerativeScript,
}

impl FakeGenerative {
    fn text(text: &str) -> Self {
        Self {
            script: GenerativeScript::Text(text.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for FakeGenerative {
    async fn complete(&self, _prompt: &str) -> AppResult<String> {
        match &self.script {
            GenerativeScript::Text(text) => Ok(text.clone()),
            GenerativeScript::RateLimited => {
                Err(AppError::RateLimited("quota exhausted".to_string()))
            }
            GenerativeScript::Unavailable => {
                Err(AppError::UpstreamUnavailable("request timed out".to_string()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "fake-generative"
    }
}

#[derive(Default)]
struct FakeCatalog {
    search: HashMap<String, Vec<CatalogSearchHit>>,
    details: HashMap<u64, MovieRecord>,
    providers: HashMap<u64, HashMap<String, RegionAvailability>>,
    failing_details: HashSet<u64>,
}

impl FakeCatalog {
    fn with_movie(mut self, query: &str, id: u64, title: &str) -> Self {
        self.search.insert(
            query.to_string(),
            vec![hit(id, title, Some("2007-10-25"), Some(60.0))],
        );
        self.details.insert(id, record(id, title));
        self
    }

    fn with_streaming(mut self, id: u64, region: &str, provider: &str) -> Self {
        self.providers
            .entry(id)
            .or_default()
            .insert(region.to_string(), availability(provider));
        self
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogSearchHit>> {
        Ok(self.search.get(query).cloned().unwrap_or_default())
    }

    async fn movie_details(&self, id: u64) -> AppResult<MovieRecord> {
        if self.failing_details.contains(&id) {
            return Err(AppError::Catalog("details fetch failed".to_string()));
        }
        self.details
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::Catalog(format!("movie {} not found", id)))
    }

    async fn watch_providers(
        &self,
        id: u64,
    ) -> AppResult<HashMap<String, RegionAvailability>> {
        Ok(self.providers.get(&id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "fake-catalog"
    }
}

// Fixtures

fn hit(id: u64, title: &str, date: Option<&str>, popularity: Option<f64>) -> CatalogSearchHit {
    CatalogSearchHit {
        id,
        title: title.to_string(),
        release_date: date.map(|d| d.to_string()),
        popularity,
    }
}

fn record(id: u64, title: &str) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        overview: Some(format!("Overview of {}", title)),
        genres: vec![Genre {
            id: 35,
            name: "Comedy".to_string(),
        }],
        poster_path: Some(format!("/{}.jpg", id)),
        release_date: Some("2007-10-25".to_string()),
        vote_average: Some(6.1),
        runtime: Some(91),
    }
}

fn availability(provider: &str) -> RegionAvailability {
    RegionAvailability {
        link: Some("https://example.test/watch".to_string()),
        flatrate: vec![ProviderEntry {
            provider_id: 8,
            provider_name: provider.to_string(),
            logo_path: None,
        }],
        rent: vec![],
        buy: vec![],
    }
}

fn create_test_server(generative: FakeGenerative, catalog: FakeCatalog) -> TestServer {
    let state = AppState::with_providers(
        Arc::new(generative),
        Arc::new(catalog),
        RegionPreference {
            primary: "BR".to_string(),
            fallback: "US".to_string(),
        },
    );
    TestServer::new(create_router(state)).unwrap()
}

fn solo_body(genre: &str) -> Value {
    json!({
        "mode": "solo",
        "preferences": { "user1": { "genres": [genre] } }
    })
}

// Tests

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(FakeGenerative::text(""), FakeCatalog::default());
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_solo_request_returns_enriched_movie() {
    let catalog = FakeCatalog::default()
        .with_movie("Bee Movie", 42, "Bee Movie")
        .with_streaming(42, "BR", "Netflix");
    let generative = FakeGenerative::text(r#"{"movies":[{"title":"Bee Movie"}]}"#);

    let server = create_test_server(generative, catalog);
    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "Bee Movie");
    assert_eq!(movies[0]["runtime"], 91);
    assert_eq!(movies[0]["streaming"]["flatrate"][0]["provider_name"], "Netflix");
}

#[tokio::test]
async fn test_fenced_model_output_is_accepted() {
    let catalog = FakeCatalog::default().with_movie("X", 1, "X");
    let generative =
        FakeGenerative::text("```json\n{\"movies\":[{\"title\":\"X\"}]}\n```");

    let server = create_test_server(generative, catalog);
    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movies"][0]["title"], "X");
}

#[tokio::test]
async fn test_empty_suggestion_list_is_404() {
    let server = create_test_server(
        FakeGenerative::text(r#"{"movies":[]}"#),
        FakeCatalog::default(),
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("no usable suggestions"));
}

#[tokio::test]
async fn test_unparsable_model_output_is_502() {
    let server = create_test_server(
        FakeGenerative::text("I would rather talk about the weather."),
        FakeCatalog::default(),
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_details_failure_with_single_suggestion_is_404() {
    let mut catalog = FakeCatalog::default().with_movie("Bee Movie", 42, "Bee Movie");
    catalog.failing_details.insert(42);

    let server = create_test_server(
        FakeGenerative::text(r#"{"movies":[{"title":"Bee Movie"}]}"#),
        catalog,
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_year_hint_falls_back_to_popularity_when_unmatchable() {
    // Catalog has only the 2021 and 1984 releases; a 1980 hint matches
    // neither within ±1, so the more popular entry must win.
    let mut catalog = FakeCatalog::default();
    catalog.search.insert(
        "Dune".to_string(),
        vec![
            hit(841, "Dune", Some("1984-12-14"), Some(42.0)),
            hit(438631, "Dune", Some("2021-09-15"), Some(845.0)),
        ],
    );
    catalog.details.insert(438631, record(438631, "Dune"));

    let server = create_test_server(
        FakeGenerative::text(r#"{"movies":[{"title":"Dune","year":1980}]}"#),
        catalog,
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Sci-Fi"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movies"][0]["id"], 438631);
}

#[tokio::test]
async fn test_generative_timeout_is_503_with_no_partial_output() {
    let server = create_test_server(
        FakeGenerative {
            script: GenerativeScript::Unavailable,
        },
        FakeCatalog::default().with_movie("X", 1, "X"),
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert!(body.get("movies").is_none());
}

#[tokio::test]
async fn test_rate_limited_upstream_is_429() {
    let server = create_test_server(
        FakeGenerative {
            script: GenerativeScript::RateLimited,
        },
        FakeCatalog::default(),
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_paired_mode_without_user2_is_400() {
    let server = create_test_server(FakeGenerative::text(""), FakeCatalog::default());

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "mode": "paired",
            "preferences": { "user1": { "genres": ["Comedy"] } }
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_paired_mode_with_both_users_succeeds() {
    let catalog = FakeCatalog::default().with_movie("Shaun of the Dead", 3, "Shaun of the Dead");
    let generative =
        FakeGenerative::text(r#"{"movies":[{"title":"Shaun of the Dead"}]}"#);

    let server = create_test_server(generative, catalog);
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "mode": "paired",
            "preferences": {
                "user1": { "genres": ["Comedy"] },
                "user2": { "genres": ["Horror"] }
            }
        }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_partial_failures_keep_order_and_drop_in_place() {
    // Middle item fails enrichment, last item never resolves; the two
    // survivors come back in their original relative order.
    let mut catalog = FakeCatalog::default()
        .with_movie("First", 1, "First")
        .with_movie("Second", 2, "Second")
        .with_movie("Fourth", 4, "Fourth");
    catalog.failing_details.insert(2);

    let generative = FakeGenerative::text(
        r#"{"movies":[{"title":"First"},{"title":"Second"},{"title":"Third"},{"title":"Fourth"}]}"#,
    );

    let server = create_test_server(generative, catalog);
    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Drama"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let titles: Vec<_> = body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["First", "Fourth"]);
}

#[tokio::test]
async fn test_streaming_falls_back_to_secondary_region() {
    let catalog = FakeCatalog::default()
        .with_movie("X", 1, "X")
        .with_streaming(1, "US", "Hulu");

    let server = create_test_server(
        FakeGenerative::text(r#"{"movies":[{"title":"X"}]}"#),
        catalog,
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movies"][0]["streaming"]["flatrate"][0]["provider_name"], "Hulu");
}

#[tokio::test]
async fn test_missing_streaming_regions_yield_empty_object() {
    let catalog = FakeCatalog::default()
        .with_movie("X", 1, "X")
        .with_streaming(1, "FR", "Canal+");

    let server = create_test_server(
        FakeGenerative::text(r#"{"movies":[{"title":"X"}]}"#),
        catalog,
    );

    let response = server
        .post("/api/v1/recommendations")
        .json(&solo_body("Comedy"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movies"][0]["streaming"], json!({}));
}

#[tokio::test]
async fn test_invalid_mode_is_rejected() {
    let server = create_test_server(FakeGenerative::text(""), FakeCatalog::default());

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "mode": "throuple",
            "preferences": { "user1": {} }
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_request_id_header_is_echoed() {
    let server = create_test_server(FakeGenerative::text(""), FakeCatalog::default());
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}
