/// TMDB catalog provider
///
/// Read-only consumer of three endpoints: free-text movie search, movie
/// details by id, and watch providers by id. Catalog failures surface as
/// `AppError::Catalog`; the resolution and enrichment stages decide what
/// a failure means for an individual item.
use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogSearchHit, MovieRecord, RegionAvailability},
    services::providers::CatalogProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_auth: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        api_auth: String,
        api_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_auth,
            api_url,
            language,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_auth)
            .header("accept", "application/json")
            .query(&[("language", self.language.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Catalog(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogSearchHit>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response = self.get("/search/movie", &[("query", query)]).await?;
        let payload: TmdbSearchResponse = response.json().await?;

        let hits: Vec<CatalogSearchHit> = payload
            .results
            .into_iter()
            .map(CatalogSearchHit::from)
            .collect();

        tracing::debug!(
            query = %query,
            results = hits.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(hits)
    }

    async fn movie_details(&self, id: u64) -> AppResult<MovieRecord> {
        let response = self.get(&format!("/movie/{}", id), &[]).await?;
        let record: MovieRecord = response.json().await?;
        Ok(record)
    }

    async fn watch_providers(
        &self,
        id: u64,
    ) -> AppResult<HashMap<String, RegionAvailability>> {
        let response = self
            .get(&format!("/movie/{}/watch/providers", id), &[])
            .await?;
        let payload: WatchProvidersResponse = response.json().await?;
        Ok(payload.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbSearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
struct TmdbSearchHit {
    id: u64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    popularity: Option<f64>,
}

impl From<TmdbSearchHit> for CatalogSearchHit {
    fn from(hit: TmdbSearchHit) -> Self {
        CatalogSearchHit {
            id: hit.id,
            title: hit.title,
            // TMDB sends "" for unknown dates; normalize to absent
            release_date: hit.release_date.filter(|d| !d.is_empty()),
            popularity: hit.popularity,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: HashMap<String, RegionAvailability>,
}
