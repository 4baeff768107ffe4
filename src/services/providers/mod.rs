/// External collaborator abstractions
///
/// The pipeline talks to two outbound services: a generative text service
/// that proposes titles, and the movie catalog used to verify and enrich
/// them. Both sit behind traits so handlers and tests can inject fakes.
use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{CatalogSearchHit, MovieRecord, RegionAvailability},
};

pub mod gemini;
pub mod tmdb;

/// Trait for the generative text-completion service
///
/// A single call: prompt in, raw untrusted text out. The implementation
/// must carry its own request timeout and never retry; the response text
/// may be fenced, decorated, or outright non-conformant.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Send a prompt and return the raw response text
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for the read-only movie catalog service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Free-text title search, in the catalog's own relevance order
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogSearchHit>>;

    /// Full details for one catalog record
    async fn movie_details(&self, id: u64) -> AppResult<MovieRecord>;

    /// Region-keyed streaming availability for one catalog record
    async fn watch_providers(&self, id: u64)
        -> AppResult<HashMap<String, RegionAvailability>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
