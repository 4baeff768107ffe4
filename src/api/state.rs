use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::AppResult,
    models::RegionPreference,
    services::providers::{
        gemini::GeminiProvider, tmdb::TmdbProvider, CatalogProvider, GenerativeProvider,
    },
};

const CATALOG_HTTP_TIMEOUT_SECS: u64 = 15;

/// Shared application state
///
/// Both collaborators are trait objects so tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    pub generative: Arc<dyn GenerativeProvider>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub regions: RegionPreference,
}

impl AppState {
    /// Wires up the production providers from configuration
    pub fn new(config: &Config) -> AppResult<Self> {
        let generative = GeminiProvider::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.gemini_timeout_secs),
        )?;

        let catalog = TmdbProvider::new(
            config.tmdb_api_auth.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            Duration::from_secs(CATALOG_HTTP_TIMEOUT_SECS),
        )?;

        Ok(Self::with_providers(
            Arc::new(generative),
            Arc::new(catalog),
            RegionPreference {
                primary: config.primary_region.clone(),
                fallback: config.fallback_region.clone(),
            },
        ))
    }

    /// Builds state from explicit collaborators (used by tests)
    pub fn with_providers(
        generative: Arc<dyn GenerativeProvider>,
        catalog: Arc<dyn CatalogProvider>,
        regions: RegionPreference,
    ) -> Self {
        Self {
            generative,
            catalog,
            regions,
        }
    }
}
