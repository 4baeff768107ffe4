/// Recommendation pipeline orchestration
///
/// Normalize → build prompt → generative completion → extract suggestions →
/// resolve against the catalog → enrich → classify the aggregate outcome.
/// Stage failures before resolution short-circuit the request; per-item
/// failures afterwards only shrink the result list.
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{RecommendationRequest, RecommendationResponse, RegionPreference},
    services::{
        enrichment, extractor, prompt,
        providers::{CatalogProvider, GenerativeProvider},
        resolver,
    },
};

pub async fn recommend(
    generative: Arc<dyn GenerativeProvider>,
    catalog: Arc<dyn CatalogProvider>,
    regions: &RegionPreference,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let profiles = request.normalize()?;
    let prompt = prompt::build_prompt(&profiles);
    tracing::debug!(
        profiles = profiles.len(),
        prompt_len = prompt.len(),
        provider = generative.name(),
        "Prompt built"
    );

    let raw = generative.complete(&prompt).await?;
    let suggestions = extractor::extract_suggestions(&raw)?;
    tracing::info!(suggestions = suggestions.len(), "Suggestions extracted");

    let resolved = resolver::resolve_suggestions(Arc::clone(&catalog), suggestions).await;
    let movies = enrichment::enrich_candidates(catalog, regions, resolved).await;

    // Partial success is success; only a fully empty list is an error.
    if movies.is_empty() {
        return Err(AppError::NoMatchesFound);
    }

    Ok(RecommendationResponse { movies })
}
