/// Enrichment: resolved candidates to fully populated results
///
/// Every matched candidate gets its details and regional availability
/// fetched concurrently. Per-item isolation is the contract: one item's
/// failure, not-found or timeout drops that item alone. The final list
/// keeps the original suggestion order with dropped items omitted in
/// place, and never contains a partially populated record.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::{join_all, try_join};
use tokio::time::timeout;

use crate::{
    error::AppResult,
    models::{EnrichedMovie, RegionAvailability, RegionPreference, Resolution, ResolvedCandidate},
    services::{providers::CatalogProvider, CATALOG_CALL_TIMEOUT},
};

/// Fetches details and streaming availability for every matched candidate.
///
/// Unresolved entries and later duplicates of an already-enriched catalog
/// id are skipped up front; the rest fan out concurrently.
pub async fn enrich_candidates(
    catalog: Arc<dyn CatalogProvider>,
    regions: &RegionPreference,
    candidates: Vec<ResolvedCandidate>,
) -> Vec<EnrichedMovie> {
    let mut seen_ids = HashSet::new();
    let mut jobs = Vec::new();

    for candidate in candidates {
        match candidate.resolution {
            Resolution::Matched(id) => {
                if seen_ids.insert(id) {
                    jobs.push((id, candidate.suggestion.title));
                } else {
                    tracing::debug!(
                        movie_id = id,
                        title = %candidate.suggestion.title,
                        "Duplicate canonical match skipped"
                    );
                }
            }
            Resolution::Unresolved => {
                tracing::debug!(
                    title = %candidate.suggestion.title,
                    "Unresolved suggestion skipped"
                );
            }
        }
    }

    let total = jobs.len();
    let tasks = jobs.into_iter().map(|(id, title)| {
        let catalog = Arc::clone(&catalog);
        let regions = regions.clone();
        async move {
            match timeout(
                CATALOG_CALL_TIMEOUT,
                enrich_one(catalog.as_ref(), &regions, id),
            )
            .await
            {
                Ok(Ok(movie)) => Some(movie),
                Ok(Err(e)) => {
                    tracing::warn!(
                        movie_id = id,
                        title = %title,
                        error = %e,
                        "Enrichment failed; item dropped"
                    );
                    None
                }
                Err(_) => {
                    tracing::warn!(
                        movie_id = id,
                        title = %title,
                        "Enrichment timed out; item dropped"
                    );
                    None
                }
            }
        }
    });

    let movies: Vec<EnrichedMovie> = join_all(tasks).await.into_iter().flatten().collect();

    tracing::info!(
        requested = total,
        enriched = movies.len(),
        "Enrichment phase completed"
    );

    movies
}

async fn enrich_one(
    catalog: &dyn CatalogProvider,
    regions: &RegionPreference,
    id: u64,
) -> AppResult<EnrichedMovie> {
    let (record, providers) =
        try_join(catalog.movie_details(id), catalog.watch_providers(id)).await?;

    Ok(EnrichedMovie {
        record,
        streaming: select_region(providers, regions),
    })
}

/// Preferred region first, fallback second, otherwise empty availability
pub(crate) fn select_region(
    mut providers: HashMap<String, RegionAvailability>,
    regions: &RegionPreference,
) -> RegionAvailability {
    providers
        .remove(&regions.primary)
        .or_else(|| providers.remove(&regions.fallback))
        .unwrap_or_default()
}
