/// Catalog resolution: free-text suggestions to canonical catalog ids
///
/// Each suggestion resolves independently. The search uses the suggested
/// title verbatim; concatenating title and year degrades match quality and
/// is deliberately avoided. A stated year acts as a hint (±1 filter with
/// fallback to the unfiltered set), never as an exclusion that can starve
/// a match. Within the surviving candidates the highest popularity wins,
/// with the catalog's own relevance order breaking ties.
use std::sync::Arc;

use futures::future::join_all;
use tokio::time::timeout;

use crate::{
    error::AppResult,
    models::{CatalogSearchHit, Resolution, ResolvedCandidate, Suggestion},
    services::{providers::CatalogProvider, CATALOG_CALL_TIMEOUT},
};

/// Resolves every suggestion concurrently, preserving input order.
///
/// A failed or timed-out search marks only that suggestion unresolved;
/// siblings are never cancelled or delayed by it.
pub async fn resolve_suggestions(
    catalog: Arc<dyn CatalogProvider>,
    suggestions: Vec<Suggestion>,
) -> Vec<ResolvedCandidate> {
    let tasks = suggestions.into_iter().map(|suggestion| {
        let catalog = Arc::clone(&catalog);
        async move {
            let resolution =
                match timeout(CATALOG_CALL_TIMEOUT, resolve_one(catalog.as_ref(), &suggestion))
                    .await
                {
                    Ok(Ok(resolution)) => resolution,
                    Ok(Err(e)) => {
                        tracing::warn!(
                            title = %suggestion.title,
                            error = %e,
                            "Catalog search failed; suggestion unresolved"
                        );
                        Resolution::Unresolved
                    }
                    Err(_) => {
                        tracing::warn!(
                            title = %suggestion.title,
                            "Catalog search timed out; suggestion unresolved"
                        );
                        Resolution::Unresolved
                    }
                };

            ResolvedCandidate {
                suggestion,
                resolution,
            }
        }
    });

    let resolved = join_all(tasks).await;

    let matched = resolved
        .iter()
        .filter(|c| matches!(c.resolution, Resolution::Matched(_)))
        .count();
    tracing::info!(
        total = resolved.len(),
        matched,
        unresolved = resolved.len() - matched,
        "Resolution phase completed"
    );

    resolved
}

async fn resolve_one(
    catalog: &dyn CatalogProvider,
    suggestion: &Suggestion,
) -> AppResult<Resolution> {
    let candidates = catalog.search_movies(&suggestion.title).await?;

    match pick_candidate(&candidates, suggestion.year) {
        Some(hit) => Ok(Resolution::Matched(hit.id)),
        None => {
            tracing::debug!(title = %suggestion.title, "No catalog candidates");
            Ok(Resolution::Unresolved)
        }
    }
}

/// Disambiguation policy: year hint with fallback, then popularity.
pub(crate) fn pick_candidate(
    candidates: &[CatalogSearchHit],
    year: Option<i32>,
) -> Option<&CatalogSearchHit> {
    let pool: Vec<&CatalogSearchHit> = match year {
        Some(year) => {
            let within: Vec<&CatalogSearchHit> = candidates
                .iter()
                .filter(|c| {
                    c.release_year()
                        .map_or(false, |ry| (ry - year).abs() <= 1)
                })
                .collect();
            if within.is_empty() {
                candidates.iter().collect()
            } else {
                within
            }
        }
        None => candidates.iter().collect(),
    };

    // Absent popularity counts as zero; strict comparison keeps the
    // earliest candidate on ties.
    pool.into_iter().reduce(|best, candidate| {
        if candidate.popularity.unwrap_or(0.0) > best.popularity.unwrap_or(0.0) {
            candidate
        } else {
            best
        }
    })
}
