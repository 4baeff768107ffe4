use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Request mode: recommendations for one viewer or a balanced pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    Solo,
    Paired,
}

/// Inbound recommendation request body
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub mode: RecommendationMode,
    pub preferences: PreferencePayload,
}

#[derive(Debug, Deserialize)]
pub struct PreferencePayload {
    pub user1: RawPreferences,
    #[serde(default)]
    pub user2: Option<RawPreferences>,
}

/// Raw, untrusted preference fields as sent by the client
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawPreferences {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default, rename = "freeText", alias = "other")]
    pub free_text: Option<String>,
}

/// Canonical preference structure after validation and shaping
///
/// List fields carry set semantics: entries are trimmed, empties dropped,
/// and duplicates removed case-insensitively while keeping first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceProfile {
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub free_text: Option<String>,
}

impl PreferenceProfile {
    fn from_raw(raw: RawPreferences) -> Self {
        Self {
            genres: normalize_terms(raw.genres),
            actors: normalize_terms(raw.actors),
            directors: normalize_terms(raw.directors),
            free_text: raw
                .free_text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }
}

fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for term in terms {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(trimmed.to_string());
    }
    out
}

impl RecommendationRequest {
    /// Validates the request and shapes it into one or two profiles.
    ///
    /// Performs no network calls. Empty optional fields mean "not specified"
    /// and are never an error; a paired request without a second preference
    /// set is rejected before anything else runs.
    pub fn normalize(self) -> AppResult<Vec<PreferenceProfile>> {
        let mut profiles = vec![PreferenceProfile::from_raw(self.preferences.user1)];

        match self.mode {
            RecommendationMode::Solo => {}
            RecommendationMode::Paired => match self.preferences.user2 {
                Some(user2) => profiles.push(PreferenceProfile::from_raw(user2)),
                None => {
                    return Err(AppError::InvalidInput(
                        "paired mode requires preferences for both users".to_string(),
                    ))
                }
            },
        }

        Ok(profiles)
    }
}

/// A raw title proposed by the generative service, not yet verified
/// against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Outcome of resolving one Suggestion against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCandidate {
    pub suggestion: Suggestion,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Matched to exactly one catalog record
    Matched(u64),
    /// Nothing usable came back from the catalog search
    Unresolved,
}

/// One entry from the catalog's free-text search
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSearchHit {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
}

impl CatalogSearchHit {
    /// Release year parsed from the leading `YYYY` of the release date
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }
}

/// The catalog's authoritative data for a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub runtime: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Streaming availability for one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionAvailability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flatrate: Vec<ProviderEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rent: Vec<ProviderEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buy: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// Region selection policy: preferred region first, one fallback
#[derive(Debug, Clone)]
pub struct RegionPreference {
    pub primary: String,
    pub fallback: String,
}

/// Final externally visible shape: canonical record fields flattened,
/// with the selected region's availability attached
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedMovie {
    #[serde(flatten)]
    pub record: MovieRecord,
    pub streaming: RegionAvailability,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub movies: Vec<EnrichedMovie>,
}
