use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Generative text service API key
    pub gemini_api_key: String,

    /// Generative text service base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Generative model identifier
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Request timeout for the generative service, in seconds
    #[serde(default = "default_gemini_timeout_secs")]
    pub gemini_timeout_secs: u64,

    /// Movie catalog API bearer token
    pub tmdb_api_auth: String,

    /// Movie catalog API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language for catalog metadata
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Preferred streaming availability region
    #[serde(default = "default_primary_region")]
    pub primary_region: String,

    /// Fallback region when the preferred one has no availability entry
    #[serde(default = "default_fallback_region")]
    pub fallback_region: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    30
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "pt-BR".to_string()
}

fn default_primary_region() -> String {
    "BR".to_string()
}

fn default_fallback_region() -> String {
    "US".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
