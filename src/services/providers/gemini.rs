/// Gemini generative text provider
///
/// One `generateContent` call per recommendation request, with a JSON
/// response hint. Transport failures, timeouts and 5xx responses classify
/// as unavailable; 429 classifies as rate limited. No retries here; the
/// pipeline treats the call as non-idempotent.
use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::providers::GenerativeProvider,
};

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    /// Concatenates the text parts of the first candidate
    fn response_text(response: &GenerateContentResponse) -> Option<String> {
        let parts = &response.candidates.first()?.content.as_ref()?.parts;

        let mut out = String::new();
        for part in parts {
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }

        if out.trim().is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

/// Maps transport-level failures; timeouts count as unavailable
fn classify_transport(err: reqwest::Error) -> AppError {
    AppError::UpstreamUnavailable(err.to_string())
}

#[async_trait::async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited(format!(
                "Gemini API returned status {}",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::MalformedUpstreamResponse(format!(
                "failed to decode Gemini response envelope: {}",
                e
            ))
        })?;

        let text = Self::response_text(&payload).ok_or_else(|| {
            AppError::MalformedUpstreamResponse(
                "Gemini response contained no text part".to_string(),
            )
        })?;

        tracing::debug!(
            model = %self.model,
            response_len = text.len(),
            provider = "gemini",
            "Completion received"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_extracts_first_candidate() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "text": "{\"movies\":[]}" }]
                }
            }]
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            GeminiProvider::response_text(&response).as_deref(),
            Some("{\"movies\":[]}")
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "text": "{\"movies\":" }, { "text": "[]}" }]
                }
            }]
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            GeminiProvider::response_text(&response).as_deref(),
            Some("{\"movies\":[]}")
        );
    }

    #[test]
    fn test_response_text_missing_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(GeminiProvider::response_text(&response), None);
    }

    #[test]
    fn test_response_text_empty_parts() {
        let json = r#"{"candidates": [{ "content": { "parts": [] } }]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(GeminiProvider::response_text(&response), None);
    }

    #[test]
    fn test_envelope_tolerates_extra_fields() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "ok" }], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 10 }
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(GeminiProvider::response_text(&response).as_deref(), Some("ok"));
    }
}
