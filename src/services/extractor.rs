/// Recovers the suggestion payload from raw generative output
///
/// The model is asked for bare JSON but routinely wraps it in markdown
/// fences or surrounds it with prose. Extraction is a dedicated step with
/// an explicit failure mode instead of letting a parse error escape from
/// deeper in the pipeline.
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::Suggestion,
};

const ERROR_DETAIL_MAX: usize = 200;

/// Parses raw response text into the usable suggestion list.
///
/// Unparsable text is `MalformedUpstreamResponse`. A parsed payload whose
/// `movies` key is absent, not an array, or empty is `NoSuggestions`, as is
/// a list where every element lacked a usable title. Elements without a
/// title are dropped silently; later duplicates of an earlier title
/// (case-insensitive) are dropped as well.
pub fn extract_suggestions(raw: &str) -> AppResult<Vec<Suggestion>> {
    let cleaned = strip_code_fences(raw);
    let payload = parse_json(&cleaned)
        .ok_or_else(|| AppError::MalformedUpstreamResponse(truncate(raw)))?;

    let movies = match payload.get("movies").and_then(Value::as_array) {
        Some(movies) if !movies.is_empty() => movies,
        _ => return Err(AppError::NoSuggestions),
    };

    let mut seen_titles: Vec<String> = Vec::new();
    let mut suggestions = Vec::new();
    for element in movies {
        let Some(suggestion) = suggestion_from_value(element) else {
            tracing::debug!(?element, "Dropping suggestion without a usable title");
            continue;
        };

        let key = suggestion.title.to_lowercase();
        if seen_titles.contains(&key) {
            continue;
        }
        seen_titles.push(key);
        suggestions.push(suggestion);
    }

    if suggestions.is_empty() {
        return Err(AppError::NoSuggestions);
    }

    Ok(suggestions)
}

/// Removes every ``` marker, together with an attached language tag
pub(crate) fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];

        // A language tag is an alphanumeric run that ends the line, as in
        // "```json\n". Anything else after the marker is payload.
        let tag_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        let after_tag = &rest[tag_len..];
        if tag_len > 0 && (after_tag.is_empty() || after_tag.starts_with('\n')) {
            rest = after_tag;
        }
    }

    out.push_str(rest);
    out
}

fn parse_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    // Second chance for leading/trailing prose: first '{' to last '}'.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

fn suggestion_from_value(value: &Value) -> Option<Suggestion> {
    let title = value.get("title")?.as_str()?.trim();
    if title.is_empty() {
        return None;
    }

    let year = value.get("year").and_then(|y| {
        y.as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .or_else(|| y.as_str().and_then(|s| s.trim().parse().ok()))
    });

    Some(Suggestion {
        title: title.to_string(),
        year,
    })
}

fn truncate(raw: &str) -> String {
    let mut detail: String = raw.chars().take(ERROR_DETAIL_MAX).collect();
    if raw.chars().count() > ERROR_DETAIL_MAX {
        detail.push_str("...");
    }
    detail
}
