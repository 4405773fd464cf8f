//! HTTP error mapping
//!
//! Converts reqwest failures and non-success responses into [`ItError`].

use it_core::ItError;

/// Longest response body excerpt kept in an error message
const MAX_BODY_EXCERPT: usize = 200;

/// Map a reqwest error raised before or while reading a response
pub fn from_reqwest(path: &str, err: reqwest::Error) -> ItError {
    if err.is_decode() {
        return ItError::Decode(format!("{}: {}", path, err));
    }
    if let Some(status) = err.status() {
        return ItError::from_status(status.as_u16(), path, err.to_string());
    }
    if err.is_builder() {
        return ItError::Internal(format!("could not build request for {}: {}", path, err));
    }
    ItError::Transport(format!("{}: {}", path, err))
}

/// Map a non-success status and its body
pub fn from_response(status: u16, path: &str, body: &str) -> ItError {
    ItError::from_status(status, path, summarize_body(body))
}

/// Pull a message out of a JSON error body, or fall back to a trimmed excerpt
fn summarize_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "errors"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) => return s.clone(),
                Some(serde_json::Value::Null) | None => continue,
                Some(other) => return other.to_string(),
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let mut excerpt: String = trimmed.chars().take(MAX_BODY_EXCERPT).collect();
    if trimmed.chars().count() > MAX_BODY_EXCERPT {
        excerpt.push('…');
    }
    excerpt
}
