//! Model-assisted shift extraction (Gemini)
//!
//! Sends the raw message to the Gemini `generateContent` endpoint with a
//! strict output contract: the reply must be a JSON array of
//! `{date, hall}` objects. Best-effort enrichment only, one attempt per
//! message, and every failure class collapses into
//! [`ModelOutcome::Unavailable`] so the caller can fall back to the
//! deterministic extractor.

use crate::extract::rules::title_case;
use crate::extract::{ModelExtract, ModelOutcome};
use crate::models::ShiftCandidate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini generateContent endpoint.
const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-pro:generateContent";

/// Gemini-backed extractor.
pub struct GeminiExtractor {
    http_client: Client,
    api_key: String,
    tracked_name: String,
    venues: Vec<String>,
}

impl GeminiExtractor {
    /// Create the extractor with a bounded per-request timeout.
    pub fn new(
        api_key: String,
        tracked_name: String,
        venues: Vec<String>,
        timeout: Duration,
    ) -> crate::Result<GeminiExtractor> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(crate::Error::Http)?;
        Ok(GeminiExtractor {
            http_client,
            api_key,
            tracked_name,
            venues,
        })
    }

    fn build_prompt(&self, text: &str) -> String {
        format!(
            "Extract all work shifts for '{}' from the following message.\n\
             Return ONLY a valid JSON array, where each object has:\n\
             - 'date': in YYYY-MM-DD format\n\
             - 'hall': one of: {}\n\
             If there are no matches, return an empty array [].\n\n\
             Message:\n{}",
            self.tracked_name,
            self.venues.join(", "),
            text
        )
    }

    async fn request(&self, text: &str) -> Result<Vec<ShiftCandidate>, String> {
        let url = format!("{}?key={}", GEMINI_API_URL, self.api_key);
        let payload = json!({
            "contents": [{ "parts": [{ "text": self.build_prompt(text) }] }]
        });

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("API returned status {}", response.status()));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed response body: {}", e))?;

        let raw = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim())
            .ok_or_else(|| "response carried no candidate text".to_string())?;

        let mut candidates: Vec<ShiftCandidate> = serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| format!("candidate text is not a shift array: {}", e))?;

        for candidate in &mut candidates {
            candidate.hall = title_case(&candidate.hall);
        }
        Ok(candidates)
    }
}

#[async_trait]
impl ModelExtract for GeminiExtractor {
    async fn extract(&self, text: &str) -> ModelOutcome {
        match self.request(text).await {
            Ok(candidates) => {
                debug!(count = candidates.len(), "model extraction succeeded");
                ModelOutcome::Entries(candidates)
            }
            Err(reason) => {
                warn!(%reason, "model extraction unavailable, using rule fallback");
                ModelOutcome::Unavailable
            }
        }
    }
}

/// Models sometimes wrap the array in a Markdown code fence despite the
/// instruction; tolerate that one deviation.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

// ============================================================================
// Gemini API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}
