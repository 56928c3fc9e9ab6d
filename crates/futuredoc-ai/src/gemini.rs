//! Gemini `generateContent` client.
//!
//! Sends the document inline (base64) with a fixed system instruction and a
//! response schema, then parses the candidate text as an [`AnalysisResult`].

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futuredoc_core::{
    AnalysisResult, FACTS_MAX_ITEMS, MediaType, SUMMARY_MAX_WORDS, analysis_response_schema,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::prompt::{SYSTEM_INSTRUCTION, USER_INSTRUCTION};
use crate::{AnalysisClient, AnalysisError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Checked on every call; `None` or blank fails before any request is sent.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// No timeout unless set.
    pub timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

// ── Wire types ──

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Build a client. The base URL should have no trailing slash; one is trimmed if present.
    pub fn new(config: GeminiConfig) -> Result<Self, AnalysisError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(
        &self,
        file_bytes: &[u8],
        media_type: MediaType,
    ) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;

        let payload = build_request(file_bytes, media_type);
        let url = self.endpoint();
        info!(
            model = %self.model,
            media_type = %media_type,
            bytes = file_bytes.len(),
            "requesting document analysis"
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                body: service_error_message(&body),
            });
        }

        let result = parse_response(&body)?;
        if result.exceeds_requested_bounds() {
            warn!(
                summary_words = result.summary_word_count(),
                facts = result.facts.len(),
                max_words = SUMMARY_MAX_WORDS,
                max_facts = FACTS_MAX_ITEMS,
                "analysis exceeds requested size limits"
            );
        }
        info!(facts = result.facts.len(), "analysis complete");
        Ok(result)
    }
}

/// Build the `generateContent` request body for one document.
pub fn build_request(file_bytes: &[u8], media_type: MediaType) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": SYSTEM_INSTRUCTION }]
        },
        "contents": [{
            "role": "user",
            "parts": [
                {
                    "inlineData": {
                        "mimeType": media_type.as_mime(),
                        "data": STANDARD.encode(file_bytes),
                    }
                },
                { "text": USER_INSTRUCTION }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": analysis_response_schema(),
        }
    })
}

/// Extract the candidate text from a response body and parse it.
///
/// Text parts of the first candidate are concatenated. A body with no text
/// is [`AnalysisError::EmptyResponse`]; text that is not the two-field shape
/// is [`AnalysisError::Malformed`].
pub fn parse_response(body: &str) -> Result<AnalysisResult, AnalysisError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    debug!(chars = text.len(), "received analysis text");
    Ok(serde_json::from_str(text.trim())?)
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn service_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
