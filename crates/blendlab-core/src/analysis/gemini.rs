// Gemini `generateContent` backend.
//
// The key travels in the `x-goog-api-key` header, never in the URL, so
// transport errors cannot echo it back.

use super::TextGenerator;
use crate::config::Settings;
use crate::credential::mask;
use crate::error::BlendError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated. Empty when there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Result<Self, BlendError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| BlendError::Service(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, api_key: &str, prompt: &str) -> Result<String, BlendError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "calling Gemini");

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                BlendError::Service(format!("could not reach the Gemini API: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            BlendError::Service(format!("failed to read Gemini response: {}", e.without_url()))
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<GeminiError>(&body) {
                Ok(err) => match err.error.status {
                    Some(code) => format!("{} ({code})", err.error.message),
                    None => err.error.message,
                },
                Err(_) => brief_body(&body, status),
            };
            // Some proxies echo request headers into error bodies.
            let message = if api_key.is_empty() {
                message
            } else {
                message.replace(api_key, &mask(api_key))
            };
            return Err(BlendError::Service(format!(
                "Gemini API returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| BlendError::Service(format!("malformed Gemini response: {e}")))?;

        Ok(parsed.text())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Longest slice of a non-JSON error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// A short, single-line rendering of an unstructured error body.
fn brief_body(body: &str, status: reqwest::StatusCode) -> String {
    let text = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return status.canonical_reason().unwrap_or("no details").to_string();
    }
    if text.chars().count() <= MAX_ERROR_BODY_CHARS {
        return text;
    }
    let cut: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{cut}…")
}
