//! Gemini `generateContent` client and wire types.
//!
//! Requests are stateless: the service keeps no session, so every call
//! carries the full system instruction, profile context, and (for chat)
//! conversation history. The `GenerativeModel` trait is the seam the
//! action handlers depend on; `MockModel` stands in during tests.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const API_KEY_FALLBACK_ENV: &str = "GOOGLE_API_KEY";

/// Optional override for the REST endpoint base.
pub const API_BASE_ENV: &str = "GEMINI_API_BASE";

// ══════════════════════════════════════════════════════════════════
// Wire types (REST camelCase)
// ══════════════════════════════════════════════════════════════════

/// Inline binary payload: base64 data plus its mime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

/// One content part: either text or inline binary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Inline JPEG part from base64 bytes (data-URI prefix already stripped).
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self::Inline {
            inline_data: Blob {
                mime_type: "image/jpeg".into(),
                data: data.into(),
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Inline { .. } => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

/// One conversational turn: a role plus its parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user".into(),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: "model".into(),
            parts,
        }
    }
}

/// Scalar generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// System instruction wrapper (the API wants parts, not a bare string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

/// Full request payload for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub system_instruction: SystemInstruction,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts.
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

// ══════════════════════════════════════════════════════════════════
// Errors and the model seam
// ══════════════════════════════════════════════════════════════════

/// Errors from a single generateContent call. Handlers convert every
/// variant into a localized fallback reply; nothing here crashes a flow.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("no API key set (GEMINI_API_KEY or GOOGLE_API_KEY)")]
    MissingApiKey,
    #[error("cannot reach Gemini at {0}")]
    Connection(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("Gemini API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse Gemini response: {0}")]
    ResponseParsing(String),
    #[error("Gemini returned an empty completion")]
    EmptyResponse,
}

/// Seam the action handlers call through. One method, stateless per call.
pub trait GenerativeModel: Send + Sync {
    fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String, GeminiError>;
}

// ══════════════════════════════════════════════════════════════════
// GeminiClient
// ══════════════════════════════════════════════════════════════════

/// HTTP client for the Gemini REST API.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Build a client from the environment: `GEMINI_API_KEY` (fallback
    /// `GOOGLE_API_KEY`) and optional `GEMINI_API_BASE`.
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = non_empty_env(API_KEY_ENV)
            .or_else(|| non_empty_env(API_KEY_FALLBACK_ENV))
            .ok_or(GeminiError::MissingApiKey)?;
        let base_url =
            non_empty_env(API_BASE_ENV).unwrap_or_else(|| crate::config::GEMINI_BASE_URL.into());
        Ok(Self::new(&api_key, &base_url, crate::config::REQUEST_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.base_url, model_path)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String, GeminiError> {
        let url = self.endpoint_for_model(model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    GeminiError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    GeminiError::Timeout(self.timeout_secs)
                } else {
                    GeminiError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| GeminiError::ResponseParsing(e.to_string()))?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}

// ══════════════════════════════════════════════════════════════════
// MockModel: configurable stand-in for tests
// ══════════════════════════════════════════════════════════════════

enum MockOutcome {
    Reply(String),
    FailConnection,
    FailEmpty,
}

/// In-memory `GenerativeModel` returning a fixed outcome and recording
/// every request it receives.
pub struct MockModel {
    outcome: MockOutcome,
    requests: std::sync::Mutex<Vec<GenerateRequest>>,
}

impl MockModel {
    pub fn replying(text: &str) -> Self {
        Self::with_outcome(MockOutcome::Reply(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_outcome(MockOutcome::FailConnection)
    }

    pub fn empty() -> Self {
        Self::with_outcome(MockOutcome::FailEmpty)
    }

    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// All requests seen so far, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl GenerativeModel for MockModel {
    fn generate(&self, _model: &str, request: &GenerateRequest) -> Result<String, GeminiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.outcome {
            MockOutcome::Reply(text) => Ok(text.clone()),
            MockOutcome::FailConnection => {
                Err(GeminiError::Connection("mock endpoint".into()))
            }
            MockOutcome::FailEmpty => Err(GeminiError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_part_serializes_flat() {
        let json = serde_json::to_string(&Part::text("hello")).unwrap();
        assert_eq!(json, r#"{"text":"hello"}"#);
    }

    #[test]
    fn inline_part_serializes_camel_case() {
        let json = serde_json::to_string(&Part::jpeg("aGVsbG8=")).unwrap();
        assert_eq!(
            json,
            r#"{"inlineData":{"mimeType":"image/jpeg","data":"aGVsbG8="}}"#
        );
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = GenerateRequest {
            system_instruction: SystemInstruction::new("be helpful"),
            contents: vec![Content::user(vec![Part::text("hi")])],
            generation_config: GenerationConfig {
                temperature: 0.4,
                max_output_tokens: 2048,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"maxOutputTokens\":2048"));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn response_text_joins_candidate_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text(), "Hello world");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn client_trims_trailing_slash_and_builds_endpoint() {
        let client = GeminiClient::new("k", "https://example.test/v1beta/", 30);
        assert_eq!(client.base_url(), "https://example.test/v1beta");
        assert_eq!(
            client.endpoint_for_model("gemini-3-pro-preview"),
            "https://example.test/v1beta/models/gemini-3-pro-preview:generateContent"
        );
        assert_eq!(
            client.endpoint_for_model("models/gemini-3-pro-preview"),
            "https://example.test/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn mock_returns_configured_reply_and_records_request() {
        let mock = MockModel::replying("a reply");
        let request = GenerateRequest {
            system_instruction: SystemInstruction::new("sys"),
            contents: vec![Content::user(vec![Part::text("q")])],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 64,
            },
        };
        let reply = mock.generate("any-model", &request).unwrap();
        assert_eq!(reply, "a reply");
        assert_eq!(mock.requests().len(), 1);
        assert_eq!(mock.requests()[0], request);
    }

    #[test]
    fn mock_failure_modes() {
        let request = GenerateRequest {
            system_instruction: SystemInstruction::new("sys"),
            contents: vec![],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 1,
            },
        };
        assert!(matches!(
            MockModel::failing().generate("m", &request),
            Err(GeminiError::Connection(_))
        ));
        assert!(matches!(
            MockModel::empty().generate("m", &request),
            Err(GeminiError::EmptyResponse)
        ));
    }
}
