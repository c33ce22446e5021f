//! Wire format types for the relay surface and the upstream API

use serde::{Deserialize, Serialize};

/// MIME tag attached to the inline image payload
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

// -- Client-facing surface --

/// Generation request posted by the client
///
/// Missing string fields deserialize to empty values so the validation step
/// can reject them with the designated message instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    /// Base64-encoded image payload, relayed opaquely
    #[serde(default)]
    pub image: String,
    /// Prompt text sent alongside the image
    #[serde(default)]
    pub prompt: String,
    /// Single target model (degenerate fan-out of length one)
    #[serde(default)]
    pub model: Option<String>,
    /// Explicit fan-out list; takes precedence over `model`
    #[serde(default)]
    pub models: Option<Vec<String>>,
}

/// Response for the model listing route
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListResponse {
    /// The full allow-list, in declared order
    pub models: Vec<String>,
    /// The designated default identifier
    pub default_model: String,
}

/// Successful outcome for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResult {
    /// Model that produced this response
    pub model: String,
    /// Upstream response body, relayed without interpretation
    pub response: serde_json::Value,
}

/// Failed outcome for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFailure {
    /// Model whose dispatch failed
    pub model: String,
    /// Human-readable failure reason
    pub error: String,
}

/// Aggregated fan-out response for at least one success
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// Successful outcomes, in request order
    pub results: Vec<ModelResult>,
    /// Failures that occurred alongside successes, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ModelFailure>>,
}

// -- Upstream wire format --

/// Upstream `generateContent` request
#[derive(Debug, Clone, Serialize)]
pub struct GeminiRequest {
    /// Conversation contents
    pub contents: Vec<GeminiContent>,
}

/// Upstream content object
#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent {
    /// Content parts
    pub parts: Vec<GeminiPart>,
}

/// Individual part within an upstream content object
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeminiPart {
    /// Text content
    Text(String),
    /// Inline binary data (the image)
    InlineData(GeminiInlineData),
}

/// Inline binary data carried alongside the prompt
#[derive(Debug, Clone, Serialize)]
pub struct GeminiInlineData {
    /// MIME type of the payload
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

impl GeminiRequest {
    /// Build the single-content request carrying a prompt and an image
    #[must_use]
    pub fn new(prompt: &str, image: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::Text(prompt.to_owned()),
                    GeminiPart::InlineData(GeminiInlineData {
                        mime_type: IMAGE_MIME_TYPE.to_owned(),
                        data: image.to_owned(),
                    }),
                ],
            }],
        }
    }
}

/// Upstream error body, used to surface `error.message` on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct GeminiErrorBody {
    /// Error detail, when the upstream sent a structured body
    #[serde(default)]
    pub error: Option<GeminiErrorDetail>,
}

/// Error detail within an upstream error body
#[derive(Debug, Deserialize)]
pub struct GeminiErrorDetail {
    /// Human-readable upstream message
    pub message: String,
}
