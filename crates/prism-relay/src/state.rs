//! Relay state and the multi-model fan-out

use std::sync::Arc;

use futures_util::future;
use prism_config::RelayConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::RelayError;
use crate::models::{self, DEFAULT_MODEL};
use crate::protocol::{GeminiErrorBody, GeminiRequest, GenerateRequest, ModelFailure, ModelResult};

/// Default upstream Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Environment variable consulted when the config carries no key
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Shared state for relay route handlers
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<RelayStateInner>,
}

struct RelayStateInner {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

/// Settled outcomes of one fan-out, in request order
#[derive(Debug)]
pub struct AggregateOutcome {
    /// Outcomes for models that responded successfully
    pub results: Vec<ModelResult>,
    /// Outcomes for models that failed
    pub failures: Vec<ModelFailure>,
}

impl RelayState {
    /// Build relay state from configuration
    ///
    /// The credential is resolved once here: an explicit config value wins,
    /// then the `GEMINI_API_KEY` environment variable. Empty values count as
    /// unset; absence is surfaced per request, not at startup.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().is_empty())
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|value| !value.is_empty())
                    .map(SecretString::from)
            });

        Self {
            inner: Arc::new(RelayStateInner {
                client: Client::new(),
                base_url,
                api_key,
            }),
        }
    }

    /// Run one generation fan-out
    ///
    /// Validates the request, requires the credential, resolves the target
    /// models, dispatches one upstream call per model concurrently, and
    /// aggregates the settled outcomes preserving request order. No outcome
    /// is reported until every dispatched call has settled.
    ///
    /// # Errors
    ///
    /// Returns an error for missing fields, a missing credential (before the
    /// allow-list is consulted or anything is dispatched), identifiers
    /// outside the allow-list, or when every dispatched model failed.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<AggregateOutcome, RelayError> {
        if request.image.is_empty() || request.prompt.is_empty() {
            return Err(RelayError::MissingFields);
        }

        // The configuration fault outranks model validation
        let Some(ref api_key) = self.inner.api_key else {
            tracing::error!("upstream API key not found in configuration or environment");
            return Err(RelayError::ApiKeyMissing);
        };

        let targets = resolve_target_models(request)?;

        tracing::info!(models = ?targets, "dispatching generation fan-out");

        let body = GeminiRequest::new(&request.prompt, &request.image);
        let calls = targets.iter().map(|model| self.generate_one(model, &body, api_key));
        let settled = future::join_all(calls).await;

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (model, outcome) in targets.iter().zip(settled) {
            match outcome {
                Ok(response) => results.push(ModelResult {
                    model: model.clone(),
                    response,
                }),
                Err(error) => {
                    tracing::warn!(model = %model, error = %error, "model dispatch failed");
                    failures.push(ModelFailure {
                        model: model.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            succeeded = results.len(),
            total = targets.len(),
            "fan-out settled"
        );

        if results.is_empty() {
            return Err(RelayError::AllModelsFailed { failures });
        }

        Ok(AggregateOutcome { results, failures })
    }

    /// Issue one upstream `generateContent` call
    ///
    /// Faults are returned as values so one model's failure can never cancel
    /// or delay its siblings.
    async fn generate_one(
        &self,
        model: &str,
        body: &GeminiRequest,
        api_key: &SecretString,
    ) -> Result<serde_json::Value, String> {
        let url = self.generate_url(model, api_key.expose_secret());

        let response = self
            .inner
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("upstream request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorBody>(&text)
                .ok()
                .and_then(|parsed| parsed.error)
                .map_or_else(|| format!("upstream returned {status}"), |detail| detail.message);
            return Err(message);
        }

        response
            .json()
            .await
            .map_err(|e| format!("failed to parse upstream response: {e}"))
    }

    /// Build the `generateContent` endpoint URL for a model
    fn generate_url(&self, model: &str, api_key: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{model}:generateContent?key={api_key}")
    }
}

/// Resolve the target model list for a request
///
/// An explicit non-empty `models` list wins, then the single `model` field,
/// then the process default. Any entry outside the allow-list rejects the
/// whole request; filtering is never used to silently drop bad entries.
/// Duplicates are permitted (each produces its own outcome slot).
///
/// # Errors
///
/// Returns `RelayError::InvalidModels` naming every unsupported identifier.
fn resolve_target_models(request: &GenerateRequest) -> Result<Vec<String>, RelayError> {
    let targets: Vec<String> = match (&request.models, &request.model) {
        (Some(models), _) if !models.is_empty() => models.clone(),
        (_, Some(model)) => vec![model.clone()],
        _ => vec![DEFAULT_MODEL.to_owned()],
    };

    let invalid: Vec<String> = targets
        .iter()
        .filter(|model| !models::is_supported(model))
        .cloned()
        .collect();

    if !invalid.is_empty() {
        return Err(RelayError::InvalidModels { invalid });
    }

    Ok(targets)
}
