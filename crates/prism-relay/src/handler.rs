//! Axum route handlers for the relay surface

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use prism_core::HttpError;

use crate::error::RelayError;
use crate::models::{DEFAULT_MODEL, SUPPORTED_MODELS};
use crate::protocol::{GenerateRequest, GenerateResponse, ModelListResponse};
use crate::state::RelayState;

/// Build the relay router with all endpoints
///
/// `GET /generate` lists the allow-list, `POST /generate` runs a fan-out,
/// `OPTIONS /generate` answers 200; any other verb answers 405.
#[must_use]
pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route(
            "/generate",
            routing::get(list_models).post(generate).options(options_ok),
        )
        .with_state(state)
}

/// Handle bare `OPTIONS /generate`
///
/// Real preflights carry request headers and are answered by the CORS layer
/// before reaching the router; plain OPTIONS probes still get 200, not 405.
async fn options_ok() -> http::StatusCode {
    http::StatusCode::OK
}

/// Handle `GET /generate`
async fn list_models() -> Response {
    let response = ModelListResponse {
        models: SUPPORTED_MODELS.iter().map(|model| (*model).to_owned()).collect(),
        default_model: DEFAULT_MODEL.to_owned(),
    };

    Json(response).into_response()
}

/// Handle `POST /generate`
async fn generate(
    State(state): State<RelayState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    // Body decode faults still answer with a JSON error body
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            let body = serde_json::json!({
                "error": rejection.body_text(),
                "type": "invalid_request_error",
            });
            return (rejection.status(), Json(body)).into_response();
        }
    };

    match state.generate(&request).await {
        Ok(outcome) => {
            let errors = (!outcome.failures.is_empty()).then_some(outcome.failures);
            let response = GenerateResponse {
                success: true,
                results: outcome.results,
                errors,
            };
            Json(response).into_response()
        }
        Err(e) => error_to_response(&e),
    }
}

/// Convert a relay error to its JSON error response
fn error_to_response(error: &RelayError) -> Response {
    let status = error.status_code();

    let body = match error {
        RelayError::InvalidModels { invalid } => serde_json::json!({
            "error": error.client_message(),
            "invalidModels": invalid,
            "supportedModels": SUPPORTED_MODELS,
        }),
        RelayError::AllModelsFailed { failures } => serde_json::json!({
            "error": error.client_message(),
            "errors": failures,
        }),
        RelayError::Internal(_) => serde_json::json!({
            "error": error.client_message(),
            "type": error.error_type(),
        }),
        RelayError::MissingFields | RelayError::ApiKeyMissing => serde_json::json!({
            "error": error.client_message(),
        }),
    };

    (status, Json(body)).into_response()
}
