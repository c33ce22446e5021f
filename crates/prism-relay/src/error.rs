use http::StatusCode;
use prism_core::HttpError;
use thiserror::Error;

use crate::protocol::ModelFailure;

/// Errors that terminate a relay request
///
/// Per-model upstream faults are not represented here: they are recovered
/// locally into a [`ModelFailure`] outcome slot and never interrupt sibling
/// dispatches. Only request-wide faults surface as `RelayError`.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Required request fields absent or empty
    #[error("Missing required fields: image and prompt")]
    MissingFields,

    /// One or more requested identifiers are not in the allow-list
    #[error("Invalid model(s) specified")]
    InvalidModels {
        /// The offending identifiers, in request order
        invalid: Vec<String>,
    },

    /// No upstream credential available in process configuration
    #[error("API key not configured. Please contact administrator.")]
    ApiKeyMissing,

    /// Every dispatched model failed
    #[error("All models failed")]
    AllModelsFailed {
        /// Per-model failure reasons, in request order
        failures: Vec<ModelFailure>,
    },

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HttpError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidModels { .. } => StatusCode::BAD_REQUEST,
            Self::ApiKeyMissing | Self::AllModelsFailed { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::MissingFields | Self::InvalidModels { .. } => "validation_error",
            Self::ApiKeyMissing => "configuration_error",
            Self::AllModelsFailed { .. } => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
