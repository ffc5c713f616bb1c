//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use launch_core::CoreError;
use launch_trials::TrialsError;
use serde_json::json;

use crate::store::StoreError;

/// Message returned when the origin trials API cannot be reached.
pub const UPSTREAM_UNAVAILABLE: &str = "Error obtaining origin trial data from API";

/// Message returned when the origin trials API answers with an unexpected payload.
pub const UPSTREAM_MALFORMED: &str = "Malformed response from origin trials API";

/// Errors that can occur during gateway request handling.
///
/// Every variant aborts the request; the `Display` output is the message
/// returned to the caller.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request is missing a field, malformed, or conflicts with state.
    #[error("{0}")]
    InvalidRequest(String),

    /// The caller may not edit the target feature.
    #[error("{0}")]
    Forbidden(String),

    /// A referenced feature or gate does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The origin trials API failed or reported a failure.
    #[error("{0}")]
    Upstream(String),

    /// The entity store failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

impl From<TrialsError> for ApiError {
    fn from(e: TrialsError) -> Self {
        if e.is_malformed() {
            ApiError::Upstream(UPSTREAM_MALFORMED.to_owned())
        } else {
            ApiError::Upstream(UPSTREAM_UNAVAILABLE.to_owned())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Store(e) => {
                tracing::error!(error = %e, "entity store failure");
                "Internal storage error".to_owned()
            }
            other => other.to_string(),
        };
        (status, Json(json!({"error": message}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launch_core::IdKind;

    #[test]
    fn api_error_status_codes_map_correctly() {
        let cases = [
            (ApiError::InvalidRequest("x".to_owned()), StatusCode::BAD_REQUEST),
            (ApiError::Forbidden("x".to_owned()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (ApiError::Upstream("x".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Store(StoreError::Poisoned), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn core_errors_become_bad_requests_with_their_message() {
        let err = ApiError::from(CoreError::InvalidId { kind: IdKind::Gate });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid gate ID.");
    }

    #[test]
    fn trials_errors_pick_message_by_kind() {
        let transport = ApiError::from(TrialsError::Transport("refused".to_owned()));
        assert_eq!(transport.to_string(), UPSTREAM_UNAVAILABLE);

        let status = ApiError::from(TrialsError::Status { status: 502, body_summary: String::new() });
        assert_eq!(status.to_string(), UPSTREAM_UNAVAILABLE);

        let malformed = ApiError::from(TrialsError::Malformed("missing key".to_owned()));
        assert_eq!(malformed.to_string(), UPSTREAM_MALFORMED);
        assert_eq!(malformed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
