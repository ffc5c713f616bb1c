//! Axum route handlers for the security-review API.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use launch_core::{ContinuityId, CoreError, FeatureId, GateId, IdKind};
use launch_trials::{OriginTrialsApi, VerifyContinuityIssueResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{ApiError, UPSTREAM_MALFORMED},
    permissions::{PermissionChecker, UserContext},
    store::EntityStore,
};

// ── Shared state ─────────────────────────────────────────────────────────────

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub trials: Arc<dyn OriginTrialsApi>,
}

// ── Request / response types ──────────────────────────────────────────────────

/// Query string of `GET /api/v0/security-review`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyQuery {
    pub continuity_id: Option<String>,
}

impl VerifyQuery {
    /// Pick `continuity_id` out of decoded query pairs. When the key is
    /// repeated the first value wins.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let continuity_id = pairs
            .into_iter()
            .find(|(key, _)| key == "continuity_id")
            .map(|(_, value)| value);
        Self { continuity_id }
    }
}

/// Body of `POST /api/v0/security-review`.
///
/// Fields are kept as raw JSON and validated on access, because the handler
/// validates `gate_id` only after the permission check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateLaunchIssueRequest {
    pub feature_id: Option<Value>,
    pub gate_id: Option<Value>,
}

impl CreateLaunchIssueRequest {
    /// Read the request from a raw body.
    ///
    /// An empty or unparseable body is treated as an empty object, so the
    /// caller sees the first missing field.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidRequest`] if the body is valid JSON but not
    /// an object.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut obj)) => Ok(Self {
                feature_id: obj.remove("feature_id"),
                gate_id: obj.remove("gate_id"),
            }),
            Ok(Value::Null) | Err(_) => Ok(Self::default()),
            Ok(_) => Err(ApiError::InvalidRequest("Request body must be a JSON object.".to_owned())),
        }
    }

    /// The validated feature ID.
    ///
    /// # Errors
    /// Returns [`CoreError`] if the field is missing or not an integer.
    pub fn feature_id(&self) -> Result<FeatureId, CoreError> {
        FeatureId::from_json(self.feature_id.as_ref())
    }

    /// The validated gate ID.
    ///
    /// # Errors
    /// Returns [`CoreError`] if the field is missing or not an integer.
    pub fn gate_id(&self) -> Result<GateId, CoreError> {
        GateId::from_json(self.gate_id.as_ref())
    }
}

/// Confirmation body returned by `POST /api/v0/security-review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub message: String,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router over the given collaborators.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v0/security-review",
            get(verify_continuity_by_query).post(create_launch_issue),
        )
        .route("/api/v0/security-review/{continuity_id}", get(verify_continuity_by_path))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `GET /api/v0/security-review/{continuity_id}` — verify a continuity issue.
///
/// A path segment axum cannot decode (e.g. invalid UTF-8) is reported as an
/// invalid continuity ID.
///
/// # Errors
/// See [`verify_continuity`].
pub async fn verify_continuity_by_path(
    State(state): State<AppState>,
    continuity_id: Result<Path<String>, PathRejection>,
) -> Result<Json<VerifyContinuityIssueResponse>, ApiError> {
    let Path(continuity_id) = continuity_id.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable continuity ID path segment");
        invalid_continuity_id()
    })?;
    verify_continuity(&state, Some(&continuity_id)).await
}

/// `GET /api/v0/security-review?continuity_id=` — verify a continuity issue.
///
/// # Errors
/// See [`verify_continuity`].
pub async fn verify_continuity_by_query(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<VerifyContinuityIssueResponse>, ApiError> {
    let Query(pairs) = pairs.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable verify query string");
        invalid_continuity_id()
    })?;
    let query = VerifyQuery::from_pairs(pairs);
    verify_continuity(&state, query.continuity_id.as_deref()).await
}

fn invalid_continuity_id() -> ApiError {
    ApiError::from(CoreError::InvalidId { kind: IdKind::Continuity })
}

/// Validate a continuity ID and pass it to the origin trials API.
///
/// # Errors
/// Returns [`ApiError::InvalidRequest`] if the ID is absent or not an
/// integer, without calling upstream. Returns [`ApiError::Upstream`] if the
/// API is unreachable or answers with a malformed payload.
async fn verify_continuity(
    state: &AppState,
    raw: Option<&str>,
) -> Result<Json<VerifyContinuityIssueResponse>, ApiError> {
    let continuity_id = ContinuityId::parse(raw.unwrap_or_default())?;
    let resp = state.trials.verify_continuity_issue(continuity_id).await.map_err(|e| {
        tracing::warn!(%continuity_id, error = %e, "continuity verification failed");
        ApiError::from(e)
    })?;
    Ok(Json(resp))
}

/// `POST /api/v0/security-review` — create a security-review issue for a
/// feature gate.
///
/// Checks run in a fixed order and the first failure aborts: feature ID,
/// feature existence, existing launch issue, edit permission, gate ID, gate
/// existence. An issue ID returned upstream is persisted before any upstream
/// failure reason is reported, and stays persisted.
///
/// # Errors
/// - [`ApiError::InvalidRequest`] for missing or non-integer IDs, or a
///   feature that already has a launch issue.
/// - [`ApiError::NotFound`] if the feature or gate does not exist.
/// - [`ApiError::Forbidden`] if the caller may not edit the feature.
/// - [`ApiError::Upstream`] if the origin trials API fails or reports a
///   failure reason.
/// - [`ApiError::Store`] if loading or saving the feature fails.
pub async fn create_launch_issue(
    State(state): State<AppState>,
    user: UserContext,
    body: Bytes,
) -> Result<Json<SuccessMessage>, ApiError> {
    let request = CreateLaunchIssueRequest::from_body(&body)?;

    let feature_id = request.feature_id()?;
    let Some(mut feature) = state.store.get_feature(feature_id).await? else {
        return Err(ApiError::NotFound(format!("Feature {feature_id} not found")));
    };
    if feature.has_launch_issue() {
        return Err(ApiError::InvalidRequest(
            "Feature already has a security review issue.".to_owned(),
        ));
    }

    if !state.permissions.can_edit(&user, &feature) {
        tracing::info!(%feature_id, user = ?user.email, "edit permission denied");
        return Err(ApiError::Forbidden(
            "User does not have permission to edit this feature.".to_owned(),
        ));
    }

    let gate_id = request.gate_id()?;
    if state.store.get_gate(gate_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Gate {gate_id} not found")));
    }

    let outcome = state
        .trials
        .create_launch_issue(feature_id, gate_id, feature.continuity_id)
        .await
        .map_err(|e| {
            tracing::warn!(%feature_id, %gate_id, error = %e, "launch issue creation failed");
            ApiError::from(e)
        })?;

    if let Some(issue_id) = outcome.issue_id {
        feature.record_launch_issue(issue_id);
        state.store.put_feature(&feature).await?;
    }

    if let Some(reason) = outcome.failure() {
        tracing::warn!(
            %feature_id,
            %gate_id,
            issue_id = ?outcome.issue_id,
            reason,
            "origin trials API reported a failure"
        );
        return Err(ApiError::Upstream(reason.to_owned()));
    }

    let Some(issue_id) = outcome.issue_id else {
        return Err(ApiError::Upstream(UPSTREAM_MALFORMED.to_owned()));
    };

    tracing::info!(%feature_id, %gate_id, %issue_id, "security review issue created");
    Ok(Json(SuccessMessage { message: format!("Security review issue {issue_id} created") }))
}
