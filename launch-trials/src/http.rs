//! HTTP implementation of [`OriginTrialsApi`].
//!
//! Each call is a single JSON `POST` to the origin trials API. The response
//! body is read in full and handed to the pure parsers in [`crate::api`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use launch_core::{ContinuityId, FeatureId, GateId};
use serde_json::json;

use crate::api::{
    parse_create_response, parse_verify_response, LaunchIssueOutcome, OriginTrialsApi,
    VerifyContinuityIssueResponse,
};
use crate::{TrialsConfig, TrialsError};

/// Origin trials client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpOriginTrialsClient {
    http: reqwest::Client,
    config: TrialsConfig,
}

impl HttpOriginTrialsClient {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    /// Returns [`TrialsError::Transport`] if the underlying HTTP client cannot
    /// be initialised (e.g. the TLS backend fails to load).
    pub fn new(config: TrialsConfig) -> Result<Self, TrialsError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &TrialsConfig {
        &self.config
    }

    async fn post(&self, method: &str, body: serde_json::Value) -> Result<String, TrialsError> {
        let url = self.config.endpoint(method);
        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%url, "sending origin trials request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "origin trials request failed");
            TrialsError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body_summary = summarize_response_body(&text);
            tracing::error!(
                %url,
                status = status.as_u16(),
                body_summary = %body_summary,
                "origin trials API error"
            );
            return Err(TrialsError::Status { status: status.as_u16(), body_summary });
        }

        Ok(text)
    }
}

#[async_trait]
impl OriginTrialsApi for HttpOriginTrialsClient {
    async fn verify_continuity_issue(
        &self,
        continuity_id: ContinuityId,
    ) -> Result<VerifyContinuityIssueResponse, TrialsError> {
        let body = self.post("verify", json!({ "issue_id": continuity_id })).await?;
        parse_verify_response(&body).inspect_err(|e| {
            tracing::warn!(%continuity_id, error = %e, "unexpected verify response");
        })
    }

    async fn create_launch_issue(
        &self,
        feature_id: FeatureId,
        gate_id: GateId,
        continuity_id: Option<ContinuityId>,
    ) -> Result<LaunchIssueOutcome, TrialsError> {
        let mut body = json!({ "feature_id": feature_id, "gate_id": gate_id });
        if let Some(continuity_id) = continuity_id {
            body["continuity_issue_id"] = json!(continuity_id);
        }
        let text = self.post("create", body).await?;
        parse_create_response(&text).inspect_err(|e| {
            tracing::warn!(%feature_id, %gate_id, error = %e, "unexpected create response");
        })
    }
}

/// Describe a response body without echoing it into the logs.
fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}
