//! Origin trials API abstraction and response records.
//!
//! The gateway talks to the API only through [`OriginTrialsApi`], so tests can
//! substitute a recording fake for the HTTP client.

use async_trait::async_trait;
use launch_core::{ContinuityId, FeatureId, GateId, IssueId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::TrialsError;

/// Result of verifying a continuity issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct VerifyContinuityIssueResponse {
    /// Launch issue already associated with the continuity issue, if any.
    pub launch_issue_id: Option<IssueId>,
    /// Why verification failed, if it did.
    pub failed_reason: Option<String>,
}

impl VerifyContinuityIssueResponse {
    #[must_use]
    pub fn new(launch_issue_id: Option<IssueId>, failed_reason: Option<String>) -> Self {
        Self { launch_issue_id, failed_reason }
    }
}

/// Result of asking the API to create a launch issue.
///
/// Both fields may be set: the issue can be created while a follow-up step
/// upstream still fails.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct LaunchIssueOutcome {
    /// The created issue, if creation got that far.
    pub issue_id: Option<IssueId>,
    /// Non-empty when the upstream reports a failure.
    pub failed_reason: Option<String>,
}

impl LaunchIssueOutcome {
    #[must_use]
    pub fn new(issue_id: Option<IssueId>, failed_reason: Option<String>) -> Self {
        Self { issue_id, failed_reason }
    }

    /// The failure reason, if one was reported and is non-empty.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failed_reason.as_deref().filter(|r| !r.is_empty())
    }
}

/// Client for the origin trials security-review endpoints.
///
/// Implementations must be `Send + Sync` to be shared across request tasks.
/// No method retries; the first failure is returned.
#[async_trait]
pub trait OriginTrialsApi: Send + Sync {
    /// Verify a continuity issue and look up its launch issue.
    ///
    /// # Errors
    /// Returns [`TrialsError::Transport`] or [`TrialsError::Status`] if the
    /// API could not be reached, and [`TrialsError::Malformed`] if it answered
    /// with an unexpected payload.
    async fn verify_continuity_issue(
        &self,
        continuity_id: ContinuityId,
    ) -> Result<VerifyContinuityIssueResponse, TrialsError>;

    /// Create a security-review launch issue for a feature gate.
    ///
    /// # Errors
    /// Same as [`OriginTrialsApi::verify_continuity_issue`].
    async fn create_launch_issue(
        &self,
        feature_id: FeatureId,
        gate_id: GateId,
        continuity_id: Option<ContinuityId>,
    ) -> Result<LaunchIssueOutcome, TrialsError>;
}

/// Parse the body of a `:verify` response.
///
/// The body must be a JSON object with a `launch_issue_id` key (integer or
/// null). `failed_reason` is optional.
///
/// # Errors
/// Returns [`TrialsError::Malformed`] if the shape does not match.
pub fn parse_verify_response(body: &str) -> Result<VerifyContinuityIssueResponse, TrialsError> {
    let obj = parse_object(body)?;
    let launch_issue_id = required_i64(&obj, "launch_issue_id")?.map(IssueId);
    let failed_reason = nullable_string(&obj, "failed_reason")?;
    Ok(VerifyContinuityIssueResponse { launch_issue_id, failed_reason })
}

/// Parse the body of a `:create` response.
///
/// The body must be a JSON object with an `issue_id` key (integer or null).
/// `failed_reason` is optional, but a null `issue_id` must come with one.
///
/// # Errors
/// Returns [`TrialsError::Malformed`] if the shape does not match.
pub fn parse_create_response(body: &str) -> Result<LaunchIssueOutcome, TrialsError> {
    let obj = parse_object(body)?;
    let issue_id = required_i64(&obj, "issue_id")?.map(IssueId);
    let failed_reason = nullable_string(&obj, "failed_reason")?;
    let outcome = LaunchIssueOutcome { issue_id, failed_reason };
    if outcome.issue_id.is_none() && outcome.failure().is_none() {
        return Err(TrialsError::Malformed(
            "no issue_id and no failed_reason".to_owned(),
        ));
    }
    Ok(outcome)
}

fn parse_object(body: &str) -> Result<Map<String, Value>, TrialsError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(other) => Err(TrialsError::Malformed(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(TrialsError::Malformed(format!("invalid JSON: {e}"))),
    }
}

/// The key must be present; its value may be null.
fn required_i64(obj: &Map<String, Value>, key: &str) -> Result<Option<i64>, TrialsError> {
    match obj.get(key) {
        None => Err(TrialsError::Malformed(format!("missing key '{key}'"))),
        Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| TrialsError::Malformed(format!("'{key}' is not an integer"))),
    }
}

fn nullable_string(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, TrialsError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(TrialsError::Malformed(format!("'{key}' is not a string"))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_response_with_issue_parses() {
        let resp = match parse_verify_response(r#"{"launch_issue_id": 555}"#) {
            Ok(r) => r,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(resp, VerifyContinuityIssueResponse::new(Some(IssueId(555)), None));
    }

    #[test]
    fn verify_response_null_issue_with_reason_parses() {
        let body = r#"{"launch_issue_id": null, "failed_reason": "not a continuity issue"}"#;
        let resp = match parse_verify_response(body) {
            Ok(r) => r,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert!(resp.launch_issue_id.is_none());
        assert_eq!(resp.failed_reason.as_deref(), Some("not a continuity issue"));
    }

    #[test]
    fn verify_response_missing_key_is_malformed() {
        let err = parse_verify_response(r#"{"failed_reason": null}"#).err();
        assert!(
            matches!(err, Some(TrialsError::Malformed(ref m)) if m.contains("launch_issue_id")),
            "missing launch_issue_id must be malformed, got {err:?}"
        );
    }

    #[test]
    fn non_object_and_invalid_json_are_malformed() {
        for body in ["[]", "42", "\"ok\"", "not json", ""] {
            let result = parse_verify_response(body);
            assert!(
                matches!(result, Err(TrialsError::Malformed(_))),
                "{body:?} must be malformed"
            );
        }
    }

    #[test]
    fn wrongly_typed_fields_are_malformed() {
        assert!(parse_verify_response(r#"{"launch_issue_id": "555"}"#)
            .is_err_and(|e| e.is_malformed()));
        assert!(parse_create_response(r#"{"issue_id": 1, "failed_reason": 3}"#)
            .is_err_and(|e| e.is_malformed()));
    }

    #[test]
    fn create_response_success_and_partial_failure() {
        let ok = match parse_create_response(r#"{"issue_id": 555}"#) {
            Ok(o) => o,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(ok.issue_id, Some(IssueId(555)));
        assert!(ok.failure().is_none());

        let partial =
            match parse_create_response(r#"{"issue_id": 555, "failed_reason": "tracker quota exceeded"}"#) {
                Ok(o) => o,
                Err(e) => panic!("unexpected error: {e}"),
            };
        assert_eq!(partial.issue_id, Some(IssueId(555)));
        assert_eq!(partial.failure(), Some("tracker quota exceeded"));
    }

    #[test]
    fn create_response_failure_without_issue_parses() {
        let outcome = match parse_create_response(r#"{"issue_id": null, "failed_reason": "denied"}"#) {
            Ok(o) => o,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert!(outcome.issue_id.is_none());
        assert_eq!(outcome.failure(), Some("denied"));
    }

    #[test]
    fn create_response_without_issue_or_reason_is_malformed() {
        for body in [r#"{}"#, r#"{"issue_id": null}"#, r#"{"issue_id": null, "failed_reason": ""}"#] {
            assert!(
                parse_create_response(body).is_err_and(|e| e.is_malformed()),
                "{body} must be malformed"
            );
        }
    }

    #[test]
    fn empty_failed_reason_is_not_a_failure() {
        let outcome = LaunchIssueOutcome::new(Some(IssueId(1)), Some(String::new()));
        assert!(outcome.failure().is_none());
    }
}
