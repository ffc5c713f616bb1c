//! Core types for the launch-review gateway.
//!
//! Defines the feature and gate entities, the integer identifiers used on
//! the wire, and the validation rules for those identifiers.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Feature, Gate};
pub use error::{CoreError, IdKind};
pub use id::{ContinuityId, FeatureId, GateId, IssueId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_messages_match_api_wording() {
        let cases = [
            (CoreError::MissingId { kind: IdKind::Continuity }, "No continuity ID specified."),
            (CoreError::InvalidId { kind: IdKind::Continuity }, "Invalid continuity ID."),
            (CoreError::MissingId { kind: IdKind::Feature }, "No feature specified."),
            (CoreError::InvalidId { kind: IdKind::Feature }, "Invalid feature ID."),
            (CoreError::MissingId { kind: IdKind::Gate }, "No gate specified."),
            (CoreError::InvalidId { kind: IdKind::Gate }, "Invalid gate ID."),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn core_error_kind_returns_identifier_kind() {
        assert_eq!(CoreError::InvalidId { kind: IdKind::Gate }.kind(), IdKind::Gate);
        assert_eq!(CoreError::MissingId { kind: IdKind::Feature }.kind(), IdKind::Feature);
    }

    #[test]
    fn new_feature_has_no_launch_issue() {
        let feature = Feature::new(FeatureId(42), "WebGPU");
        assert!(!feature.has_launch_issue());
        assert!(feature.continuity_id.is_none());
        assert!(feature.owner_emails.is_empty());
    }

    #[test]
    fn record_launch_issue_sets_id_and_bumps_timestamp() {
        let mut feature = Feature::new(FeatureId(42), "WebGPU");
        let before = feature.updated_at;
        feature.record_launch_issue(IssueId(555));
        assert_eq!(feature.launch_issue_id, Some(IssueId(555)));
        assert!(feature.has_launch_issue());
        assert!(feature.updated_at >= before, "updated_at must not move backwards");
    }

    #[test]
    fn feature_deserializes_with_optional_fields_omitted() {
        let raw = r#"{"id": 7, "name": "Popover", "continuity_id": 123}"#;
        let feature: Feature = match serde_json::from_str(raw) {
            Ok(f) => f,
            Err(e) => panic!("invalid feature JSON: {e}"),
        };
        assert_eq!(feature.id, FeatureId(7));
        assert_eq!(feature.continuity_id, Some(ContinuityId(123)));
        assert!(feature.launch_issue_id.is_none());
        assert!(feature.editor_emails.is_empty());
    }

    #[test]
    fn gate_deserializes_with_defaults() {
        let raw = r#"{"id": 3, "feature_id": 7}"#;
        let gate: Gate = match serde_json::from_str(raw) {
            Ok(g) => g,
            Err(e) => panic!("invalid gate JSON: {e}"),
        };
        assert_eq!(gate, Gate::new(GateId(3), FeatureId(7), 0));
    }
}
