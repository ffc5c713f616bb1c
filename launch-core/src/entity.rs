use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ContinuityId, FeatureId, GateId, IssueId};

/// A web-platform feature proposal tracked through its launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Feature {
    /// Unique identifier for this feature.
    pub id: FeatureId,
    /// Human-readable feature name.
    pub name: String,
    /// Users who own the feature entry.
    #[serde(default)]
    pub owner_emails: Vec<String>,
    /// Users granted edit access besides the owners.
    #[serde(default)]
    pub editor_emails: Vec<String>,
    /// The user who created the entry, if known.
    #[serde(default)]
    pub creator_email: Option<String>,
    /// Cross-reference to an origin-trial continuity issue.
    #[serde(default)]
    pub continuity_id: Option<ContinuityId>,
    /// The security-review issue created for this feature's launch.
    #[serde(default)]
    pub launch_issue_id: Option<IssueId>,
    /// When this entry was last modified.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Feature {
    /// Create a feature with no owners, continuity issue or launch issue.
    pub fn new(id: FeatureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner_emails: Vec::new(),
            editor_emails: Vec::new(),
            creator_email: None,
            continuity_id: None,
            launch_issue_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Returns `true` if a security-review issue was already recorded.
    #[must_use]
    pub fn has_launch_issue(&self) -> bool {
        self.launch_issue_id.is_some()
    }

    /// Record the security-review issue created for this feature.
    pub fn record_launch_issue(&mut self, issue_id: IssueId) {
        self.launch_issue_id = Some(issue_id);
        self.updated_at = Utc::now();
    }
}

/// An approval checkpoint in a feature's review workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Gate {
    /// Unique identifier for this gate.
    pub id: GateId,
    /// The feature this gate belongs to.
    pub feature_id: FeatureId,
    /// Review type code (privacy, security, API owners, ...).
    #[serde(default)]
    pub gate_type: i32,
    /// Current review state code.
    #[serde(default)]
    pub state: i32,
}

impl Gate {
    /// Create a gate for the given feature.
    #[must_use]
    pub fn new(id: GateId, feature_id: FeatureId, gate_type: i32) -> Self {
        Self { id, feature_id, gate_type, state: 0 }
    }
}
