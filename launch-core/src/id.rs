use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, IdKind};

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer value.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

integer_id!(
    /// Identifier of a feature entry.
    FeatureId
);

integer_id!(
    /// Identifier of a review gate attached to a feature.
    GateId
);

integer_id!(
    /// Identifier of an origin-trial continuity issue.
    ContinuityId
);

integer_id!(
    /// Identifier of a security-review issue in the issue tracker.
    IssueId
);

impl ContinuityId {
    /// Parse a continuity ID from a path or query parameter.
    ///
    /// Surrounding ASCII whitespace is ignored and a leading sign is accepted.
    ///
    /// # Errors
    /// Returns [`CoreError::MissingId`] for an empty string and
    /// [`CoreError::InvalidId`] if the value is not a base-10 integer.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(CoreError::MissingId { kind: IdKind::Continuity });
        }
        raw.trim_ascii()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CoreError::InvalidId { kind: IdKind::Continuity })
    }
}

impl FeatureId {
    /// Read a feature ID from a raw JSON body field.
    ///
    /// # Errors
    /// See [`integer_from_json`].
    pub fn from_json(value: Option<&Value>) -> Result<Self, CoreError> {
        integer_from_json(value, IdKind::Feature).map(Self)
    }
}

impl GateId {
    /// Read a gate ID from a raw JSON body field.
    ///
    /// # Errors
    /// See [`integer_from_json`].
    pub fn from_json(value: Option<&Value>) -> Result<Self, CoreError> {
        integer_from_json(value, IdKind::Gate).map(Self)
    }
}

/// Extract a JSON integer.
///
/// Only JSON numbers with an exact `i64` representation are accepted; strings,
/// floats (including `42.0`), booleans and containers are not integers.
///
/// # Errors
/// Returns [`CoreError::MissingId`] if the field is absent or `null`, and
/// [`CoreError::InvalidId`] for any non-integer value.
pub fn integer_from_json(value: Option<&Value>, kind: IdKind) -> Result<i64, CoreError> {
    match value {
        None | Some(Value::Null) => Err(CoreError::MissingId { kind }),
        Some(v) => v.as_i64().ok_or(CoreError::InvalidId { kind }),
    }
}
