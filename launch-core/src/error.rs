/// Which identifier a [`CoreError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum IdKind {
    /// An origin-trial continuity issue.
    Continuity,
    /// A feature entry.
    Feature,
    /// A review gate.
    Gate,
}

impl IdKind {
    fn missing_message(self) -> &'static str {
        match self {
            IdKind::Continuity => "No continuity ID specified.",
            IdKind::Feature => "No feature specified.",
            IdKind::Gate => "No gate specified.",
        }
    }

    fn invalid_message(self) -> &'static str {
        match self {
            IdKind::Continuity => "Invalid continuity ID.",
            IdKind::Feature => "Invalid feature ID.",
            IdKind::Gate => "Invalid gate ID.",
        }
    }
}

/// Errors produced by the `launch-core` crate.
///
/// The `Display` output is the message shown to API callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The identifier was absent, null or empty.
    #[error("{}", kind.missing_message())]
    MissingId { kind: IdKind },

    /// The identifier was present but is not an integer.
    #[error("{}", kind.invalid_message())]
    InvalidId { kind: IdKind },
}

impl CoreError {
    /// The identifier kind this error is about.
    #[must_use]
    pub fn kind(&self) -> IdKind {
        match self {
            CoreError::MissingId { kind } | CoreError::InvalidId { kind } => *kind,
        }
    }
}
