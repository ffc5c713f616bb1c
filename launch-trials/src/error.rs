//! Error types for the origin trials client.

/// Errors that can occur while talking to the origin trials API.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TrialsError {
    /// The request could not be sent or the response body could not be read.
    #[error("origin trials transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success HTTP status.
    #[error("origin trials API returned HTTP {status} ({body_summary})")]
    Status { status: u16, body_summary: String },

    /// The API answered 2xx but the payload did not have the expected shape.
    #[error("malformed origin trials response: {0}")]
    Malformed(String),
}

impl TrialsError {
    /// Returns `true` if the upstream answered with an unexpected payload,
    /// as opposed to failing to answer at all.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, TrialsError::Malformed(_))
    }
}

impl From<reqwest::Error> for TrialsError {
    fn from(e: reqwest::Error) -> Self {
        TrialsError::Transport(e.to_string())
    }
}
