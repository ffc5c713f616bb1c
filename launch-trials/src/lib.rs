//! Client for the origin trials security-review API.
//!
//! Verifies continuity issues and creates launch (security-review) issues on
//! behalf of the gateway.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{LaunchIssueOutcome, OriginTrialsApi, VerifyContinuityIssueResponse};
pub use config::TrialsConfig;
pub use error::TrialsError;
pub use http::HttpOriginTrialsClient;
