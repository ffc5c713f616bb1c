//! HTTP gateway for feature launch security reviews.
//!
//! Verifies origin-trial continuity issues and creates security-review
//! launch issues for feature gates through the origin trials API.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod permissions;
pub mod routes;
pub mod store;
