//! Edit-permission checks for feature entries.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use launch_core::Feature;

/// Header carrying the signed-in user's email, set by the fronting auth proxy.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The caller of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    /// Signed-in email, or `None` for an anonymous caller.
    pub email: Option<String>,
}

impl UserContext {
    /// An anonymous caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in caller.
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self { email: Some(email.into()) }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for UserContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_owned);
        Ok(Self { email })
    }
}

/// Decides whether a caller may edit a feature.
pub trait PermissionChecker: Send + Sync {
    /// Returns `true` if `user` may edit `feature`.
    fn can_edit(&self, user: &UserContext, feature: &Feature) -> bool;
}

/// Grants edit access to admins and to a feature's owners, editors and creator.
#[derive(Debug, Clone, Default)]
pub struct EditorPermissions {
    admins: Vec<String>,
}

impl EditorPermissions {
    /// Create a checker with the given admin emails.
    pub fn new<I, E>(admins: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        Self { admins: admins.into_iter().map(|e| e.as_ref().to_owned()).collect() }
    }
}

impl PermissionChecker for EditorPermissions {
    fn can_edit(&self, user: &UserContext, feature: &Feature) -> bool {
        let Some(email) = user.email.as_deref() else {
            return false;
        };
        let matches = |candidate: &String| candidate.eq_ignore_ascii_case(email);
        self.admins.iter().any(matches)
            || feature.owner_emails.iter().any(matches)
            || feature.editor_emails.iter().any(matches)
            || feature.creator_email.as_ref().is_some_and(matches)
    }
}
