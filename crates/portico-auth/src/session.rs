//! Session identity and extraction helpers.

use axum::extract::FromRequestParts;
use chrono::{DateTime, Utc};
use http::request::Parts;
use portico_rbac::Role;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// The identity carried by a session token.
///
/// Stored in HTTP request extensions by the guard middleware once the
/// token has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Subject identifier of the signed-in user.
    #[serde(rename = "sub")]
    pub subject: String,
    /// The user's role.
    pub role: Role,
    /// When the session was created.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    /// When the session stops being accepted.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Seconds until expiry at `now`, zero once expired.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_parts(parts)
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Extract the `Session` from HTTP request `Parts`, if present.
pub fn session_from_parts(parts: &Parts) -> Option<&Session> {
    parts.extensions.get::<Session>()
}
