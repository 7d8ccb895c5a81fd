//! Auth-specific error types.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use portico_rbac::Role;

/// Result type alias for portico-auth operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while validating a session token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No session cookie or bearer token present.
    #[error("missing session token")]
    MissingToken,

    /// Token could not be decoded into a session.
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// Token expiry has passed.
    #[error("session has expired")]
    Expired,

    /// A session could not be encoded into a token.
    #[error("failed to encode session: {0}")]
    Encoding(String),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidFormat(_) | AuthError::Expired
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = serde_json::json!({
            "error": {
                "category": "authentication",
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Errors in guard configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error from portico-rbac
    #[error("RBAC error: {0}")]
    Rbac(#[from] portico_rbac::Error),

    /// A role's default route points outside that role's portals.
    #[error("default route '{route}' for role '{role}' is outside its portals")]
    RedirectOutsidePortal {
        /// Role whose redirect is misconfigured.
        role: Role,
        /// The offending route.
        route: String,
    },
}
