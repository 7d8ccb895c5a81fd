//! Error types for portico-server

use std::path::{Path, PathBuf};

use axum::Json;
use axum::response::{IntoResponse, Redirect, Response};
use http::StatusCode;
use portico_auth::AuthError;
use portico_rbac::Module;
use thiserror::Error;

/// Result type alias for portico-server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in portico-server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error tied to a file path
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error from portico-auth
    #[error("Auth error: {0}")]
    Auth(#[from] portico_auth::Error),

    /// Error from portico-rbac
    #[error("RBAC error: {0}")]
    Rbac(#[from] portico_rbac::Error),

    /// Session token error
    #[error("Token error: {0}")]
    Token(#[from] AuthError),

    /// Server failed to bind or run
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl Error {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error tied to `path`.
    pub fn io_with_path(source: std::io::Error, path: &Path) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Email/password pair not found in the directory.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The role lacks the permission the handler needs.
    #[error("access denied to module '{0}'")]
    AccessDenied(Module),

    /// The role may not enter the portal. Responds with a redirect to
    /// `home` when the role has one, 403 otherwise.
    #[error("portal '{portal}' is not available to this role")]
    WrongPortal {
        /// Requested portal segment, as decoded by the router.
        portal: String,
        /// Default route for the caller's role.
        home: Option<String>,
    },

    /// No such portal, module, or page.
    #[error("not found: {0}")]
    NotFound(String),

    /// Session could not be established or read.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::AccessDenied(_) | ApiError::WrongPortal { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Auth(e) if e.is_client_error() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn category(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials | ApiError::Auth(_) => "authentication",
            ApiError::AccessDenied(_) | ApiError::WrongPortal { .. } => "authorization",
            ApiError::NotFound(_) => "not_found",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::WrongPortal {
            home: Some(home), ..
        } = &self
        {
            return Redirect::temporary(home).into_response();
        }
        let body = serde_json::json!({
            "error": {
                "category": self.category(),
                "message": self.to_string(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}
