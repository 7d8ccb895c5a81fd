//! Session and route-guard primitives for Portico.
//!
//! Provides:
//! - [`Session`] - identity decoded from a session token
//! - [`TokenCodec`] - reversible (NOT signed) session token encoding
//! - [`SessionValidator`] - trait for async token validation (swap in a real signer later)
//! - [`PortalMap`] / [`RouteGuard`] - the per-request portal access decision
//! - [`GuardLayer`] / [`GuardService`] - Tower middleware applying the guard
//! - [`GuardConfig`] - transport configuration for the middleware
//! - [`AuthError`] - token failures

pub mod cookie;
mod error;
pub mod guard;
mod middleware;
pub mod portal;
mod session;
pub mod token;

mod proptests;

pub use error::{AuthError, Error, Result};
pub use guard::{GuardDecision, RedirectReason, RouteGuard};
pub use middleware::{GuardLayer, GuardService};
pub use portal::PortalMap;
pub use session::{session_from_parts, Session};
pub use token::TokenCodec;

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "auth-token";

/// Configuration for the guard middleware.
#[derive(Clone, Debug)]
pub struct GuardConfig {
    /// Whether the guard is enabled. When false, all requests pass through.
    pub enabled: bool,
    /// Cookie carrying the session token.
    pub cookie_name: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

/// Trait for validating session tokens.
///
/// The middleware calls `validate()` with the raw token from the cookie or
/// bearer header and forwards the decoded [`Session`] on success.
pub trait SessionValidator: Send + Sync + 'static {
    /// Validate a token and return the session it carries.
    fn validate(
        &self,
        token: &str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Session, AuthError>> + Send + '_>>;
}
