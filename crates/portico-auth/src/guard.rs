//! The per-request portal access decision.
//!
//! [`RouteGuard::evaluate`] is a pure function of the request path and the
//! outcome of token validation:
//!
//! 1. public route → allow
//! 2. no token → redirect to login
//! 3. invalid or expired token → redirect to login
//! 4. portal the role may not enter → redirect to the role's default route,
//!    or to login when the role has no usable default
//! 5. percent-encoded portal segment → same as 4; routers decode path
//!    parameters, so `/%66inance` must not slip past as a non-portal path
//! 6. otherwise → allow
//!
//! Every denial is a redirect. Paths outside all portals (`/api/...`) only
//! need a valid session; the bare root sends the user to their landing page.

use portico_rbac::Role;

use crate::portal::{portal_segment, PortalMap};
use crate::{AuthError, Session};

/// Default login route.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Routes reachable without a session.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &[
    "/login",
    "/api/auth",
    "/health",
    "/static",
    "/favicon.ico",
];

/// Why a request was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No session token was presented.
    MissingToken,
    /// The token failed to decode or has expired.
    InvalidToken,
    /// The role may not enter the requested portal.
    WrongPortal,
    /// The portal segment is percent-encoded and cannot be checked as written.
    NonCanonicalPath,
    /// The role has no default route inside its own portals.
    NoDefaultRoute,
    /// The root path sends users to their landing page.
    Home,
}

impl RedirectReason {
    /// Whether the stale session cookie should be cleared with the redirect.
    pub fn clears_session(&self) -> bool {
        matches!(self, RedirectReason::InvalidToken)
    }
}

/// Outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through.
    Allow,
    /// Send the client elsewhere.
    Redirect {
        /// Target location.
        to: String,
        /// Why.
        reason: RedirectReason,
    },
}

impl GuardDecision {
    /// Whether the request is let through.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Redirect target, if redirecting.
    pub fn location(&self) -> Option<&str> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Redirect { to, .. } => Some(to.as_str()),
        }
    }
}

/// Decides whether a session may reach a path.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    portals: PortalMap,
    public_routes: Vec<String>,
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(PortalMap::standard())
    }
}

impl RouteGuard {
    /// Create a guard over `portals` with the default public routes.
    pub fn new(portals: PortalMap) -> Self {
        Self {
            portals,
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|s| (*s).to_string()).collect(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    /// Replace the public route prefixes.
    pub fn with_public_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the login route. It is always public.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// The portal layout.
    pub fn portals(&self) -> &PortalMap {
        &self.portals
    }

    /// The login route.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Public route prefixes.
    pub fn public_routes(&self) -> &[String] {
        &self.public_routes
    }

    /// Whether `path` is reachable without a session.
    ///
    /// Prefixes match whole segments: `/login` covers `/login/reset` but
    /// not `/loginx`.
    pub fn is_public(&self, path: &str) -> bool {
        matches_prefix(path, &self.login_path)
            || self.public_routes.iter().any(|p| matches_prefix(path, p))
    }

    /// Where `role` lands by default, if that route is inside its portals.
    pub fn home_for(&self, role: Role) -> Option<&str> {
        self.portals.safe_default_route(role)
    }

    /// Decide what to do with a request for `path`.
    ///
    /// `session` is the outcome of token validation; use
    /// [`AuthError::MissingToken`] when no token was presented.
    pub fn evaluate(&self, path: &str, session: Result<&Session, &AuthError>) -> GuardDecision {
        if self.is_public(path) {
            return GuardDecision::Allow;
        }

        let session = match session {
            Ok(session) => session,
            Err(AuthError::MissingToken) => {
                return self.to_login(RedirectReason::MissingToken);
            }
            Err(_) => return self.to_login(RedirectReason::InvalidToken),
        };

        let Some(segment) = portal_segment(path) else {
            return self.to_home(session.role, RedirectReason::Home);
        };

        if segment.contains('%') {
            return self.to_home(session.role, RedirectReason::NonCanonicalPath);
        }

        if !self.portals.is_portal(segment) || self.portals.allows(session.role, segment) {
            return GuardDecision::Allow;
        }

        self.to_home(session.role, RedirectReason::WrongPortal)
    }

    fn to_login(&self, reason: RedirectReason) -> GuardDecision {
        GuardDecision::Redirect {
            to: self.login_path.clone(),
            reason,
        }
    }

    fn to_home(&self, role: Role, reason: RedirectReason) -> GuardDecision {
        match self.home_for(role) {
            Some(route) => GuardDecision::Redirect {
                to: route.to_string(),
                reason,
            },
            None => self.to_login(RedirectReason::NoDefaultRoute),
        }
    }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}
