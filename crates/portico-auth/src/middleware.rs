//! Tower route-guard middleware.
//!
//! `GuardLayer` and `GuardService` wrap any inner service with the portal
//! guard. Generic over `SessionValidator`, so any token scheme plugs in.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::{IntoResponse, Redirect};
use http::{HeaderValue, Request};
use tower::{Layer, Service};

use crate::cookie::{clear_session_cookie, find_cookie};
use crate::guard::{GuardDecision, RedirectReason, RouteGuard};
use crate::{AuthError, GuardConfig, SessionValidator};

/// Tower `Layer` that wraps services with the portal route guard.
#[derive(Clone)]
pub struct GuardLayer<V: SessionValidator> {
    validator: Arc<V>,
    guard: Arc<RouteGuard>,
    config: GuardConfig,
}

impl<V: SessionValidator> GuardLayer<V> {
    /// Create a new guard layer.
    pub fn new(validator: Arc<V>, guard: Arc<RouteGuard>, config: GuardConfig) -> Self {
        Self {
            validator,
            guard,
            config,
        }
    }
}

impl<V: SessionValidator, S> Layer<S> for GuardLayer<V> {
    type Service = GuardService<V, S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardService {
            inner,
            validator: self.validator.clone(),
            guard: self.guard.clone(),
            config: self.config.clone(),
        }
    }
}

/// Tower `Service` that applies the route guard before forwarding requests.
///
/// When a session is let through, the decoded `Session` is inserted into
/// request extensions where it's available to downstream handlers.
#[derive(Clone)]
pub struct GuardService<V: SessionValidator, S> {
    inner: S,
    validator: Arc<V>,
    guard: Arc<RouteGuard>,
    config: GuardConfig,
}

impl<V, S> Service<Request<Body>> for GuardService<V, S>
where
    V: SessionValidator,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let validator = self.validator.clone();
        let guard = self.guard.clone();
        let config = self.config.clone();

        Box::pin(async move {
            // Guard disabled
            if !config.enabled {
                let resp = inner
                    .call(req)
                    .await
                    .unwrap_or_else(|infallible| match infallible {});
                return Ok(resp.into_response());
            }

            let path = req.uri().path().to_string();
            if guard.is_public(&path) {
                let resp = inner
                    .call(req)
                    .await
                    .unwrap_or_else(|infallible| match infallible {});
                return Ok(resp.into_response());
            }

            let token = extract_token(&req, &config.cookie_name).map(str::to_string);
            let session = match token {
                Some(token) => validator.validate(&token).await,
                None => Err(AuthError::MissingToken),
            };

            match guard.evaluate(&path, session.as_ref()) {
                GuardDecision::Allow => {
                    if let Ok(session) = session {
                        req.extensions_mut().insert(session);
                    }
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                GuardDecision::Redirect { to, reason } => {
                    match (&session, reason) {
                        (Err(err), RedirectReason::InvalidToken) => {
                            log::warn!("Rejected session for {path}: {err}");
                        }
                        (Ok(s), RedirectReason::WrongPortal | RedirectReason::NonCanonicalPath) => {
                            log::info!(
                                "{} ({}) may not enter {path}, redirecting to {to}",
                                s.subject,
                                s.role
                            );
                        }
                        _ => log::debug!("Redirecting {path} to {to} ({reason:?})"),
                    }
                    Ok(redirect_response(&to, reason, &config.cookie_name))
                }
            }
        })
    }
}

/// Extract the session token from the session cookie or the
/// `Authorization: Bearer` header, in that order.
fn extract_token<'a>(req: &'a Request<Body>, cookie_name: &str) -> Option<&'a str> {
    find_cookie(req.headers(), cookie_name).or_else(|| extract_bearer_token(req))
}

/// Extract bearer token from the Authorization header.
fn extract_bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Build a 307 redirect, clearing the session cookie when it is stale.
fn redirect_response(
    location: &str,
    reason: RedirectReason,
    cookie_name: &str,
) -> axum::response::Response {
    let mut response = Redirect::temporary(location).into_response();

    if reason.clears_session() {
        if let Ok(value) = HeaderValue::from_str(&clear_session_cookie(cookie_name)) {
            response
                .headers_mut()
                .append(http::header::SET_COOKIE, value);
        }
    }

    response
}
