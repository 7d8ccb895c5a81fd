//! Common test utilities for Portico server integration tests.

use axum::body::Body;
use axum::Router;
use http::{HeaderMap, Request, StatusCode};
use portico_auth::TokenCodec;
use portico_rbac::Role;
use portico_server::directory::DEMO_PASSWORD;
use portico_server::{PorticoConfig, Server};
use serde_json::Value;
use tower::ServiceExt;

/// A response with its body collected.
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body parsed as JSON; `Value::Null` when empty or not JSON.
    pub json: Value,
}

impl TestResponse {
    /// The `Location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// All `Set-Cookie` header values.
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

/// Test harness wrapping a configured router.
pub struct TestHarness {
    /// The guarded application.
    pub app: Router,
}

impl TestHarness {
    /// Harness over the default configuration.
    pub fn new() -> Self {
        Self::with_config(PorticoConfig::default())
    }

    /// Harness over a custom configuration.
    pub fn with_config(config: PorticoConfig) -> Self {
        let server = Server::new(config).expect("valid config");
        Self {
            app: server.router(),
        }
    }

    /// Send a request and collect the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// GET without credentials.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// GET with the session cookie.
    pub async fn get_with_cookie(&self, path: &str, token: &str) -> TestResponse {
        let request = Request::get(path)
            .header(http::header::COOKIE, format!("auth-token={token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a JSON body.
    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::post(path)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Log in as a demo user and return the issued token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .post_json(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": DEMO_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login as {email}");
        response.json["token"].as_str().unwrap().to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A token for `subject` with `role`, bypassing the directory.
pub fn token_for(subject: &str, role: Role) -> String {
    TokenCodec::default().issue(subject, role).unwrap().0
}

/// A token that expired an hour ago.
pub fn expired_token(subject: &str, role: Role) -> String {
    let issued = chrono::Utc::now() - chrono::TimeDelta::hours(25);
    TokenCodec::default().issue_at(subject, role, issued).unwrap().0
}
