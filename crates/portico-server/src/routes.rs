//! HTTP routes for the portal server.
//!
//! Every route sits behind the [`GuardLayer`]. Public routes pass straight
//! through; the rest receive a [`Session`] in request extensions, extracted
//! here with the `Session` extractor. With the guard disabled no session is
//! attached and session-bound handlers answer 401.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};
use portico_auth::cookie::{clear_session_cookie, session_cookie};
use portico_auth::{GuardConfig, GuardLayer, RouteGuard, Session, TokenCodec};
use portico_rbac::{filter_visible, Module, Permission, PermissionMatrix};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::directory::UserDirectory;
use crate::error::ApiError;
use crate::records::RecordStore;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    /// Role → module permissions.
    pub matrix: Arc<PermissionMatrix>,
    /// Portal access decisions.
    pub guard: Arc<RouteGuard>,
    /// Session token codec.
    pub codec: Arc<TokenCodec>,
    /// Demo users.
    pub directory: Arc<UserDirectory>,
    /// Demo records.
    pub records: Arc<RecordStore>,
    /// Session cookie name.
    pub cookie_name: String,
}

impl AppState {
    /// State with the built-in matrix, portals, users, and records.
    pub fn standard() -> Self {
        Self {
            matrix: Arc::new(PermissionMatrix::standard()),
            guard: Arc::new(RouteGuard::default()),
            codec: Arc::new(TokenCodec::default()),
            directory: Arc::new(UserDirectory::new(
                crate::directory::DirectoryUser::demo_users(),
            )),
            records: Arc::new(RecordStore::seeded()),
            cookie_name: portico_auth::DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

/// Build the application router with the guard layer applied.
pub fn router(state: AppState, guard_config: GuardConfig) -> Router {
    let layer = GuardLayer::new(state.codec.clone(), state.guard.clone(), guard_config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", get(login_page))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/me", get(me))
        .route("/api/records/{module}", get(records))
        .route("/{portal}", get(portal_home))
        .route("/{portal}/{page}", get(portal_page))
        .route("/{portal}/modules/{module}", get(portal_module))
        .layer(layer)
        .with_state(state)
}

// ============================================================================
// Public routes
// ============================================================================

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Only reached with the guard disabled; the guard redirects `/` otherwise.
async fn root(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(state.guard.login_path())
}

async fn login_page(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "login": "/api/auth/login",
        "accounts": state.directory.accounts(),
    }))
}

/// Credentials posted to `/api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Successful login body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token, also set as a cookie.
    pub token: String,
    /// Role granted.
    pub role: portico_rbac::Role,
    /// Where the client should go next.
    pub redirect: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(user) = state.directory.authenticate(&request.email, &request.password) else {
        tracing::warn!(email = %request.email, "Login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    let (token, session) = state.codec.issue(&user.subject, user.role)?;
    let redirect = state
        .guard
        .home_for(session.role)
        .unwrap_or(state.guard.login_path())
        .to_string();
    let cookie = session_cookie(&state.cookie_name, &token, state.codec.ttl_secs());

    tracing::info!(subject = %session.subject, role = %session.role, "Login succeeded");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            token,
            role: session.role,
            redirect,
        }),
    ))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_session_cookie(&state.cookie_name))],
        Json(json!({ "status": "logged_out" })),
    )
}

// ============================================================================
// Session routes
// ============================================================================

async fn me(State(state): State<AppState>, session: Session) -> Json<Value> {
    let profile = state.matrix.profile(session.role);
    let user = state.directory.by_subject(&session.subject);
    Json(json!({
        "subject": session.subject,
        "name": user.map(|u| u.name.as_str()),
        "role": session.role,
        "role_label": session.role.label(),
        "external": session.role.is_external(),
        "data_scope": profile.data_scope,
        "modules": profile.modules,
        "home": state.guard.home_for(session.role),
        "expires_at": session.expires_at.to_rfc3339(),
    }))
}

async fn records(
    State(state): State<AppState>,
    session: Session,
    Path(module): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let module = parse_module(&module)?;
    if !state
        .matrix
        .has_permission(session.role, module, Permission::Read)
    {
        tracing::info!(subject = %session.subject, role = %session.role, %module, "Record access denied");
        return Err(ApiError::AccessDenied(module));
    }

    let scope = state.matrix.data_scope(session.role);
    let viewer = state.directory.viewer(&session.subject);
    let visible = filter_visible(scope, &viewer, state.records.records(module));

    Ok(Json(json!({
        "module": module,
        "data_scope": scope,
        "records": visible,
    })))
}

// ============================================================================
// Portal routes
// ============================================================================

async fn portal_home(
    State(state): State<AppState>,
    session: Session,
    Path(portal): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let path = format!("/{portal}");
    portal_descriptor(&state, &session, &portal, &path)
}

async fn portal_page(
    State(state): State<AppState>,
    session: Session,
    Path((portal, page)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let path = format!("/{portal}/{page}");
    portal_descriptor(&state, &session, &portal, &path)
}

async fn portal_module(
    State(state): State<AppState>,
    session: Session,
    Path((portal, module)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    ensure_portal(&state, &session, &portal)?;
    let module = parse_module(&module)?;
    if !state.matrix.can_access_module(session.role, module) {
        tracing::info!(subject = %session.subject, role = %session.role, %module, "Module access denied");
        return Err(ApiError::AccessDenied(module));
    }
    Ok(Json(json!({
        "portal": portal,
        "module": module,
        "role": session.role,
        "permissions": state.matrix.permissions_for(session.role, module),
    })))
}

fn portal_descriptor(
    state: &AppState,
    session: &Session,
    portal: &str,
    path: &str,
) -> Result<Json<Value>, ApiError> {
    ensure_portal(state, session, portal)?;
    Ok(Json(json!({
        "portal": portal,
        "path": path,
        "role": session.role,
        "modules": state.matrix.accessible_modules(session.role),
    })))
}

/// The portal must exist and admit the session's role.
///
/// Checked against the decoded path parameter, so it holds even for
/// request paths the guard saw in another spelling.
fn ensure_portal(state: &AppState, session: &Session, portal: &str) -> Result<(), ApiError> {
    let portals = state.guard.portals();
    if !portals.is_portal(portal) {
        return Err(ApiError::NotFound(format!("portal '{portal}'")));
    }
    if !portals.allows(session.role, portal) {
        tracing::info!(subject = %session.subject, role = %session.role, portal, "Portal access denied");
        return Err(ApiError::WrongPortal {
            portal: portal.to_string(),
            home: state.guard.home_for(session.role).map(str::to_string),
        });
    }
    Ok(())
}

fn parse_module(name: &str) -> Result<Module, ApiError> {
    name.parse()
        .map_err(|_| ApiError::NotFound(format!("module '{name}'")))
}
