//! Route guard behavior through the full router.

use axum::body::Body;
use http::{Request, StatusCode};
use portico_rbac::Role;
use portico_server::PorticoConfig;

use crate::common::{expired_token, token_for, TestHarness};

#[tokio::test]
async fn test_public_routes_need_no_session() {
    let harness = TestHarness::new();
    assert_eq!(harness.get("/health").await.status, StatusCode::OK);
    assert_eq!(harness.get("/login").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_redirects_to_login() {
    let harness = TestHarness::new();
    let response = harness.get("/sales/dashboard").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/login"));
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_shared_api_route_needs_session() {
    let harness = TestHarness::new();
    let response = harness.get("/api/me").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_expired_token_redirects_and_clears_cookie() {
    let harness = TestHarness::new();
    let token = expired_token("usr-sales-rep", Role::SalesRep);
    let response = harness.get_with_cookie("/sales/dashboard", &token).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/login"));
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_malformed_token_redirects_to_login() {
    let harness = TestHarness::new();
    let response = harness.get_with_cookie("/hr/dashboard", "not-a-token").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_wrong_portal_redirects_to_default_route() {
    let harness = TestHarness::new();
    let token = token_for("usr-sales-rep", Role::SalesRep);
    let response = harness.get_with_cookie("/finance/invoices", &token).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/sales/dashboard"));
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_encoded_portal_segment_redirects_to_default_route() {
    let harness = TestHarness::new();
    let token = token_for("usr-sales-rep", Role::SalesRep);
    for path in [
        "/%66inance/ledger",
        "/%66inance",
        "/%61dmin",
        "/%46inance/modules/finance",
        "/%73ales/leads",
    ] {
        let response = harness.get_with_cookie(path, &token).await;
        assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.location(), Some("/sales/dashboard"), "{path}");
        assert!(response.set_cookies().is_empty(), "{path}");
    }
}

#[tokio::test]
async fn test_encoded_portal_segment_never_reaches_handler() {
    let harness = TestHarness::new();
    let token = token_for("usr-admin", Role::SuperAdmin);
    let response = harness.get_with_cookie("/%66inance/ledger", &token).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/admin/dashboard"));
    assert_eq!(
        harness.get_with_cookie("/finance/ledger", &token).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_encoded_portal_segment_without_session_goes_to_login() {
    let harness = TestHarness::new();
    let response = harness.get("/%66inance/ledger").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_super_admin_enters_any_portal() {
    let harness = TestHarness::new();
    let token = token_for("usr-admin", Role::SuperAdmin);
    for path in ["/admin/dashboard", "/vendor/orders", "/hr"] {
        let response = harness.get_with_cookie(path, &token).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_root_redirects_home() {
    let harness = TestHarness::new();
    let token = token_for("usr-client", Role::Client);
    let response = harness.get_with_cookie("/", &token).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/client/dashboard"));
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let harness = TestHarness::new();
    let token = token_for("usr-vendor", Role::Vendor);
    let request = Request::get("/vendor/dashboard")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(harness.send(request).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cookie_wins_over_bearer() {
    let harness = TestHarness::new();
    let cookie_token = token_for("usr-sales-rep", Role::SalesRep);
    let bearer_token = token_for("usr-admin", Role::SuperAdmin);
    let request = Request::get("/finance/dashboard")
        .header(http::header::COOKIE, format!("auth-token={cookie_token}"))
        .header(http::header::AUTHORIZATION, format!("Bearer {bearer_token}"))
        .body(Body::empty())
        .unwrap();
    let response = harness.send(request).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/sales/dashboard"));
}

#[tokio::test]
async fn test_configured_login_path_and_cookie() {
    let mut config = PorticoConfig::default();
    config.guard.login_path = "/signin".to_string();
    config.session.cookie_name = "sid".to_string();
    let harness = TestHarness::with_config(config);

    let response = harness.get("/employee/dashboard").await;
    assert_eq!(response.location(), Some("/signin"));

    let token = token_for("usr-employee", Role::Employee);
    let request = Request::get("/employee/dashboard")
        .header(http::header::COOKIE, format!("sid={token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(harness.send(request).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_disabled_guard_passes_through() {
    let mut config = PorticoConfig::default();
    config.guard.enabled = false;
    let harness = TestHarness::with_config(config);

    let response = harness.get("/finance/dashboard").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = harness.get("/").await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/login"));
}
