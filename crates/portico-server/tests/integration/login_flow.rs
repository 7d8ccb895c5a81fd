//! Login, logout, and session introspection.

use http::StatusCode;
use portico_rbac::Role;
use serde_json::json;

use crate::common::{token_for, TestHarness};

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let harness = TestHarness::new();
    let response = harness
        .post_json(
            "/api/auth/login",
            json!({ "email": "sales.rep@portico.test", "password": "portico-demo" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["role"], "sales_rep");
    assert_eq!(response.json["redirect"], "/sales/dashboard");

    let token = response.json["token"].as_str().unwrap();
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 1);
    let cookie = cookies[0];
    assert!(cookie.starts_with(&format!("auth-token={token};")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=86400"));
}

#[tokio::test]
async fn test_login_token_opens_own_portal() {
    let harness = TestHarness::new();
    let token = harness.login("finance@portico.test").await;
    let response = harness.get_with_cookie("/finance/dashboard", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["role"], "finance_manager");
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let harness = TestHarness::new();
    let response = harness
        .post_json(
            "/api/auth/login",
            json!({ "email": "hr@portico.test", "password": "guess" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["error"]["category"], "authentication");
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let harness = TestHarness::new();
    let response = harness.post_json("/api/auth/logout", json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("auth-token=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_page_lists_accounts_without_passwords() {
    let harness = TestHarness::new();
    let response = harness.get("/login").await;
    assert_eq!(response.status, StatusCode::OK);
    let accounts = response.json["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), Role::ALL.len());
    assert!(!response.json.to_string().contains("portico-demo"));
}

#[tokio::test]
async fn test_me_reports_profile() {
    let harness = TestHarness::new();
    let token = harness.login("hr@portico.test").await;
    let response = harness.get_with_cookie("/api/me", &token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["subject"], "usr-hr");
    assert_eq!(response.json["name"], "Hana People");
    assert_eq!(response.json["role"], "hr_manager");
    assert_eq!(response.json["data_scope"], "department");
    assert_eq!(response.json["home"], "/hr/dashboard");
    assert_eq!(response.json["external"], false);
    assert_eq!(
        response.json["modules"],
        json!(["dashboard", "users", "hr", "reports"])
    );
}

#[tokio::test]
async fn test_me_for_unknown_subject() {
    let harness = TestHarness::new();
    let token = token_for("usr-ghost", Role::Vendor);
    let response = harness.get_with_cookie("/api/me", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json["name"].is_null());
    assert_eq!(response.json["data_scope"], "own");
    assert_eq!(response.json["external"], true);
}

#[tokio::test]
async fn test_me_marks_external_roles() {
    let harness = TestHarness::new();
    for (email, external) in [
        ("client@portico.test", true),
        ("vendor@portico.test", true),
        ("employee@portico.test", false),
        ("admin@portico.test", false),
    ] {
        let token = harness.login(email).await;
        let response = harness.get_with_cookie("/api/me", &token).await;
        assert_eq!(response.json["external"], external, "{email}");
    }
}
