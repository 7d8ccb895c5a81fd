//! Module permissions and data scoping on `/api/records`.

use http::StatusCode;
use portico_rbac::Role;
use serde_json::Value;

use crate::common::{token_for, TestHarness};

fn record_ids(json: &Value) -> Vec<String> {
    json["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_assigned_scope_limits_sales_rep() {
    let harness = TestHarness::new();
    let token = harness.login("sales.rep@portico.test").await;
    let response = harness.get_with_cookie("/api/records/crm", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["data_scope"], "assigned");
    assert_eq!(record_ids(&response.json), vec!["crm-1", "crm-2"]);
}

#[tokio::test]
async fn test_department_scope_for_sales_manager() {
    let harness = TestHarness::new();
    let token = harness.login("sales.manager@portico.test").await;
    let response = harness.get_with_cookie("/api/records/crm", &token).await;
    assert_eq!(record_ids(&response.json), vec!["crm-1", "crm-2", "crm-3"]);
}

#[tokio::test]
async fn test_global_scope_sees_everything() {
    let harness = TestHarness::new();
    let token = harness.login("admin@portico.test").await;
    let response = harness.get_with_cookie("/api/records/crm", &token).await;
    assert_eq!(record_ids(&response.json).len(), 4);
}

#[tokio::test]
async fn test_own_scope_for_client_invoices() {
    let harness = TestHarness::new();
    let token = harness.login("client@portico.test").await;
    let response = harness.get_with_cookie("/api/records/finance", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(record_ids(&response.json), vec!["fin-1"]);
}

#[tokio::test]
async fn test_module_without_read_is_denied() {
    let harness = TestHarness::new();
    let token = harness.login("sales.rep@portico.test").await;
    let response = harness.get_with_cookie("/api/records/finance", &token).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json["error"]["category"], "authorization");
    assert_eq!(
        response.json["error"]["message"],
        "access denied to module 'finance'"
    );
}

#[tokio::test]
async fn test_unknown_subject_with_department_scope_sees_nothing_foreign() {
    let harness = TestHarness::new();
    let token = token_for("usr-ghost", Role::HrManager);
    let response = harness.get_with_cookie("/api/records/hr", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(record_ids(&response.json).is_empty());
}

#[tokio::test]
async fn test_portal_module_page_respects_matrix() {
    let harness = TestHarness::new();
    let token = harness.login("employee@portico.test").await;

    let allowed = harness
        .get_with_cookie("/employee/modules/projects", &token)
        .await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.json["permissions"], serde_json::json!(["read"]));

    let denied = harness
        .get_with_cookie("/employee/modules/finance", &token)
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}
