//! End-to-end tests for the JSON API.
//!
//! Each test builds the router over a fresh temp SQLite file and sends
//! requests with `tower::ServiceExt::oneshot`, without binding a port.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use bizman::server::{build_router, AppState};
use bizman::StoreConfig;

fn test_app(dir: &tempfile::TempDir) -> Router {
    let config = StoreConfig::new(dir.path().join("api.db"));
    build_router(Arc::new(AppState::new(config)))
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut request = Request::builder().method(method).uri(path);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, json)
}

#[tokio::test]
async fn test_empty_collections() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    for collection in ["Leads", "projects", "daily-updates", "equipment", "vendors"] {
        let (status, body) = send(&app, "GET", &format!("/api/{}", collection), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn test_create_and_list_lead() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let lead = json!({
        "id": "abc12345",
        "source": "Referral",
        "referral_source": "Friend",
        "cost": 0.0,
        "received_date": "2024-01-05",
        "status": "New",
    });
    let (status, body) = send(&app, "POST", "/api/Leads", Some(lead.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, lead);

    let (status, body) = send(&app, "GET", "/api/Leads", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([lead]));
}

#[tokio::test]
async fn test_create_generates_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/api/vendors",
        Some(json!({
            "name": "Acme Lumber",
            "service_type": "Materials",
            "rate_structure": "Net 30",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"].as_str().unwrap().len(), 8);
}

#[tokio::test]
async fn test_orphan_project_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, _) = send(
        &app,
        "POST",
        "/api/projects",
        Some(json!({
            "lead_id": "zzzz0000",
            "project_type": "Deck",
            "start_date": "2024-03-15",
            "contract_value": 5000,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/api/projects", None).await;
    assert_eq!(body[0]["lead_id"], "zzzz0000");
    assert_eq!(body[0]["contract_value"], 5000.0);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/api/equipment",
        Some(json!({ "type": "Excavator", "purchase_date": "2023-06-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("current_status"));

    let (_, body) = send(&app, "GET", "/api/equipment", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_null_field_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/api/vendors",
        Some(json!({ "name": "Acme", "service_type": null, "rate_structure": "Net 30" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("service_type"));

    let (_, body) = send(&app, "GET", "/api/vendors", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_boolean_and_unknown_fields_are_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/api/equipment",
        Some(json!({
            "type": "Excavator",
            "purchase_date": "2023-06-01",
            "current_status": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("current_status"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/vendors",
        Some(json!({
            "name": "Acme",
            "service_type": "Materials",
            "rate_structure": "Net 30",
            "phone": "555-0100",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("phone"));
}

#[tokio::test]
async fn test_unknown_collection_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "GET", "/api/invoices", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invoices"));
}

#[tokio::test]
async fn test_clear_collection() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "DELETE", "/api/vendors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "collection": "Vendors", "deleted": 0 }));

    for name in ["North Supply", "South Supply"] {
        let vendor = json!({ "name": name, "service_type": "Materials", "rate_structure": "Net 30" });
        send(&app, "POST", "/api/vendors", Some(vendor)).await;
    }
    let (_, body) = send(&app, "DELETE", "/api/vendors", None).await;
    assert_eq!(body["deleted"], 2);

    let (_, body) = send(&app, "GET", "/api/vendors", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_stats_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    for (project_type, start, value) in [
        ("Deck", "2024-03-15", 5000.0),
        ("Deck", "2024-03-20", 2500.0),
        ("Roof", "2024-01-02", 12000.0),
    ] {
        let project = json!({
            "lead_id": "l0000001",
            "project_type": project_type,
            "start_date": start,
            "contract_value": value,
        });
        let (status, _) = send(&app, "POST", "/api/projects", Some(project)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, stats) = send(&app, "GET", "/api/stats", None).await;
    assert_eq!(stats["projects"], 3);
    assert_eq!(stats["leads"], 0);

    let (_, flow) = send(&app, "GET", "/api/reports/cash-flow", None).await;
    assert_eq!(
        flow,
        json!([
            { "month": "2024-01", "contract_value": 12000.0 },
            { "month": "2024-03", "contract_value": 7500.0 },
        ])
    );

    let (_, types) = send(&app, "GET", "/api/reports/project-types", None).await;
    assert_eq!(types[0]["project_type"], "Deck");
    assert_eq!(types[0]["projects"], 2);
    assert_eq!(types[1]["total"], 12000.0);
}
