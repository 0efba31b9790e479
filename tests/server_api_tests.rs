/// HTTP API tests for the backend router
/// Drives the axum router in-process with tower's oneshot
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bore_dashboard::error::WorkloadError;
use bore_dashboard::models::WorkloadMode;
use bore_dashboard::server::build_router;
use bore_dashboard::workload::{WorkloadController, WorkloadHandle, WorkloadLauncher};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct NullHandle;

impl WorkloadHandle for NullHandle {
    fn stop(&mut self) -> Result<(), WorkloadError> {
        Ok(())
    }

    fn describe(&self) -> String {
        "null workload".to_string()
    }
}

struct NullLauncher;

impl WorkloadLauncher for NullLauncher {
    fn launch(&self, _mode: WorkloadMode) -> Result<Box<dyn WorkloadHandle>, WorkloadError> {
        Ok(Box::new(NullHandle))
    }
}

struct BrokenLauncher;

impl WorkloadLauncher for BrokenLauncher {
    fn launch(&self, _mode: WorkloadMode) -> Result<Box<dyn WorkloadHandle>, WorkloadError> {
        Err(WorkloadError::LaunchFailed {
            program: "pseudocc".to_string(),
            reason: "No such file or directory".to_string(),
        })
    }
}

fn app_with(launcher: Arc<dyn WorkloadLauncher>) -> (Router, Arc<WorkloadController>) {
    let controller = Arc::new(WorkloadController::new(launcher));
    (build_router(Arc::clone(&controller)), controller)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_status_starts_idle() {
    eprintln!("\n=== TEST: GET /status Starts Idle ===");
    let (app, _) = app_with(Arc::new(NullLauncher));

    let (status, body) = get_json(&app, "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"isStressing": false, "boreEnabled": false}));
    println!("[TEST] ✓ Idle backend reports all-false status");
}

#[tokio::test]
async fn test_command_enable_bore_then_disable() {
    eprintln!("\n=== TEST: POST /command Enable Then Disable ===");
    let (app, controller) = app_with(Arc::new(NullLauncher));

    eprintln!("[TEST] Step 1: enable in bore mode");
    let (status, body) = post_raw(&app, "/command", r#"{"enabled": true, "mode": "bore"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "enabled": true, "mode": "bore"}));

    let (_, body) = get_json(&app, "/status").await;
    assert_eq!(body, json!({"isStressing": true, "boreEnabled": true}));

    eprintln!("[TEST] Step 2: disable");
    let (status, body) = post_raw(&app, "/command", r#"{"enabled": false, "mode": "bore"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, body) = get_json(&app, "/status").await;
    assert_eq!(body, json!({"isStressing": false, "boreEnabled": false}));
    assert!(controller.session_info().is_none());
    println!("[TEST] ✓ Command channel drives the session");
}

#[tokio::test]
async fn test_unknown_mode_is_normal() {
    eprintln!("\n=== TEST: Unknown Mode Normalized ===");
    let (app, controller) = app_with(Arc::new(NullLauncher));

    let (status, body) = post_raw(&app, "/command", r#"{"enabled": true, "mode": "turbo"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "normal");

    let (_, body) = get_json(&app, "/status").await;
    assert_eq!(body, json!({"isStressing": true, "boreEnabled": false}));
    controller.shutdown();
    println!("[TEST] ✓ Unknown mode treated as normal");
}

#[tokio::test]
async fn test_mode_match_is_exact() {
    eprintln!("\n=== TEST: Mode Match Is Exact ===");
    let (app, controller) = app_with(Arc::new(NullLauncher));

    for body in [
        r#"{"enabled": true, "mode": "BORE"}"#,
        r#"{"enabled": true, "mode": " bore "}"#,
        r#"{"enabled": true, "mode": "Bore"}"#,
    ] {
        eprintln!("[TEST] Posting {}", body);
        let (status, reply) = post_raw(&app, "/command", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["mode"], "normal");

        let (_, snapshot) = get_json(&app, "/status").await;
        assert_eq!(snapshot, json!({"isStressing": true, "boreEnabled": false}));
    }
    controller.shutdown();
    println!("[TEST] ✓ Only the exact \"bore\" tag selects the biased mode");
}

#[tokio::test]
async fn test_legacy_routes() {
    eprintln!("\n=== TEST: Legacy Routes ===");
    let (app, controller) = app_with(Arc::new(NullLauncher));

    let (status, body) = post_raw(&app, "/api/stress", r#"{"enabled": true, "mode": "normal"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], true);

    let (status, body) = get_json(&app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"isStressing": true, "boreEnabled": false}));

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["session"]["description"], "null workload");
    controller.shutdown();
    println!("[TEST] ✓ /api/status, /api/stress and /health served");
}

#[tokio::test]
async fn test_launch_failure_returns_error_body() {
    eprintln!("\n=== TEST: Launch Failure ===");
    let (app, _) = app_with(Arc::new(BrokenLauncher));

    let (status, body) = post_raw(&app, "/command", r#"{"enabled": true, "mode": "bore"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("pseudocc"));

    let (_, body) = get_json(&app, "/status").await;
    assert_eq!(body, json!({"isStressing": false, "boreEnabled": false}));
    println!("[TEST] ✓ Failed launch reported and controller left idle");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    eprintln!("\n=== TEST: Malformed Body ===");
    let (app, controller) = app_with(Arc::new(NullLauncher));

    let (status, body) = post_raw(&app, "/command", "{not json").await;
    assert!(status.is_client_error(), "got {}", status);
    assert_eq!(body["status"], "error");
    assert!(controller.session_info().is_none());
    println!("[TEST] ✓ Malformed JSON rejected without touching the session");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    eprintln!("\n=== TEST: CORS ===");
    let (app, _) = app_with(Arc::new(NullLauncher));

    let request = Request::get("/status")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    println!("[TEST] ✓ Cross-origin dashboards can poll");
}
