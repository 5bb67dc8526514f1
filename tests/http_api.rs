// tests/http_api.rs

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower::ServiceExt;

use mediops::executor::Execute;
use mediops::router::{DelegationResult, Route};
use mediops::server::{config_error_router, create_router, AppState};
use mediops::{ChatSession, Department, Result};

struct FixedRouter(DelegationResult);

#[async_trait]
impl Route for FixedRouter {
    async fn route(&self, _input: &str) -> Result<DelegationResult> {
        Ok(self.0.clone())
    }
}

struct CountingExecutor {
    reply: String,
    calls: AtomicUsize,
}

#[async_trait]
impl Execute for CountingExecutor {
    async fn execute(&self, _department: Department, _context: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Holds the turn inside routing until released
struct GatedRouter {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl Route for GatedRouter {
    async fn route(&self, input: &str) -> Result<DelegationResult> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(DelegationResult {
            target: Department::Scheduling,
            context: input.to_string(),
            reason: "appointment booking".into(),
        })
    }
}

fn test_app(target: Department) -> (axum::Router, Arc<CountingExecutor>) {
    let router = Arc::new(FixedRouter(DelegationResult {
        target,
        context: "Register patient John Doe".into(),
        reason: "patient registration".into(),
    }));
    let executor = Arc::new(CountingExecutor {
        reply: "Patient registered.".into(),
        calls: AtomicUsize::new(0),
    });
    let session = ChatSession::new(router, executor.clone()).with_handoff_delay(Duration::ZERO);

    let app = create_router(AppState {
        session: Arc::new(session),
        model: "test-model".into(),
    });
    (app, executor)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_chat(message: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "message": message }).to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_chat_turn_with_specialist() {
    let (app, executor) = test_app(Department::Admission);

    let response = app.clone().oneshot(post_chat("Register patient John Doe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["active"], "admission");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["delegation"], true);
    assert_eq!(messages[1]["department"], "admission");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[2]["department"], "admission");
    assert_eq!(messages[2]["body"], "Patient registered.");
    assert_eq!(executor.calls.load(Ordering::SeqCst), 1);

    // Welcome + the three appended messages
    let response = app.oneshot(get("/api/messages")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 4);
    assert_eq!(body["busy"], false);
    assert_eq!(body["active"], "admission");
    assert!(body.get("processing_step").is_none());
}

#[tokio::test]
async fn test_chat_turn_stays_central() {
    let (app, executor) = test_app(Department::Central);

    let response = app.oneshot(post_chat("hello there")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["department"], "central");
    assert_eq!(messages[2]["body"], mediops::session::CLARIFICATION_MESSAGE);
    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let (app, executor) = test_app(Department::Billing);

    let response = app.clone().oneshot(post_chat("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert_eq!(body["error_code"], "BAD_REQUEST");

    let response = app.oneshot(get("/api/messages")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_status_and_departments() {
    let (app, _) = test_app(Department::Central);

    let response = app.clone().oneshot(get("/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["busy"], false);
    assert_eq!(body["active"], "central");

    let response = app.oneshot(get("/api/departments")).await.unwrap();
    let body = body_json(response).await;
    let departments = body.as_array().unwrap();
    assert_eq!(departments.len(), 5);
    assert_eq!(departments[0]["key"], "central");
    assert_eq!(departments[4]["name"], "Billing & Finance Agent");
}

#[tokio::test]
async fn test_index_page_is_served() {
    let (app, _) = test_app(Department::Central);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("MediOps AI"));
}

#[tokio::test]
async fn test_missing_key_serves_config_error() {
    let app = config_error_router();

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Configuration Missing"));

    let response = app.oneshot(post_chat("Register patient John Doe")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "CONFIGURATION_MISSING");
}

#[tokio::test]
async fn test_chat_while_busy_is_conflict() {
    let router = Arc::new(GatedRouter {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let executor = Arc::new(CountingExecutor {
        reply: "Dr. Sari is available Monday 09:00.".into(),
        calls: AtomicUsize::new(0),
    });
    let session = ChatSession::new(router.clone(), executor.clone()).with_handoff_delay(Duration::ZERO);
    let app = create_router(AppState {
        session: Arc::new(session),
        model: "test-model".into(),
    });

    let first = tokio::spawn(app.clone().oneshot(post_chat("Book Dr. Sari for Monday")));
    router.entered.notified().await;

    // welcome + the in-flight user message
    let response = app.clone().oneshot(get("/api/messages")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["busy"], true);
    assert_eq!(body["processing_step"], "Analyzing request...");
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);

    let response = app.clone().oneshot(post_chat("Refill my prescription")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "CONFLICT");

    let response = app.clone().oneshot(get("/api/messages")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);

    router.release.notify_one();
    let response = first.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["active"], "scheduling");
    assert_eq!(executor.calls.load(Ordering::SeqCst), 1);

    let response = app.oneshot(get("/api/messages")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["busy"], false);
    assert_eq!(body["messages"].as_array().unwrap().len(), 4);
}
