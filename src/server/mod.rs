//! HTTP server for the browser chat UI
//!
//! Endpoints:
//! - GET  /                 - Single-page chat UI
//! - GET  /api/status       - Health check
//! - GET  /api/departments  - Sidebar entries
//! - GET  /api/messages     - Transcript and busy flag
//! - POST /api/chat         - Run one turn

mod assets;
mod error;

pub use error::{ApiError, ApiResult};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::department::{Department, DepartmentInfo};
use crate::session::{ChatSession, Rejection, SubmitOutcome};
use crate::transcript::Message;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Chat request from the browser
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Messages appended by one turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub messages: Vec<Message>,
    pub active: Department,
}

/// Full view state for (re)rendering the page
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
    pub busy: bool,
    pub active: Department,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_step: Option<String>,
}

// ============================================================================
// Server State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ChatSession>,
    pub model: String,
}

// ============================================================================
// Routes
// ============================================================================

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/departments", get(departments_handler))
        .route("/api/messages", get(messages_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors())
        .with_state(state)
}

/// Router used when no API key is configured: every route reports the problem
pub fn config_error_router() -> Router {
    Router::new().fallback(config_error_handler).layer(cors())
}

/// Run the HTTP server
pub async fn run(router: Router, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);
    println!("Server listening on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

async fn index_handler() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn status_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.session.snapshot().await;
    Json(json!({
        "status": "ok",
        "model": state.model,
        "busy": snapshot.busy,
        "active": snapshot.active,
    }))
}

async fn departments_handler() -> Json<Vec<DepartmentInfo>> {
    Json(Department::ALL.into_iter().map(DepartmentInfo::from).collect())
}

async fn messages_handler(State(state): State<AppState>) -> Json<MessagesResponse> {
    let snapshot = state.session.snapshot().await;
    let processing_step = snapshot.processing_step();
    Json(MessagesResponse {
        messages: snapshot.transcript.messages().to_vec(),
        busy: snapshot.busy,
        active: snapshot.active,
        processing_step,
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    match state.session.submit(&request.message).await {
        SubmitOutcome::Completed { messages, active } => Ok(Json(ChatResponse { messages, active })),
        SubmitOutcome::Rejected(Rejection::Empty) => Err(ApiError::bad_request("Message is empty")),
        SubmitOutcome::Rejected(Rejection::Busy) => {
            Err(ApiError::conflict("A request is already being processed"))
        }
    }
}

async fn config_error_handler(uri: Uri) -> Response {
    if uri.path().starts_with("/api") {
        return ApiError::not_configured(
            "The GEMINI_API_KEY environment variable is missing. This application requires a valid Google Gemini API key to function.",
        )
        .into_response();
    }
    (StatusCode::SERVICE_UNAVAILABLE, Html(assets::CONFIG_ERROR_HTML)).into_response()
}
