// tests/gemini_roundtrip.rs
// Drives the real Gemini client against a local stand-in for generateContent

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mediops::executor::{failure_reply, AgentExecutor};
use mediops::llm::{GeminiClient, LlmClient, API_KEY_HEADER};
use mediops::router::{CentralRouter, ROUTING_ERROR_REASON};
use mediops::session::SubmitOutcome;
use mediops::transcript::Role;
use mediops::{ChatSession, Department};

/// Canned replies: the first for the routing call, the second for execution
#[derive(Clone, Default)]
struct FakeGemini {
    replies: Arc<Mutex<Vec<(StatusCode, Value)>>>,
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn generate_content(
    State(fake): State<FakeGemini>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    fake.requests.lock().unwrap().push((model_action, key, body));
    let mut replies = fake.replies.lock().unwrap();
    if replies.is_empty() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "no reply scripted").into_response();
    }
    let (status, reply) = replies.remove(0);
    (status, Json(reply)).into_response()
}

async fn start_fake(replies: Vec<(StatusCode, Value)>) -> (String, FakeGemini) {
    let fake = FakeGemini {
        replies: Arc::new(Mutex::new(replies)),
        requests: Arc::default(),
    };
    let app = Router::new()
        .route("/models/{model_action}", post(generate_content))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/models", addr), fake)
}

fn client(base: &str) -> Arc<dyn LlmClient> {
    Arc::new(GeminiClient::with_options(
        "test-key".into(),
        "gemini-2.5-flash".into(),
        base.into(),
        Duration::from_secs(5),
    )
    .unwrap())
}

fn function_call(name: &str, context: &str, reason: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "functionCall": { "name": name, "args": { "context": context, "reason": reason } } }]
            }
        }]
    })
}

fn text(reply: &str) -> Value {
    json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": reply }] } }] })
}

#[tokio::test]
async fn test_full_turn_over_http() {
    let (base, fake) = start_fake(vec![
        (StatusCode::OK, function_call("delegateToPharmacy", "Stock check: amoxicillin 500mg", "medicine stock")),
        (StatusCode::OK, text("Stok amoxicillin 500mg: 120 kapsul.")),
    ])
    .await;

    let llm = client(&base);
    let session = ChatSession::new(
        Arc::new(CentralRouter::new(Arc::clone(&llm))),
        Arc::new(AgentExecutor::new(llm)),
    )
    .with_handoff_delay(Duration::ZERO);

    let SubmitOutcome::Completed { messages, active } =
        session.submit("Is amoxicillin 500mg in stock?").await
    else {
        panic!("turn should complete");
    };

    assert_eq!(active, Department::Pharmacy);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].body, "medicine stock");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].body, "Stok amoxicillin 500mg: 120 kapsul.");

    let requests = fake.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);

    let (path, key, routing) = &requests[0];
    assert_eq!(path, "gemini-2.5-flash:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(routing["generationConfig"]["temperature"], 0.0);
    assert_eq!(routing["tools"][0]["functionDeclarations"].as_array().unwrap().len(), 4);
    assert_eq!(routing["contents"][0]["parts"][0]["text"], "Is amoxicillin 500mg in stock?");

    let (_, _, execution) = &requests[1];
    assert!(execution.get("tools").is_none());
    assert_eq!(execution["contents"][0]["parts"][0]["text"], "Stock check: amoxicillin 500mg");
    assert_eq!(
        execution["systemInstruction"]["parts"][0]["text"],
        Department::Pharmacy.persona()
    );
}

#[tokio::test]
async fn test_routing_http_error_falls_back_to_central() {
    let (base, fake) = start_fake(vec![(
        StatusCode::BAD_REQUEST,
        json!({ "error": { "code": 400, "message": "API key not valid" } }),
    )])
    .await;

    let router = CentralRouter::new(client(&base));
    let result = router.delegate("Book Dr. Sari for Monday").await;

    assert_eq!(result.target, Department::Central);
    assert_eq!(result.context, "Book Dr. Sari for Monday");
    assert_eq!(result.reason, ROUTING_ERROR_REASON);
    assert_eq!(fake.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_candidate_falls_back_to_central() {
    let (base, _) = start_fake(vec![(
        StatusCode::OK,
        json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
    )])
    .await;

    let result = CentralRouter::new(client(&base)).delegate("anything").await;
    assert_eq!(result.target, Department::Central);
    assert_eq!(result.reason, ROUTING_ERROR_REASON);
}

#[tokio::test]
async fn test_execution_failure_is_in_band() {
    let (base, _) = start_fake(vec![(StatusCode::SERVICE_UNAVAILABLE, json!({}))]).await;

    let reply = AgentExecutor::new(client(&base))
        .run(Department::Billing, "Estimate cost of an MRI")
        .await;
    assert_eq!(reply, failure_reply(Department::Billing));
    assert!(reply.contains("Billing & Finance Agent"));
}
