//! End-to-end decision flow: HTTP API -> decision service -> HuggingFace
//! client -> stub chat-completions server, with usage persisted to disk.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use nollmit::config::AppConfig;
use nollmit::server::{build_service, router, AppState};

/// Start a stub chat-completions endpoint and return its base URL.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub");
    let addr = listener.local_addr().expect("Failed to read stub addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// Stub that always answers with `reply` and counts calls.
fn replying(reply: &'static str, calls: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/chat/completions",
        post(move |Json(body): Json<Value>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Json(json!({
                    "model": body["model"],
                    "choices": [{"message": {"role": "assistant", "content": reply}}]
                }))
            }
        }),
    )
}

fn write_config(dir: &TempDir, base_url: &str, extra: &str) -> AppConfig {
    let path = dir.path().join("nollmit.toml");
    let storage = dir.path().join("usage.json");
    fs::write(
        &path,
        format!(
            r#"
[inference]
api_key = "hf_integration_token"
base_url = "{base_url}"
timeout_secs = 5

[usage]
storage_path = "{}"
{extra}
"#,
            storage.display()
        ),
    )
    .expect("Failed to write config");
    AppConfig::load(Some(&path)).expect("Failed to load config")
}

fn app(config: &AppConfig) -> Router {
    let service = build_service(config).expect("Failed to build service");
    router(AppState::new(service), &config.server.cors_origins)
}

async fn post_decide(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::post("/decide")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("JSON body"))
}

fn stored(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("usage record should exist"))
        .expect("usage record should be JSON")
}

#[tokio::test]
async fn test_decision_round_trip_records_usage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let calls = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(replying(
        "ACTION: BET\nAMOUNT: 200\nREASON: Semi-bluff with the flush draw.",
        calls.clone(),
    ))
    .await;
    let config = write_config(&temp_dir, &base_url, "");
    let app = app(&config);

    let (status, body) = post_decide(
        &app,
        json!({
            "player_name": "GPT-4o",
            "payload": {"pot": 150, "hole_cards": ["Ah", "5h"], "to_call": 50}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "RAISE");
    assert_eq!(body["amount"], 200);
    assert_eq!(body["reason"], "Semi-bluff with the flush draw.");
    assert!(body["raw"].as_str().unwrap().starts_with("ACTION: BET"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let record = stored(&config.usage.storage_path);
    assert_eq!(record["monthly_requests"], 1);
    assert_eq!(record["daily_requests"], 1);
    assert!(record["estimated_input_tokens"].as_u64().unwrap() > 0);
    assert!(record["estimated_output_tokens"].as_u64().unwrap() > 0);
    assert!(record["last_request"].is_string());
}

#[tokio::test]
async fn test_provider_failure_folds_without_counting() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let stub = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded") }),
    );
    let base_url = spawn_stub(stub).await;
    let config = write_config(&temp_dir, &base_url, "");
    let app = app(&config);

    let (status, body) =
        post_decide(&app, json!({"player_name": "Llama 3", "payload": {"pot": 10}})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "FOLD");
    assert_eq!(body["amount"], 0);
    assert_eq!(body["raw"], "");
    let reason = body["reason"].as_str().unwrap();
    assert!(reason.starts_with("Error: "));
    assert!(reason.contains("500"));

    assert!(!config.usage.storage_path.exists());
}

#[tokio::test]
async fn test_null_content_folds_without_counting() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let stub = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({"choices": [{"message": {"content": null}}]})) }),
    );
    let base_url = spawn_stub(stub).await;
    let config = write_config(&temp_dir, &base_url, "");
    let app = app(&config);

    let (status, body) =
        post_decide(&app, json!({"player_name": "GPT-4o", "payload": {"pot": 20}})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "FOLD");
    assert_eq!(body["amount"], 0);
    assert_eq!(body["raw"], "");
    let reason = body["reason"].as_str().unwrap();
    assert!(reason.starts_with("Error: "));
    assert!(reason.contains("empty message content"));

    assert!(!config.usage.storage_path.exists());
}

#[tokio::test]
async fn test_spectate_limit_blocks_before_inference() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let calls = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_stub(replying("ACTION: CHECK\nREASON: Free card.", calls.clone())).await;
    let config = write_config(&temp_dir, &base_url, "spectate_daily_limit = 1");
    let app = app(&config);

    let spectate = json!({"player_name": "Gemma", "payload": {}, "mode": "simulate"});

    let (status, body) = post_decide(&app, spectate.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "CHECK");

    let (status, body) = post_decide(&app, spectate).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["detail"],
        "Daily API limit reached for spectate mode (1 requests/day). Please try again tomorrow."
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Normal play is not throttled by the spectate ceiling.
    let (status, _) = post_decide(&app, json!({"player_name": "Gemma", "payload": {}})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_player_model_override_reaches_provider() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let stub = Router::new().route(
        "/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let content = if body["model"] == "Qwen/Qwen2.5-72B-Instruct" {
                "ACTION: CALL\nREASON: Pot odds."
            } else {
                "ACTION: FOLD\nREASON: Wrong model."
            };
            Json(json!({"choices": [{"message": {"content": content}}]}))
        }),
    );
    let base_url = spawn_stub(stub).await;
    let config = write_config(
        &temp_dir,
        &base_url,
        "\n[[models]]\nplayer = \"Qwen 2.5\"\nmodel = \"Qwen/Qwen2.5-72B-Instruct\"\n",
    );
    let app = app(&config);

    let (_, body) = post_decide(&app, json!({"player_name": "Qwen 2.5", "payload": {}})).await;
    assert_eq!(body["action"], "CALL");

    let (_, body) = post_decide(&app, json!({"player_name": "Mistral", "payload": {}})).await;
    assert_eq!(body["action"], "FOLD");
}
