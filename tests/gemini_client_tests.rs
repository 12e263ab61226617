//! Gemini adapter behaviour against a local stub of the REST API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use dsagent::{Credentials, GeminiClient, GenerationClient, GenerationParameters, PromptDispatcher};

#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

#[derive(Clone, Debug)]
struct RecordedCall {
    action: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct StubState {
    recorded: Recorded,
    reply: Arc<dyn Fn(&Value) -> (StatusCode, Value) + Send + Sync>,
}

async fn generate(
    State(state): State<StubState>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let (status, reply) = (state.reply)(&body);
    state.recorded.calls.lock().unwrap().push(RecordedCall {
        action,
        api_key,
        body,
    });
    (status, Json(reply)).into_response()
}

async fn list_models(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    match query.get("pageToken").map(String::as_str) {
        None => Json(json!({
            "models": [
                {
                    "name": "models/gemini-2.5-flash",
                    "displayName": "Gemini 2.5 Flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/text-embedding-004",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ],
            "nextPageToken": "page-2"
        })),
        Some("page-2") => Json(json!({
            "models": [
                {
                    "name": "models/gemini-2.5-pro",
                    "displayName": "Gemini 2.5 Pro",
                    "supportedGenerationMethods": ["generateContent"]
                }
            ]
        })),
        Some(_) => Json(json!({ "models": [] })),
    }
}

async fn start_stub<F>(reply: F) -> (String, Recorded)
where
    F: Fn(&Value) -> (StatusCode, Value) + Send + Sync + 'static,
{
    let recorded = Recorded::default();
    let state = StubState {
        recorded: recorded.clone(),
        reply: Arc::new(reply),
    };
    let app = axum::Router::new()
        .route("/v1beta/models", get(list_models))
        .route("/v1beta/models/{action}", post(generate))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    (format!("http://{addr}"), recorded)
}

fn text_reply(text: &str) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }),
    )
}

#[tokio::test]
async fn generate_posts_prompt_with_fixed_parameters() {
    let (base, recorded) = start_stub(|_| text_reply("Overfitting is...")).await;
    let client = GeminiClient::new(Credentials::new("test-key"), "gemini-2.5-flash", &base);

    let text = client
        .generate("What is overfitting?", &GenerationParameters::default())
        .await
        .expect("generate");
    assert_eq!(text, "Overfitting is...");

    let calls = recorded.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.action, "gemini-2.5-flash:generateContent");
    assert_eq!(call.api_key.as_deref(), Some("test-key"));
    assert_eq!(call.body["contents"][0]["parts"][0]["text"], "What is overfitting?");

    let config = &call.body["generationConfig"];
    assert_eq!(config["topK"], 40);
    assert_eq!(config["maxOutputTokens"], 8192);
    assert!((config["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert!((config["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
}

#[tokio::test]
async fn dispatcher_sends_persona_framed_request_over_http() {
    let (base, recorded) = start_stub(|body| {
        let prompt = body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        text_reply(&prompt)
    })
    .await;
    let client = GeminiClient::new(Credentials::new("k"), "gemini-2.5-flash", &base);
    let dispatcher = PromptDispatcher::new(Arc::new(client));

    let echoed = dispatcher
        .answer_question("What is overfitting?")
        .await
        .expect("answer");

    assert!(echoed.starts_with(dispatcher.persona().text()));
    assert!(echoed.contains("\n\nWhat is overfitting?\n\n"));
    assert_eq!(recorded.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let (base, _) = start_stub(|_| {
        (
            StatusCode::TOO_MANY_REQUESTS,
            json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted (e.g. check quota).",
                    "status": "RESOURCE_EXHAUSTED"
                }
            }),
        )
    })
    .await;
    let client = GeminiClient::new(Credentials::new("k"), "gemini-2.5-flash", &base);

    let err = client
        .generate("hi", &GenerationParameters::default())
        .await
        .expect_err("quota error");

    assert!(err.is_generation());
    let message = err.to_string();
    assert!(message.contains("429"));
    assert!(message.contains("Resource has been exhausted"));
}

#[tokio::test]
async fn blocked_prompt_is_an_error_not_empty_text() {
    let (base, _) = start_stub(|_| {
        (
            StatusCode::OK,
            json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
        )
    })
    .await;
    let client = GeminiClient::new(Credentials::new("k"), "gemini-2.5-flash", &base);

    let err = client
        .generate("hi", &GenerationParameters::default())
        .await
        .expect_err("blocked");
    assert!(err.is_generation());
    assert!(err.to_string().contains("SAFETY"));
}

#[tokio::test]
async fn unreachable_server_is_a_generation_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = GeminiClient::new(
        Credentials::new("k"),
        "gemini-2.5-flash",
        format!("http://{addr}"),
    );
    let err = client
        .generate("hi", &GenerationParameters::default())
        .await
        .expect_err("connection refused");

    assert!(err.is_generation());
    assert!(err.to_string().contains("request failed"));
}

#[tokio::test]
async fn list_models_follows_page_tokens() {
    let (base, _) = start_stub(|_| text_reply("")).await;
    let client = GeminiClient::new(Credentials::new("k"), "gemini-2.5-flash", &base);

    let models = client.list_models().await.expect("list");

    let names: Vec<_> = models.iter().map(|m| m.name()).collect();
    assert_eq!(
        names,
        [
            "models/gemini-2.5-flash",
            "models/text-embedding-004",
            "models/gemini-2.5-pro"
        ]
    );
    assert_eq!(models[0].display_name(), Some("Gemini 2.5 Flash"));
    assert!(!models[1].supports_generation());
}
