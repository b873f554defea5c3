//! GeminiProvider against a local mock `generateContent` endpoint.
//! Verifies the wire format sent and the error classification of real HTTP responses.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};

use visabot_core::llm::provider::LlmProvider;
use visabot_infra::llm::gemini::GeminiProvider;
use visabot_types::llm::{CompletionRequest, FailureKind, LlmError, Message};

#[derive(Clone, Default)]
struct Captured {
    action: Arc<Mutex<Option<String>>>,
    api_key: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<Option<Value>>>,
}

async fn spawn_mock(
    status: StatusCode,
    reply: Value,
) -> Option<(String, Captured, tokio::task::JoinHandle<()>)> {
    let captured = Captured::default();

    let handler = move |State(state): State<Captured>,
                        Path(action): Path<String>,
                        headers: HeaderMap,
                        Json(body): Json<Value>| {
        let reply = reply.clone();
        async move {
            *state.action.lock().unwrap() = Some(action);
            *state.api_key.lock().unwrap() = headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            *state.body.lock().unwrap() = Some(body);
            (status, Json(reply))
        }
    };

    let app = Router::new()
        .route("/v1beta/models/{action}", post(handler))
        .with_state(captured.clone());

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("skipping gemini http tests: local socket bind is not permitted");
            return None;
        }
        Err(err) => panic!("bind failed: {err}"),
    };
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Some((format!("http://{addr}/v1beta"), captured, handle))
}

fn provider(base_url: &str) -> GeminiProvider {
    GeminiProvider::new(SecretString::from("mock-key"), "gemini-flash-latest".into())
        .unwrap()
        .with_base_url(base_url)
}

fn request(text: &str) -> CompletionRequest {
    CompletionRequest {
        model: "gemini-flash-latest".into(),
        system: Some("Only visa questions.".into()),
        messages: vec![Message::user(text)],
        temperature: None,
        max_output_tokens: None,
    }
}

#[tokio::test]
async fn complete_sends_gemini_wire_format_and_parses_reply() {
    let reply = json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "A valid passport and DS-160."}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 8},
        "responseId": "resp-42"
    });
    let Some((base_url, captured, handle)) = spawn_mock(StatusCode::OK, reply).await else {
        return;
    };

    let response = provider(&base_url)
        .complete(&request("What documents do I need for a US tourist visa?"))
        .await
        .unwrap();

    assert_eq!(response.content, "A valid passport and DS-160.");
    assert_eq!(response.usage.input_tokens, 20);
    assert_eq!(response.id.as_deref(), Some("resp-42"));

    assert_eq!(
        captured.action.lock().unwrap().as_deref(),
        Some("gemini-flash-latest:generateContent")
    );
    assert_eq!(captured.api_key.lock().unwrap().as_deref(), Some("mock-key"));
    let body = captured.body.lock().unwrap().clone().unwrap();
    assert_eq!(
        body["systemInstruction"]["parts"][0]["text"],
        "Only visa questions."
    );
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        "What documents do I need for a US tourist visa?"
    );

    handle.abort();
}

#[tokio::test]
async fn complete_classifies_invalid_key_as_auth() {
    let reply = json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT",
            "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}]
        }
    });
    let Some((base_url, _, handle)) = spawn_mock(StatusCode::BAD_REQUEST, reply).await else {
        return;
    };

    let err = provider(&base_url).complete(&request("hi")).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Auth);

    handle.abort();
}

#[tokio::test]
async fn complete_classifies_quota_exhaustion() {
    let reply = json!({
        "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
    });
    let Some((base_url, _, handle)) = spawn_mock(StatusCode::TOO_MANY_REQUESTS, reply).await
    else {
        return;
    };

    let err = provider(&base_url).complete(&request("hi")).await.unwrap_err();
    assert!(matches!(err, LlmError::QuotaExceeded { .. }));

    handle.abort();
}

#[tokio::test]
async fn complete_reports_unreachable_host_as_network_error() {
    let err = provider("http://127.0.0.1:1/v1beta")
        .complete(&request("hi"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);
}
