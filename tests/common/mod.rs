#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chat_widget::{
    error::TransportError,
    message::{ChatOption, ChatResponse, OutboundRequest},
    services::transport::ChatTransport,
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

/// Answers requests from a queue and remembers what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ChatResponse, TransportError>>>,
    sent: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Result<ChatResponse, TransportError>) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_ok(&self, reply: &str, options: &[&str]) -> &Self {
        let options = options.iter().map(|t| ChatOption::new(*t)).collect();
        self.push(Ok(ChatResponse::reply(reply, options)))
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ChatResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Timeout(Duration::ZERO)))
    }
}

pub type Seen = Arc<Mutex<Vec<Value>>>;

async fn chat_handler(State(seen): State<Seen>, Json(body): Json<Value>) -> Response {
    seen.lock().unwrap().push(body.clone());
    let message = body["message"].as_str().unwrap_or_default().to_string();

    // `raw:<body>` answers with <body> verbatim as JSON.
    if let Some(raw) = message.strip_prefix("raw:") {
        return ([(header::CONTENT_TYPE, "application/json")], raw.to_string()).into_response();
    }

    match message.trim() {
        "" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error": "Empty message."})),
        )
            .into_response(),
        "start" => Json(json!({
            "ok": true,
            "reply": "Welcome! How can I help you today?",
            "options": [{"text": "Habits"}, {"text": "Confidence"}, {"text": "Career"}],
            "node": "start"
        }))
        .into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"ok": true, "reply": "finally"})).into_response()
        }
        _ => Json(json!({"ok": true, "reply": format!("You said: {message}"), "options": null}))
            .into_response(),
    }
}

/// Serves a fake `/chat` on an ephemeral port.
pub async fn spawn_chat_server() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}
