mod pages;

pub use pages::{HistoryPage, IndexPage};

use crate::database::Database;
use crate::providers::relay::Relay;
use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HISTORY_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
    pub db: Database,
}

impl AppState {
    pub fn new(relay: Relay, db: Database) -> Self {
        Self { relay, db }
    }
}

fn default_model() -> Value {
    Value::String("gpt4".to_string())
}

/// Fields stay loosely typed: a null or non-string `model` is just an
/// unknown model and still gets a reply and a logged row.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: Value,
    #[serde(default = "default_model")]
    model: Value,
}

impl ChatRequest {
    fn into_parts(self) -> (String, String) {
        (as_text(self.message), as_text(self.model))
    }
}

fn as_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Create and configure the relay router
pub fn create_api(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat_handler))
        .route("/history", get(history_handler))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn index_handler() -> Response {
    render(&IndexPage)
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let (message, model) = request.into_parts();
    info!("Chat request for model {:?}", model);
    let reply = state.relay.reply(&model, &message).await;

    if let Err(e) = state.db.save_chat(message, reply.clone(), model).await {
        warn!("Failed to save chat exchange: {}", e);
    }

    Json(ChatResponse { reply })
}

async fn history_handler(State(state): State<AppState>) -> Response {
    match state.db.recent_chats(HISTORY_LIMIT).await {
        Ok(chats) => render(&HistoryPage { chats: &chats }),
        Err(e) => {
            error!("Failed to load chat history: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "History is unavailable.").into_response()
        }
    }
}

fn render(page: &impl Template) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
