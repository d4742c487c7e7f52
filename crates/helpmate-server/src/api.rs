use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use helpmate_core::Orchestrator;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

const FAILURE_MESSAGE: &str =
    "Sorry, I ran into a problem while working on that. Please try again in a moment.";

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub group: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Error body `{error}` with a status code.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        warn!("Rejected chat request body: {e}");
        ApiError::bad_request("request body must be JSON like {\"message\": \"...\"}")
    })?;
    let message = body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::bad_request("message must be a non-empty string"))?;

    let request_id = uuid::Uuid::new_v4().to_string();
    let short_id = &request_id[..8];
    info!("Chat request {short_id}: {} chars", message.len());

    match state.orchestrator.respond(message).await {
        Ok(reply) => {
            info!(
                "Chat request {short_id} answered in {} round(s), tools: [{}]",
                reply.rounds,
                reply.tools_used.join(", ")
            );
            Ok(Json(ChatResponse {
                response: reply.text,
                timestamp: now(),
            }))
        }
        Err(e) => {
            error!("Chat request {short_id} failed: {e}");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: FAILURE_MESSAGE.to_string(),
            })
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "timestamp": now() }))
}

pub async fn capabilities(State(state): State<AppState>) -> Json<serde_json::Value> {
    let capabilities: Vec<Capability> = state
        .orchestrator
        .tools()
        .list()
        .into_iter()
        .map(|d| Capability {
            name: d.name,
            description: d.description,
            group: d.group,
        })
        .collect();
    Json(json!({ "capabilities": capabilities }))
}
