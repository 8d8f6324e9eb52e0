//! HTTP surface of the conversation service.
//!
//! Handler failures answer with a 500 and the error message in a JSON body;
//! nothing at the request boundary is allowed to take the process down.

pub mod qa;

use crate::conversation::ConversationService;
use crate::models::{ConversationRequest, GreetingRequest};
use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
struct AppState {
    service: Arc<ConversationService>,
}

/// Build the conversation service router.
pub fn build_router(service: Arc<ConversationService>) -> Router {
    Router::new()
        .route("/conversation", post(conversation_handler))
        .route("/greeting", post(greeting_handler))
        .route("/handle_missing_info", post(missing_info_handler))
        .route("/api/health", get(health_handler))
        .with_state(AppState { service })
}

/// POST /conversation — one turn of the product pipeline.
async fn conversation_handler(
    State(state): State<AppState>,
    Json(body): Json<ConversationRequest>,
) -> impl IntoResponse {
    match state.service.handle_conversation(body).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => internal_error("conversation", &e),
    }
}

/// POST /greeting — opening message for a fresh conversation.
async fn greeting_handler(
    State(state): State<AppState>,
    Json(body): Json<GreetingRequest>,
) -> impl IntoResponse {
    match state.service.handle_greeting(body).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => internal_error("greeting", &e),
    }
}

/// POST /handle_missing_info — ask the customer for one missing field.
async fn missing_info_handler(
    State(state): State<AppState>,
    Json(body): Json<ConversationRequest>,
) -> impl IntoResponse {
    match state.service.handle_missing_info(body).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => internal_error("missing info", &e),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

fn internal_error(endpoint: &str, e: &anyhow::Error) -> axum::response::Response {
    error!("error in {endpoint} endpoint: {e:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Bind and serve the conversation API.
pub async fn start(host: &str, port: u16, service: Arc<ConversationService>) -> Result<()> {
    let app = build_router(service);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("conversation API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
