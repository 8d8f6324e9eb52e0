//! HTTP surface of the knowledge-base QA service.

use anyhow::Result;
use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Seam between the router and the RAG pipeline so handlers stay testable
/// without an embedding model on disk.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, query: &str) -> Result<String>;
}

#[cfg(feature = "embeddings")]
#[async_trait]
impl Answerer for crate::kb::QaService {
    async fn answer(&self, query: &str) -> Result<String> {
        crate::kb::QaService::answer(self, query).await
    }
}

#[derive(Debug, Deserialize)]
pub struct SmsbotRequest {
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Serialize)]
pub struct SmsbotResponse {
    pub message: String,
}

#[derive(Clone)]
struct QaState {
    answerer: Arc<dyn Answerer>,
}

pub fn build_qa_router(answerer: Arc<dyn Answerer>) -> Router {
    Router::new()
        .route("/smsbot", post(smsbot_handler))
        .route("/api/health", get(qa_health_handler))
        .with_state(QaState { answerer })
}

/// POST /smsbot — answer a knowledge-base query.
async fn smsbot_handler(
    State(state): State<QaState>,
    Json(body): Json<SmsbotRequest>,
) -> impl IntoResponse {
    match state.answerer.answer(&body.payload).await {
        Ok(message) => Json(SmsbotResponse { message }).into_response(),
        Err(e) => {
            error!("error in smsbot endpoint: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(super::ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn qa_health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Bind and serve the QA API.
pub async fn start(host: &str, port: u16, answerer: Arc<dyn Answerer>) -> Result<()> {
    let app = build_qa_router(answerer);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("QA API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
