use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::command::pipeline::{CommandOutcome, CommandPipeline};
use crate::command::resolver::TierStatus;
use crate::core::types::ActionPlan;
use crate::server::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub tiers: Vec<TierStatus>,
    pub actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThinkRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThinkResponse {
    pub response: ActionPlan,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online".into(),
        message: "deskpilot API is running".into(),
    })
}

pub async fn system_status(State(pipeline): State<Arc<CommandPipeline>>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").into(),
        tiers: pipeline.resolver().tier_status().await,
        actions: pipeline
            .dispatcher()
            .supported_actions()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

pub async fn think(
    State(pipeline): State<Arc<CommandPipeline>>,
    payload: Result<Json<ThinkRequest>, JsonRejection>,
) -> Result<Json<ThinkResponse>, ApiError> {
    let Json(request) = payload.map_err(rejected)?;
    if request.prompt.trim().is_empty() {
        return Err(ApiError::bad_request("prompt is empty"));
    }
    let response = pipeline.think(&request.prompt).await;
    Ok(Json(ThinkResponse { response }))
}

pub async fn execute(
    State(pipeline): State<Arc<CommandPipeline>>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandOutcome>, ApiError> {
    let Json(request) = payload.map_err(rejected)?;
    tracing::info!("API command received: {}", request.command);
    let outcome = pipeline.handle(&request.command).await?;
    Ok(Json(outcome))
}

/// Malformed or mistyped request bodies get the error envelope
fn rejected(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}
