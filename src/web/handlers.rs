//! HTTP request handlers

use super::state::AppState;
use crate::history::StoreError;
use crate::research::ResearchError;
use crate::results::ResearchRun;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

/// Body of a research request
#[derive(Debug, Deserialize)]
pub struct ResearchBody {
    /// Query text
    pub text: String,
    /// Number of search results to use
    pub num_results: Option<i64>,
}

/// Query parameters for history listing
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

/// Error response with a `{ "message": ... }` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<ResearchError> for ApiError {
    fn from(err: ResearchError) -> Self {
        let status = match err {
            ResearchError::Validation(_) => StatusCode::BAD_REQUEST,
            ResearchError::SearchUnavailable(_) | ResearchError::SummarizerUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ResearchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };
        Self::new(status, err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not found"),
            other => {
                tracing::error!("History store error: {}", other);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read research history",
                )
            }
        }
    }
}

/// Research handler
pub async fn research(
    State(state): State<AppState>,
    body: Result<Json<ResearchBody>, JsonRejection>,
) -> Result<Json<ResearchRun>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    let run = state
        .researcher
        .run(&body.text, body.num_results)
        .await?;

    Ok(Json(run))
}

/// History listing handler, newest first
pub async fn history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<ResearchRun>>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    let limit = state.history_limit(params.limit);
    let runs = state.history.list_recent(limit).await?;
    Ok(Json(runs))
}

/// Single history item handler
pub async fn history_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ResearchRun>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    let run = state.history.get(id).await?;
    Ok(Json(run))
}

/// Liveness handler
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "API is live" }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
