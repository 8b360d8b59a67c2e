//! Router and request handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tubelens_analyst::VideoAnalyst;
use uuid::Uuid;

use crate::error::ApiError;
use crate::page::PAGE_HTML;
use crate::render::markdown_to_html;
use crate::session::SessionStore;
use crate::REPORT_FILENAME;

/// Shared application state: the session store plus the analyst seam.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub analyst: Arc<dyn VideoAnalyst>,
}

/// Build the complete TubeLens HTTP application.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/session", post(create_session))
        .route("/api/credential", post(set_credential))
        .route("/api/analyze", post(analyze))
        .route("/api/report/:session_id", get(get_report))
        .route("/api/report/:session_id/download", get(download_report))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(PAGE_HTML)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct SessionCreated {
    session_id: Uuid,
}

async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

#[derive(Deserialize)]
struct SetCredentialRequest {
    session_id: Uuid,
    credential: String,
}

async fn set_credential(
    State(state): State<AppState>,
    Json(req): Json<SetCredentialRequest>,
) -> Result<StatusCode, ApiError> {
    if req.credential.trim().is_empty() {
        return Err(ApiError::MissingCredential);
    }
    if !state.sessions.set_credential(req.session_id, req.credential).await {
        return Err(ApiError::UnknownSession);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    session_id: Uuid,
    video_url: String,
}

#[derive(Serialize)]
struct ReportResponse {
    markdown: String,
    html: String,
}

/// Trigger an analysis.
///
/// Validation comes first and short-circuits before any outbound call: no
/// credential and no URL means the analyst is never reached. On success
/// the verbatim markdown overwrites the session's previous report.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let session = state
        .sessions
        .get(req.session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;

    let credential = match session.credential {
        Some(c) if !c.trim().is_empty() => c,
        _ => return Err(ApiError::MissingCredential),
    };

    let video_url = req.video_url.trim().to_string();
    if video_url.is_empty() {
        return Err(ApiError::BlankUrl);
    }

    tracing::info!(session = %req.session_id, %video_url, "analysis triggered");
    let markdown = state.analyst.analyze(&credential, &video_url).await?;

    state.sessions.set_report(req.session_id, markdown.clone()).await;

    let html = markdown_to_html(&markdown);
    Ok(Json(ReportResponse { markdown, html }))
}

async fn get_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ReportResponse>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let markdown = session.last_report.ok_or(ApiError::ReportNotFound)?;
    let html = markdown_to_html(&markdown);
    Ok(Json(ReportResponse { markdown, html }))
}

/// Serve the stored report byte-for-byte as a markdown attachment.
async fn download_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let markdown = session.last_report.ok_or(ApiError::ReportNotFound)?;

    let headers = [
        (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{REPORT_FILENAME}\""),
        ),
    ];
    Ok((headers, markdown).into_response())
}
