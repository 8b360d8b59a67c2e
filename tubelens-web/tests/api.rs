use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use tubelens_analyst::{AnalystError, VideoAnalyst};
use tubelens_web::{build_app, AppState, SessionStore, REPORT_FILENAME};
use uuid::Uuid;

const REPORT_TEXT: &str = "## 🔍 Video Overview\n...";

/// Counts invocations so tests can prove the agent was never reached.
struct MockAnalyst {
    calls: AtomicUsize,
    fail_with: Option<AnalystError>,
    number_replies: bool,
}

impl MockAnalyst {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
            number_replies: false,
        })
    }

    fn numbered() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
            number_replies: true,
        })
    }

    fn failing(err: AnalystError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(err),
            number_replies: false,
        })
    }
}

#[async_trait]
impl VideoAnalyst for MockAnalyst {
    async fn analyze(&self, _credential: &str, _video_url: &str) -> Result<String, AnalystError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.fail_with {
            Some(AnalystError::EmptyResult) => Err(AnalystError::EmptyResult),
            Some(AnalystError::ExternalService(msg)) => {
                Err(AnalystError::ExternalService(msg.clone()))
            }
            None if self.number_replies => Ok(format!("{REPORT_TEXT} run {n}")),
            None => Ok(REPORT_TEXT.to_string()),
        }
    }
}

fn app_with(analyst: Arc<MockAnalyst>) -> (axum::Router, SessionStore) {
    let sessions = SessionStore::new();
    let state = AppState {
        sessions: sessions.clone(),
        analyst,
    };
    (build_app(state), sessions)
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or("")
}

#[tokio::test]
async fn analyze_without_credential_never_reaches_the_analyst() {
    let analyst = MockAnalyst::ok();
    let (app, sessions) = app_with(analyst.clone());
    let id = sessions.create().await;

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({ "session_id": id, "video_url": "https://youtu.be/xyz" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "missing_credential");
    assert_eq!(analyst.calls.load(Ordering::SeqCst), 0);
    assert!(sessions.get(id).await.unwrap().last_report.is_none());
}

#[tokio::test]
async fn analyze_with_blank_url_never_reaches_the_analyst() {
    let analyst = MockAnalyst::ok();
    let (app, sessions) = app_with(analyst.clone());
    let id = sessions.create().await;
    sessions.set_credential(id, "sk-test".into()).await;

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({ "session_id": id, "video_url": "   " }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "blank_url");
    assert_eq!(analyst.calls.load(Ordering::SeqCst), 0);
    assert!(sessions.get(id).await.unwrap().last_report.is_none());
}

#[tokio::test]
async fn successful_analysis_stores_the_agent_text_verbatim() {
    let (app, sessions) = app_with(MockAnalyst::ok());
    let id = sessions.create().await;
    sessions.set_credential(id, "sk-test".into()).await;

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({ "session_id": id, "video_url": "https://www.youtube.com/watch?v=abc123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markdown"].as_str().unwrap(), REPORT_TEXT);
    assert!(body["html"].as_str().unwrap().contains("Video Overview"));
    assert_eq!(
        sessions.get(id).await.unwrap().last_report.as_deref(),
        Some(REPORT_TEXT)
    );
}

#[tokio::test]
async fn reanalysis_overwrites_the_prior_report() {
    let (app, sessions) = app_with(MockAnalyst::numbered());
    let id = sessions.create().await;
    sessions.set_credential(id, "sk-test".into()).await;

    let url = json!({ "session_id": id, "video_url": "https://www.youtube.com/watch?v=abc123" });
    post_json(&app, "/api/analyze", url.clone()).await;
    post_json(&app, "/api/analyze", url).await;

    let stored = sessions.get(id).await.unwrap().last_report.unwrap();
    assert_eq!(stored, format!("{REPORT_TEXT} run 2"));
    assert!(!stored.contains("run 1"));
}

#[tokio::test]
async fn failure_keeps_the_prior_report() {
    let analyst = MockAnalyst::failing(AnalystError::ExternalService("agent down".into()));
    let (app, sessions) = app_with(analyst);
    let id = sessions.create().await;
    sessions.set_credential(id, "sk-test".into()).await;
    sessions.set_report(id, "old report".into()).await;

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({ "session_id": id, "video_url": "https://youtu.be/abc" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(&body), "external_service");
    assert_eq!(
        sessions.get(id).await.unwrap().last_report.as_deref(),
        Some("old report")
    );
}

#[tokio::test]
async fn empty_agent_output_surfaces_as_empty_result() {
    let (app, sessions) = app_with(MockAnalyst::failing(AnalystError::EmptyResult));
    let id = sessions.create().await;
    sessions.set_credential(id, "sk-test".into()).await;

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({ "session_id": id, "video_url": "https://youtu.be/abc" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(&body), "empty_result");
}

#[tokio::test]
async fn download_matches_the_stored_report_exactly() {
    let (app, sessions) = app_with(MockAnalyst::ok());
    let id = sessions.create().await;
    sessions.set_report(id, REPORT_TEXT.into()).await;

    let resp = get(&app, &format!("/api/report/{id}/download")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/markdown; charset=utf-8"
    );
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{REPORT_FILENAME}\"")
    );

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], REPORT_TEXT.as_bytes());
}

#[tokio::test]
async fn download_without_a_report_is_not_found() {
    let (app, sessions) = app_with(MockAnalyst::ok());
    let id = sessions.create().await;

    let resp = get(&app, &format!("/api/report/{id}/download")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_sessions_are_rejected() {
    let (app, _sessions) = app_with(MockAnalyst::ok());

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({ "session_id": Uuid::new_v4(), "video_url": "https://youtu.be/abc" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "unknown_session");

    let resp = get(&app, &format!("/api/report/{}", Uuid::new_v4())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_credential_is_rejected_at_submission() {
    let (app, sessions) = app_with(MockAnalyst::ok());
    let id = sessions.create().await;

    let (status, body) = post_json(
        &app,
        "/api/credential",
        json!({ "session_id": id, "credential": "   " }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "missing_credential");
    assert!(sessions.get(id).await.unwrap().credential.is_none());
}

#[tokio::test]
async fn session_and_credential_flow_works_end_to_end() {
    let (app, _sessions) = app_with(MockAnalyst::ok());

    let (status, body) = post_json(&app, "/api/session", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    let id: Uuid = serde_json::from_value(body["session_id"].clone()).unwrap();

    let (status, _) = post_json(
        &app,
        "/api/credential",
        json!({ "session_id": id, "credential": "sk-test" }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({ "session_id": id, "video_url": "https://www.youtube.com/watch?v=abc123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markdown"].as_str().unwrap(), REPORT_TEXT);

    let resp = get(&app, &format!("/api/report/{id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
