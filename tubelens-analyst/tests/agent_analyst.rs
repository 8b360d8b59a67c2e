use serde_json::json;
use tubelens_analyst::{AgentAnalyst, AnalystConfig, AnalystError, VideoAnalyst};
use tubelens_youtube::YouTubeClient;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=abc12345678";

fn analyst_for(server: &MockServer) -> AgentAnalyst {
    let base = format!("{}/", server.uri());
    let config = AnalystConfig {
        model: "gpt-4o".into(),
        endpoint: base.clone(),
        temperature: Some(0.3),
        max_tokens: None,
    };
    AgentAnalyst::new(config, YouTubeClient::with_base(&base).unwrap())
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn returns_agent_text_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "messages": [
                {},
                { "role": "user", "content": format!("Analyze this video: {VIDEO_URL}") }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("## 🔍 Video Overview\n...")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let analyst = analyst_for(&server);
    let report = analyst.analyze("sk-test", VIDEO_URL).await.unwrap();
    assert_eq!(report, "## 🔍 Video Overview\n...");
}

#[tokio::test]
async fn empty_agent_text_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   \n")))
        .mount(&server)
        .await;

    let analyst = analyst_for(&server);
    let err = analyst.analyze("sk-test", VIDEO_URL).await.unwrap_err();
    assert!(matches!(err, AnalystError::EmptyResult));
}

#[tokio::test]
async fn upstream_failure_is_external_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&server)
        .await;

    let analyst = analyst_for(&server);
    let err = analyst.analyze("sk-bad", VIDEO_URL).await.unwrap_err();
    match err {
        AnalystError::ExternalService(msg) => {
            assert!(msg.contains("Incorrect API key"), "{msg}")
        }
        other => panic!("expected ExternalService, got {other:?}"),
    }
}
