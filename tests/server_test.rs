use agri_web_search::config::ServiceConfig;
use agri_web_search::domain::model::{KnowledgeAnswer, KnowledgeRequest};
use agri_web_search::domain::ports::KnowledgeProvider;
use agri_web_search::server::{create_routes, AppState};
use agri_web_search::{ExternalSearch, PrivacyMode, Result, SearchError};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

struct StubProvider {
    available: bool,
}

#[async_trait]
impl KnowledgeProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn ask(&self, request: &KnowledgeRequest) -> Result<KnowledgeAnswer> {
        if !self.available {
            return Err(SearchError::UpstreamStatus {
                status: 502,
                body: String::new(),
            });
        }
        Ok(KnowledgeAnswer {
            content: format!("Answer to: {}", request.user_prompt),
            citations: vec!["https://www.fao.org".to_string()],
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.available)
    }
}

fn state_with(available: bool, mode: PrivacyMode) -> AppState {
    let mut config = ServiceConfig::default();
    config.privacy.mode = mode;
    let provider: Arc<dyn KnowledgeProvider> = Arc::new(StubProvider { available });
    Arc::new(ExternalSearch::new(provider, config).unwrap())
}

async fn post(state: AppState, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = create_routes(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_reports_provider_availability() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = create_routes(state_with(false, PrivacyMode::Redact))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["provider"], "stub");
    assert_eq!(json["provider_available"], false);
}

#[tokio::test]
async fn test_search_returns_answer() {
    let (status, json) = post(
        state_with(true, PrivacyMode::Redact),
        "/search",
        r#"{"query": "Best cover crops before maize?", "search_type": "general"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["search_type"], "general");
    assert!(json["answer"]
        .as_str()
        .unwrap()
        .starts_with("Answer to: Best cover crops before maize?"));
    assert_eq!(json["sources"][0], "https://www.fao.org");
}

#[tokio::test]
async fn test_redacted_search_lists_removed_kinds() {
    let (status, json) = post(
        state_with(true, PrivacyMode::Redact),
        "/search",
        r#"{"query": "Email farmer@example.com: how to store onions?"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["redactions"], serde_json::json!(["email"]));
    assert!(!json["answer"].as_str().unwrap().contains("farmer@example.com"));
}

#[tokio::test]
async fn test_privacy_rejection_is_unprocessable() {
    let (status, json) = post(
        state_with(true, PrivacyMode::Reject),
        "/prices",
        r#"{"commodity": "wheat", "market": "farm id HR-1234"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "privacy_violation");
}

#[tokio::test]
async fn test_invalid_input_is_bad_request() {
    let (status, json) = post(
        state_with(true, PrivacyMode::Redact),
        "/alerts",
        r#"{"region": "Dalmatia", "crops": []}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_query");
    assert_eq!(
        json["message"],
        "Query must be a non-empty general agricultural question"
    );
}

#[tokio::test]
async fn test_upstream_failure_is_degraded_not_error() {
    let (status, json) = post(
        state_with(false, PrivacyMode::Redact),
        "/news",
        r#"{"topic": "fertilizer subsidies"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["search_type"], "news");
    assert_eq!(json["message"], "Unable to fetch current information");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (status, _) = post(state_with(true, PrivacyMode::Redact), "/search", "{not json").await;
    assert!(status.is_client_error());
}
