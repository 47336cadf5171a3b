use crate::config::toml_config::PerplexityConfig;
use crate::domain::model::{KnowledgeAnswer, KnowledgeRequest};
use crate::domain::ports::KnowledgeProvider;
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Upstream error bodies are kept for logs only, truncated to this many chars.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Perplexity chat-completions client.
#[derive(Debug, Clone)]
pub struct PerplexityClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    health_timeout: Duration,
}

impl PerplexityClient {
    pub fn new(config: &PerplexityConfig) -> Result<Self> {
        let api_key = validate_required_field("perplexity.api_key", &config.api_key)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            health_timeout: Duration::from_secs(config.health_timeout_seconds),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl KnowledgeProvider for PerplexityClient {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn ask(&self, request: &KnowledgeRequest) -> Result<KnowledgeAnswer> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            tracing::warn!(status = status.as_u16(), "Perplexity API error: {}", body);
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse =
            serde_json::from_slice(&bytes).map_err(|e| SearchError::MalformedResponse {
                message: e.to_string(),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SearchError::MalformedResponse {
                message: "no choices in response".to_string(),
            })?;

        Ok(KnowledgeAnswer {
            content,
            citations: parsed.citations,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("models"))
            .bearer_auth(&self.api_key)
            .timeout(self.health_timeout)
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}
