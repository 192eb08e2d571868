//! OpenAI-compatible chat completion client used by the meal planner.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::LlmConfig;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("completion response had no content")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
}

/// One call, one text payload. The caller decides how to parse it.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, CompletionError>;
}

pub struct OpenAiCompletions {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Result<String, CompletionError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }
}

impl OpenAiCompletions {
    pub fn new(cfg: &LlmConfig, timeout: Duration) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
    }

    fn body(&self, req: &CompletionRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": req.system },
                { "role": "user", "content": req.prompt },
            ],
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletions {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(model = %self.model, prompt_len = req.prompt.len(), "completion request");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.body(req))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<ChatResponse>().await?.into_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiCompletions {
        OpenAiCompletions::new(
            &LlmConfig {
                base_url: "https://llm.local/v1/".into(),
                api_key: "k".into(),
                model: "test-model".into(),
                temperature: 0.2,
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn body_requests_json_only_output() {
        let c = client();
        assert_eq!(c.base_url, "https://llm.local/v1");
        let body = c.body(&CompletionRequest {
            system: "sys".into(),
            prompt: "hi".into(),
        });
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn first_choice_content_is_returned() {
        let r: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#,
        )
        .unwrap();
        assert_eq!(r.into_content().unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn empty_choices_is_an_error() {
        let r: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(r.into_content(), Err(CompletionError::EmptyResponse)));
        let r: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(r.into_content(), Err(CompletionError::EmptyResponse)));
    }
}
