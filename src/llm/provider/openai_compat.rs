// src/llm/provider/openai_compat.rs
// Chat completions provider for any OpenAI-compatible endpoint

use super::{ChatMessage, LlmProvider, ProviderMetadata, ProviderResponse};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::debug;

use crate::config::SummarizationConfig;

pub struct OpenAiCompatProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl OpenAiCompatProvider {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            max_tokens,
        }
    }

    /// Build from summarization settings; the request timeout lives on the client
    pub fn from_config(config: &SummarizationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self::new(
            client,
            config.base_url.clone(),
            config.api_key.clone(),
            config.model.clone(),
            config.max_tokens,
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(&self, messages: Vec<ChatMessage>, system: String) -> Value {
        let mut api_messages = vec![json!({
            "role": "system",
            "content": system
        })];

        for msg in messages {
            api_messages.push(json!({
                "role": msg.role,
                "content": msg.content
            }));
        }

        json!({
            "model": self.model,
            "messages": api_messages,
            "max_tokens": self.max_tokens,
            "stream": false,
        })
    }
}

/// Pull content and usage out of a chat completions response
fn parse_response(raw: &Value, model: &str, latency_ms: i64) -> Result<ProviderResponse> {
    let content = raw["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow!("No content in chat completion response"))?
        .to_string();

    // Some compatible servers omit usage entirely
    let usage = &raw["usage"];
    let metadata = ProviderMetadata {
        model_version: raw["model"].as_str().unwrap_or(model).to_string(),
        input_tokens: usage["prompt_tokens"].as_i64(),
        output_tokens: usage["completion_tokens"].as_i64(),
        total_tokens: usage["total_tokens"].as_i64(),
        latency_ms,
        finish_reason: raw["choices"][0]["finish_reason"]
            .as_str()
            .map(|s| s.to_string()),
    };

    Ok(ProviderResponse { content, metadata })
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn chat(&self, messages: Vec<ChatMessage>, system: String) -> Result<ProviderResponse> {
        let start = Instant::now();
        let body = self.request_body(messages, system);

        debug!("Chat completion request: model={}", self.model);

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("LLM API error {}: {}", status, error_text));
        }

        let raw_response = response.json::<Value>().await?;
        let latency_ms = start.elapsed().as_millis() as i64;

        parse_response(&raw_response, &self.model, latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(
            Client::new(),
            "http://localhost:8080/v1/",
            None,
            "test-model",
            32,
        )
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(provider().endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_system_prompt_leads_request() {
        let body = provider().request_body(
            vec![ChatMessage::new("user", "hi")],
            "be brief".to_string(),
        );
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "be brief");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(body["max_tokens"], 32);
        assert_eq!(body["model"], "test-model");
    }

    #[test]
    fn test_parse_response() {
        let raw = json!({
            "model": "served-model",
            "choices": [{
                "message": { "role": "assistant", "content": "🍰 Cheesecake recipe" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 120, "completion_tokens": 5, "total_tokens": 125 }
        });
        let parsed = parse_response(&raw, "test-model", 42).unwrap();
        assert_eq!(parsed.content, "🍰 Cheesecake recipe");
        assert_eq!(parsed.metadata.model_version, "served-model");
        assert_eq!(parsed.metadata.total_tokens, Some(125));
        assert_eq!(parsed.metadata.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_parse_response_without_usage() {
        let raw = json!({
            "choices": [{ "message": { "content": "📰 Latest news" } }]
        });
        let parsed = parse_response(&raw, "test-model", 1).unwrap();
        assert_eq!(parsed.metadata.model_version, "test-model");
        assert!(parsed.metadata.input_tokens.is_none());
    }

    #[test]
    fn test_parse_response_without_content_fails() {
        let raw = json!({ "choices": [] });
        assert!(parse_response(&raw, "test-model", 1).is_err());
    }
}
