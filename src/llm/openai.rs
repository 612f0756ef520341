use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::provider::LLMProvider;

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String, api_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        tracing::debug!("Sending ~{} chars to {}", prompt.len(), self.model);

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to read OpenAI response: {}", e)))?;

        parse_chat_response(status, &body)
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}

/// Extracts the first answer of a chat completion, surfacing HTTP failures and
/// error bodies as [`Error::LLMApi`].
fn parse_chat_response(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        return Err(Error::LLMApi(format!(
            "OpenAI API error ({}): {}",
            status, body
        )));
    }

    let result: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

    if let Some(error) = result.error {
        return Err(Error::LLMApi(error.message));
    }

    let text = result
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::LLMApi("Empty response from OpenAI".to_string()));
    }

    Ok(text)
}
