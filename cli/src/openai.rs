//! OpenAI-compatible chat completions backend for the evaluation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use docbench::{ChatModel, Error, Result};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Blocking chat client over the async `reqwest` client.
pub struct OpenAiChat {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
    runtime: Runtime,
}

impl OpenAiChat {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| Error::Chat(format!("Failed to build HTTP client: {}", e)))?;
        let runtime = Runtime::new()?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            runtime,
        })
    }

    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Chat(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Chat(format!("Failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::Chat(format!("Request failed with status {}: {}", status, body)));
        }

        let reply: ChatResponse = serde_json::from_str(&body)?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Chat("No content in response".to_string()))
    }
}

impl ChatModel for OpenAiChat {
    fn chat(&self, model: &str, system: &str, user: &str) -> Result<String> {
        log::debug!("Asking {} ({} prompt bytes)", model, user.len());
        self.runtime.block_on(self.complete(model, system, user))
    }
}
