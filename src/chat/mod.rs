// Chat completion client
// Streams answers from an OpenAI-compatible endpoint (DeepSeek). The
// stream is consumed token-by-token; there is deliberately no timeout on
// the response body, matching the interaction model of the console loop.


use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::ChatConfig;
use crate::{GridError, Result};

/// One role-tagged turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatMessage {
    #[inline]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[inline]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a DeepSeek-compatible streaming chat endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    completions_url: Url,
    model: String,
    api_key: String,
}

impl ChatClient {
    /// Build a client from configuration. A missing credential is reported
    /// as [`GridError::MissingApiKey`] so callers can render setup
    /// instructions instead of crashing.
    #[inline]
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or(GridError::MissingApiKey)?;
        let completions_url = config
            .completions_url()
            .map_err(|e| GridError::Config(e.to_string()))?;

        Ok(Self {
            client: Client::new(),
            completions_url,
            model: config.model.clone(),
            api_key,
        })
    }

    #[inline]
    pub fn with_credentials(completions_url: Url, model: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            completions_url,
            model,
            api_key,
        }
    }

    /// Stream a chat completion, invoking `on_delta` for every content
    /// fragment as it arrives. Returns the concatenated assistant reply
    /// once the stream completes.
    #[inline]
    pub async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        mut on_delta: impl FnMut(&str),
    ) -> Result<String> {
        if messages.is_empty() {
            return Err(GridError::Chat("No messages to send".to_string()));
        }

        let request = CompletionRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        debug!(
            "Submitting {} messages to {} (model {})",
            messages.len(),
            self.completions_url,
            self.model
        );

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GridError::Chat(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GridError::Chat(format!(
                "Service returned {status}: {body}"
            )));
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut answer = String::new();

        while let Some(chunk_result) = stream.next().await {
            let bytes =
                chunk_result.map_err(|e| GridError::Chat(format!("Stream read error: {e}")))?;
            buffer.extend_from_slice(&bytes);

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line_bytes = buffer[..pos].to_vec();
                buffer.drain(..=pos);
                let line = String::from_utf8_lossy(&line_bytes).trim().to_string();

                if line.is_empty() || line.starts_with(':') {
                    continue;
                }

                let Some(data) = line.strip_prefix("data:") else {
                    warn!("Unexpected stream line: {line}");
                    continue;
                };
                let data = data.trim();

                if data.is_empty() || data == "[DONE]" {
                    continue;
                }

                let chunk: StreamChunk = serde_json::from_str(data)
                    .map_err(|e| GridError::Chat(format!("Invalid stream payload: {e}")))?;

                if let Some(content) = chunk
                    .choices
                    .first()
                    .and_then(|choice| choice.delta.content.as_deref())
                {
                    answer.push_str(content);
                    on_delta(content);
                }
            }
        }

        debug!("Stream complete, {} characters received", answer.len());
        Ok(answer)
    }
}
