//! Client for OpenAI-style chat completions.
//!
//! - `POST {endpoint}/chat/completions` — chat completion (non-streaming)
//!
//! The endpoint already carries the API version prefix
//! (e.g. `https://api.openai.com/v1`). Sampling is fixed for translation:
//! `temperature = 0.3`, `max_tokens = 2000`.

use std::time::Instant;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{api_format::ApiFormat, llm_config::LlmConfig},
    error_handler::{EndpointError, RelayError, Result},
};

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 2000;

/// Thin, per-call client for `/chat/completions`.
#[derive(Debug)]
pub struct OpenAiService<'a> {
    client: &'a reqwest::Client,
    cfg: &'a LlmConfig,
    headers: HeaderMap,
    url_chat: String,
}

impl<'a> OpenAiService<'a> {
    pub fn new(client: &'a reqwest::Client, cfg: &'a LlmConfig, headers: HeaderMap) -> Self {
        let url_chat = format!("{}/chat/completions", cfg.base_url());
        Self {
            client,
            cfg,
            headers,
            url_chat,
        }
    }

    /// Sends `prompt` as a single user message and returns
    /// `choices[0].message.content` (empty string if absent).
    ///
    /// # Errors
    /// - [`RelayError::Endpoint`] for non-2xx responses
    /// - [`RelayError::Transport`] for client/network failures
    /// - [`RelayError::Decode`] if the body is not the expected JSON
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(prompt_len = prompt.len(), "POST {}", self.url_chat);

        let resp = self
            .client
            .post(&self.url_chat)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let err = EndpointError::new(ApiFormat::OpenAi, status, self.url_chat.clone(), &text);

            warn!(
                %status,
                url = %err.url,
                snippet = %err.snippet,
                latency_ms = started.elapsed().as_millis(),
                "/chat/completions returned non-success status"
            );
            return Err(err.into());
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| RelayError::Decode {
            format: ApiFormat::OpenAi,
            reason: format!("serde error: {e}; expected `choices[0].message.content`"),
        })?;

        let content = out.first_content().unwrap_or_default();

        info!(
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );

        Ok(content)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal response for `/chat/completions`.
///
/// Every level may be `null` or missing; either way the text is empty.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Option<Vec<Option<ChatChoice>>>,
}

impl ChatCompletionResponse {
    fn first_content(self) -> Option<String> {
        self.choices?
            .into_iter()
            .next()
            .flatten()?
            .message?
            .content
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessageOut>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    #[serde(default)]
    content: Option<String>,
}
