//! Client for the local inference server generate API.
//!
//! - `POST {endpoint}/api/generate` — synchronous text generation (`stream=false`)
//!
//! The generated text is read from the `response` field; a missing field
//! yields an empty string.

use std::time::Instant;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{api_format::ApiFormat, llm_config::LlmConfig},
    error_handler::{EndpointError, RelayError, Result},
};

/// Thin, per-call client for `/api/generate`.
///
/// Borrows the shared HTTP client and the config for the duration of one
/// translation; headers are prepared by the caller.
pub struct OllamaService<'a> {
    client: &'a reqwest::Client,
    cfg: &'a LlmConfig,
    headers: HeaderMap,
    url_generate: String,
}

impl<'a> OllamaService<'a> {
    pub fn new(client: &'a reqwest::Client, cfg: &'a LlmConfig, headers: HeaderMap) -> Self {
        let url_generate = format!("{}/api/generate", cfg.base_url());
        Self {
            client,
            cfg,
            headers,
            url_generate,
        }
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// # Errors
    /// - [`RelayError::Endpoint`] for non-2xx responses
    /// - [`RelayError::Transport`] for client/network failures
    /// - [`RelayError::Decode`] if the body is not the expected JSON
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let body = GenerateRequest {
            model: &self.cfg.model,
            prompt,
            stream: false,
        };

        debug!(prompt_len = prompt.len(), "POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let err = EndpointError::new(ApiFormat::Ollama, status, self.url_generate.clone(), &text);

            warn!(
                %status,
                url = %err.url,
                snippet = %err.snippet,
                latency_ms = started.elapsed().as_millis(),
                "/api/generate returned non-success status"
            );
            return Err(err.into());
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| RelayError::Decode {
            format: ApiFormat::Ollama,
            reason: format!("serde error: {e}; expected `{{ response: string }}`"),
        })?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            "generation completed"
        );

        Ok(out.response.unwrap_or_default())
    }
}

/* ==========================
HTTP payloads
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body for `/api/generate`.
///
/// Minimal shape: the generated text is in `response`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}
