//! The translation relay.
//!
//! One operation, [`TranslationRelay::translate`]: validate the request,
//! build the prompt, dispatch it by [`ApiFormat`], return trimmed text.
//!
//! Dispatch strategies:
//! - [`ApiFormat::Ollama`]  → generate API only, no bearer header
//! - [`ApiFormat::OpenAi`]  → chat completions only, bearer if a key is set
//! - [`ApiFormat::Generic`] → chat completions, then generate on any failure
//!
//! # Example
//! ```no_run
//! use llm_relay::{LlmConfig, TranslationRelay, TranslationRequest};
//!
//! # async fn run() -> Result<(), llm_relay::RelayError> {
//! let relay = TranslationRelay::new(None)?;
//! let out = relay
//!     .translate(TranslationRequest {
//!         text: Some("Hola mundo".into()),
//!         source_lang: Some("auto".into()),
//!         target_lang: Some("en".into()),
//!         config: Some(LlmConfig::new(
//!             "ollama-default",
//!             "Ollama (Local)",
//!             "http://localhost:11434",
//!             "llama3.1",
//!         )),
//!     })
//!     .await?;
//! println!("{}", out.translated_text);
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::{api_format::ApiFormat, llm_config::LlmConfig},
    error_handler::{RelayError, Result},
    languages::AUTO_DETECT,
    prompt::build_prompt,
    services::{
        ollama_service::OllamaService, open_ai_service::OpenAiService, request_headers,
    },
};

/// Maximum accepted source text length, in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Incoming translation request.
///
/// Every field is optional on the wire so that absent fields surface as
/// [`RelayError::MissingFields`] instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub config: Option<LlmConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub translated_text: String,
}

/// Stateless relay holding only a shared HTTP client.
#[derive(Debug, Clone)]
pub struct TranslationRelay {
    client: reqwest::Client,
}

impl TranslationRelay {
    /// Builds a relay with its own HTTP client.
    ///
    /// Idle connections are not kept. `timeout_secs` of `None` leaves the
    /// client without a request timeout.
    ///
    /// # Errors
    /// [`RelayError::Transport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .gzip(true)
            .brotli(true)
            .deflate(true);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self::with_client(builder.build()?))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Translates `request.text` using `request.config`.
    ///
    /// A missing or empty `sourceLang` is treated as `"auto"`.
    ///
    /// # Errors
    /// - [`RelayError::MissingFields`] if text, target language or config is absent/empty
    /// - [`RelayError::TextTooLong`] if text exceeds [`MAX_TEXT_CHARS`]
    /// - any dispatch error, see [`TranslationRelay::dispatch`]
    #[instrument(skip_all)]
    pub async fn translate(&self, request: TranslationRequest) -> Result<TranslationResponse> {
        let TranslationRequest {
            text,
            source_lang,
            target_lang,
            config,
        } = request;

        let (Some(text), Some(target_lang), Some(config)) =
            (non_empty(text), non_empty(target_lang), config)
        else {
            return Err(RelayError::MissingFields);
        };

        let len = text.chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(RelayError::TextTooLong {
                len,
                max: MAX_TEXT_CHARS,
            });
        }

        let source_lang = non_empty(source_lang).unwrap_or_else(|| AUTO_DETECT.to_string());
        let prompt = build_prompt(&text, &source_lang, &target_lang);
        let format = config.api_format();

        info!(
            %format,
            config_id = %config.id,
            model = %config.model,
            source_lang = %source_lang,
            target_lang = %target_lang,
            text_len = len,
            "dispatching translation"
        );

        match self.dispatch(&config, format, &prompt).await {
            Ok(text) => Ok(TranslationResponse {
                translated_text: text.trim().to_string(),
            }),
            Err(e) => {
                error!(%format, error = %e, "translation failed");
                Err(e)
            }
        }
    }

    /// Sends `prompt` to `cfg` using `format` and returns the raw model text.
    ///
    /// # Errors
    /// - [`RelayError::Endpoint`] for non-2xx from a deterministic format
    /// - [`RelayError::Transport`] for network failures of a deterministic format
    /// - [`RelayError::Decode`] for an undecodable success body
    /// - [`RelayError::InvalidHeader`] for bad user headers
    /// - [`RelayError::UnreachableEndpoint`] when the generic strategy exhausts both formats
    pub async fn dispatch(&self, cfg: &LlmConfig, format: ApiFormat, prompt: &str) -> Result<String> {
        match format {
            ApiFormat::Ollama => {
                let headers = request_headers(cfg, false)?;
                OllamaService::new(&self.client, cfg, headers)
                    .generate(prompt)
                    .await
            }
            ApiFormat::OpenAi => {
                let headers = request_headers(cfg, true)?;
                OpenAiService::new(&self.client, cfg, headers)
                    .generate(prompt)
                    .await
            }
            ApiFormat::Generic => self.dual_attempt(cfg, prompt).await,
        }
    }

    /// Generic strategy: chat completions first, generate API second.
    ///
    /// Any failure of the first attempt (transport, status, decode) falls
    /// through to the second. Only the exhaustion of both is reported.
    async fn dual_attempt(&self, cfg: &LlmConfig, prompt: &str) -> Result<String> {
        let headers = request_headers(cfg, true)?;

        match OpenAiService::new(&self.client, cfg, headers.clone())
            .generate(prompt)
            .await
        {
            Ok(text) => return Ok(text),
            Err(e) => debug!(error = %e, "chat completions attempt failed; trying generate API"),
        }

        match OllamaService::new(&self.client, cfg, headers)
            .generate(prompt)
            .await
        {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, endpoint = %cfg.base_url(), "generate attempt failed; no format left");
                Err(RelayError::UnreachableEndpoint)
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
