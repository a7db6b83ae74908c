//! Translation relay for LLM HTTP endpoints.
//!
//! Builds a single translation prompt, dispatches it to the configured
//! endpoint using one of three wire formats, and returns the extracted text.

pub mod config;
pub mod error_handler;
pub mod languages;
pub mod prompt;
pub mod relay;
pub mod services;
pub mod telemetry;

pub use config::{api_format::ApiFormat, llm_config::LlmConfig};
pub use error_handler::{ConfigError, EndpointError, RelayError};
pub use relay::{TranslationRelay, TranslationRequest, TranslationResponse};
