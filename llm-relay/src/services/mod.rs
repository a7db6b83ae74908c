//! Endpoint clients, one per wire format.

pub mod ollama_service;
pub mod open_ai_service;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::{
    config::llm_config::LlmConfig,
    error_handler::{RelayError, Result},
};

/// Builds request headers for `cfg`.
///
/// Order of application:
/// 1. `Authorization: Bearer {api_key}` when `with_bearer` and a key is set
/// 2. user headers (may replace `Authorization`)
/// 3. `Content-Type: application/json`, never overridable
///
/// # Errors
/// [`RelayError::InvalidHeader`] if a user header name or value is not valid HTTP.
pub fn request_headers(cfg: &LlmConfig, with_bearer: bool) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    if with_bearer {
        if let Some(key) = cfg.api_key() {
            let value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                RelayError::InvalidHeader {
                    name: AUTHORIZATION.to_string(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }
    }

    for (name, value) in cfg.headers.iter().flatten() {
        let invalid = |reason: String| RelayError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| invalid(e.to_string()))?;
        if header_name == CONTENT_TYPE {
            continue;
        }
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        headers.insert(header_name, header_value);
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
