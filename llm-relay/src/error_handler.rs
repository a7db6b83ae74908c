//! Unified error handling for `llm-relay`.
//!
//! [`RelayError`] covers everything a translation call can fail with.
//! Messages are user-facing: the HTTP layer returns them verbatim.
//! [`ConfigError`] is for environment parsing at startup.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::api_format::ApiFormat;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, RelayError>;

/* ------------------------------------------------------------------------- */
/* Relay errors                                                              */
/* ------------------------------------------------------------------------- */

/// Error returned by [`crate::TranslationRelay`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RelayError {
    /// `text`, `targetLang` or `config` was absent or empty.
    #[error("Missing required fields")]
    MissingFields,

    /// Source text exceeds the per-request limit.
    #[error("Text is too long: {len} characters (limit {max})")]
    TextTooLong {
        /// Length of the submitted text in characters.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The endpoint answered with a non-success status.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// Network/connection failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body could not be decoded.
    #[error("failed to decode {format} response: {reason}")]
    Decode {
        /// Format whose response failed to decode.
        format: ApiFormat,
        /// Decoder message.
        reason: String,
    },

    /// A configured header name or value is not valid HTTP.
    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader {
        /// Header name as configured.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Generic strategy exhausted both formats.
    #[error("Unable to connect to the LLM API with any known format")]
    UnreachableEndpoint,
}

impl RelayError {
    /// `true` for errors caused by the caller's input rather than the endpoint.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingFields | RelayError::TextTooLong { .. }
        )
    }
}

/// Non-success HTTP status from an endpoint whose format was chosen
/// deterministically.
#[derive(Debug, Error)]
#[error("{} API error: {}", .format.label(), .status_text)]
pub struct EndpointError {
    pub format: ApiFormat,
    pub status: StatusCode,
    /// Reason phrase for `status` (e.g. `Unauthorized`).
    pub status_text: String,
    pub url: String,
    /// Short prefix of the response body, for logs.
    pub snippet: String,
}

impl EndpointError {
    pub fn new(format: ApiFormat, status: StatusCode, url: String, body: &str) -> Self {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());

        Self {
            format,
            status,
            status_text,
            url,
            snippet: make_snippet(body),
        }
    }
}

/// Trims a response body to a short single-chunk preview for logs.
pub fn make_snippet(body: &str) -> String {
    body.trim().chars().take(240).collect()
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (like timeouts).
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `u64`.
pub fn env_opt_u64(name: &'static str) -> std::result::Result<Option<u64>, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected u64",
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_error_message_uses_status_text() {
        let err = EndpointError::new(
            ApiFormat::OpenAi,
            StatusCode::UNAUTHORIZED,
            "https://api.openai.com/v1/chat/completions".into(),
            "{\"error\":\"bad key\"}",
        );
        assert_eq!(err.to_string(), "OpenAI API error: Unauthorized");

        let err = EndpointError::new(
            ApiFormat::Ollama,
            StatusCode::NOT_FOUND,
            "http://localhost:11434/api/generate".into(),
            "",
        );
        assert_eq!(
            RelayError::from(err).to_string(),
            "Ollama API error: Not Found"
        );
    }

    #[test]
    fn snippet_is_bounded() {
        let body = "x".repeat(1000);
        assert_eq!(make_snippet(&body).len(), 240);
    }

    #[test]
    fn client_errors_are_input_problems_only() {
        assert!(RelayError::MissingFields.is_client_error());
        assert!(RelayError::TextTooLong { len: 5001, max: 5000 }.is_client_error());
        assert!(!RelayError::UnreachableEndpoint.is_client_error());
    }
}
