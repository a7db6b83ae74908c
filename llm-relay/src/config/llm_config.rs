use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::api_format::ApiFormat;

/// A user-editable LLM endpoint configuration.
///
/// Serialized with camelCase field names so the same JSON is accepted in
/// translation requests and written to persistent storage.
///
/// # Fields
///
/// - `id`: Stable identity; unique within a config list.
/// - `name`: Display name.
/// - `api_url`: Endpoint base URL (e.g. `http://localhost:11434`).
/// - `model`: Model identifier (e.g. `"llama3.1"`, `"gpt-3.5-turbo"`).
/// - `api_key`: Optional bearer token for chat-completion endpoints.
/// - `headers`: Optional extra request headers.
/// - `format`: Optional explicit wire format; inferred from `api_url` when absent.
///
/// # Examples
///
/// ```
/// use llm_relay::{ApiFormat, LlmConfig};
///
/// let cfg = LlmConfig::new("openai", "OpenAI GPT", "https://api.openai.com/v1", "gpt-3.5-turbo");
/// assert_eq!(cfg.api_format(), ApiFormat::OpenAi);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub api_url: String,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ApiFormat>,
}

impl LlmConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            api_url: api_url.into(),
            model: model.into(),
            api_key: None,
            headers: None,
            format: None,
        }
    }

    /// Effective wire format: the explicit `format` if set, otherwise the
    /// URL heuristic.
    pub fn api_format(&self) -> ApiFormat {
        self.format
            .unwrap_or_else(|| ApiFormat::detect(&self.api_url))
    }

    /// API key, treating an empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Endpoint base without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.api_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_overrides_url_heuristic() {
        let mut cfg = LlmConfig::new("x", "X", "https://ollama.example.com", "m");
        assert_eq!(cfg.api_format(), ApiFormat::Ollama);

        cfg.format = Some(ApiFormat::OpenAi);
        assert_eq!(cfg.api_format(), ApiFormat::OpenAi);
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        let mut cfg = LlmConfig::new("x", "X", "https://api.openai.com/v1", "m");
        cfg.api_key = Some(String::new());
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let cfg = LlmConfig::new("x", "X", "http://localhost:11434/", "m");
        assert_eq!(cfg.base_url(), "http://localhost:11434");
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let cfg: LlmConfig = serde_json::from_str(
            r#"{
                "id": "custom-1",
                "name": "Mine",
                "apiUrl": "https://my-llm.example.com",
                "model": "m",
                "apiKey": "k",
                "headers": { "X-Org": "acme" }
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.api_url, "https://my-llm.example.com");
        assert_eq!(cfg.api_key(), Some("k"));
        assert_eq!(
            cfg.headers.as_ref().and_then(|h| h.get("X-Org")).map(String::as_str),
            Some("acme")
        );
        assert_eq!(cfg.format, None);
    }

    #[test]
    fn optional_fields_are_omitted_when_unset() {
        let cfg = LlmConfig::new("a", "A", "http://localhost:11434", "llama3.1");
        let json = serde_json::to_value(&cfg).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("apiKey"));
        assert!(!obj.contains_key("headers"));
        assert!(!obj.contains_key("format"));
    }
}
