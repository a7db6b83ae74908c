use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire format used to talk to an LLM endpoint.
///
/// A config may pin the format explicitly. When it does not, the format is
/// inferred from the endpoint URL with [`ApiFormat::detect`].
///
/// # Examples
///
/// ```
/// use llm_relay::ApiFormat;
///
/// assert_eq!(ApiFormat::detect("http://localhost:11434"), ApiFormat::Ollama);
/// assert_eq!(ApiFormat::detect("https://api.openai.com/v1"), ApiFormat::OpenAi);
/// assert_eq!(ApiFormat::detect("https://my-llm.example.com"), ApiFormat::Generic);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    /// Local inference server generate API: `POST {url}/api/generate`.
    Ollama,
    /// Hosted chat completions: `POST {url}/chat/completions`.
    OpenAi,
    /// Chat completions first, then the generate API if that fails.
    Generic,
}

impl ApiFormat {
    /// Infers the format from an endpoint URL.
    ///
    /// Priority order:
    /// 1. `localhost:11434` or `ollama` anywhere in the URL → [`ApiFormat::Ollama`]
    /// 2. `openai.com` → [`ApiFormat::OpenAi`]
    /// 3. anything else → [`ApiFormat::Generic`]
    pub fn detect(api_url: &str) -> Self {
        if api_url.contains("localhost:11434") || api_url.contains("ollama") {
            ApiFormat::Ollama
        } else if api_url.contains("openai.com") {
            ApiFormat::OpenAi
        } else {
            ApiFormat::Generic
        }
    }

    /// Human-facing provider label, used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            ApiFormat::Ollama => "Ollama",
            ApiFormat::OpenAi => "OpenAI",
            ApiFormat::Generic => "Generic",
        }
    }
}

impl fmt::Display for ApiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
