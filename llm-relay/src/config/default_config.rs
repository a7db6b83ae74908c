//! Built-in seed configs, adjusted from environment variables.
//!
//! The seed list is what a fresh config store starts with and what a reset
//! restores. Two built-ins always exist (local Ollama and OpenAI). The
//! environment can re-point the default one and can declare one fully
//! custom config that goes ahead of the built-ins.
//!
//! # Environment variables
//!
//! Default built-in:
//! - `TRANSLATOR_DEFAULT_CONFIG_ID` = id of the built-in treated as default (`ollama-default`)
//! - `TRANSLATOR_DEFAULT_API_URL`   = endpoint override
//! - `TRANSLATOR_DEFAULT_MODEL`     = model override
//! - `TRANSLATOR_DEFAULT_API_KEY`   = API key
//!
//! Custom default (inserted only when name, URL and model are all set):
//! - `TRANSLATOR_CUSTOM_NAME`
//! - `TRANSLATOR_CUSTOM_API_URL`
//! - `TRANSLATOR_CUSTOM_MODEL`
//! - `TRANSLATOR_CUSTOM_API_KEY` (optional)

use tracing::warn;

use crate::config::llm_config::LlmConfig;

pub const OLLAMA_DEFAULT_ID: &str = "ollama-default";
pub const OPENAI_DEFAULT_ID: &str = "openai";
pub const CUSTOM_DEFAULT_ID: &str = "custom-default";

/// Ids of the built-in configs. These cannot be deleted from a store.
pub const BUILTIN_IDS: [&str; 2] = [OLLAMA_DEFAULT_ID, OPENAI_DEFAULT_ID];

/// Returns `true` if `id` names one of the non-deletable built-ins.
pub fn is_builtin(id: &str) -> bool {
    BUILTIN_IDS.contains(&id)
}

/// The two built-in configs, without environment overrides.
pub fn builtin_configs() -> Vec<LlmConfig> {
    vec![
        LlmConfig::new(
            OLLAMA_DEFAULT_ID,
            "Ollama (Local)",
            "http://localhost:11434",
            "llama3.1",
        ),
        LlmConfig::new(
            OPENAI_DEFAULT_ID,
            "OpenAI GPT",
            "https://api.openai.com/v1",
            "gpt-3.5-turbo",
        ),
    ]
}

/// Custom default config declared entirely through the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDefault {
    pub name: String,
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Environment-derived inputs for building the seed list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSettings {
    pub default_id: Option<String>,
    pub default_api_url: Option<String>,
    pub default_model: Option<String>,
    pub default_api_key: Option<String>,
    pub custom: Option<CustomDefault>,
}

impl SeedSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let custom = match (
            get("TRANSLATOR_CUSTOM_NAME"),
            get("TRANSLATOR_CUSTOM_API_URL"),
            get("TRANSLATOR_CUSTOM_MODEL"),
        ) {
            (Some(name), Some(api_url), Some(model)) => Some(CustomDefault {
                name,
                api_url,
                model,
                api_key: get("TRANSLATOR_CUSTOM_API_KEY"),
            }),
            _ => None,
        };

        Self {
            default_id: get("TRANSLATOR_DEFAULT_CONFIG_ID"),
            default_api_url: get("TRANSLATOR_DEFAULT_API_URL"),
            default_model: get("TRANSLATOR_DEFAULT_MODEL"),
            default_api_key: get("TRANSLATOR_DEFAULT_API_KEY"),
            custom,
        }
    }

    /// Builds the seed list.
    ///
    /// Order: custom default (if declared), the default built-in with its
    /// overrides applied, then the remaining built-ins.
    pub fn seed_configs(&self) -> Vec<LlmConfig> {
        let mut configs = builtin_configs();

        let wanted = self.default_id.as_deref().unwrap_or(OLLAMA_DEFAULT_ID);
        let pos = match configs.iter().position(|c| c.id == wanted) {
            Some(pos) => pos,
            None => {
                warn!(
                    default_id = wanted,
                    "unknown default config id; using the first built-in"
                );
                0
            }
        };

        let mut default = configs.remove(pos);
        if let Some(url) = &self.default_api_url {
            default.api_url = url.clone();
        }
        if let Some(model) = &self.default_model {
            default.model = model.clone();
        }
        if let Some(key) = &self.default_api_key {
            default.api_key = Some(key.clone());
        }
        configs.insert(0, default);

        if let Some(custom) = &self.custom {
            let mut cfg = LlmConfig::new(
                CUSTOM_DEFAULT_ID,
                custom.name.clone(),
                custom.api_url.clone(),
                custom.model.clone(),
            );
            cfg.api_key = custom.api_key.clone();
            configs.insert(0, cfg);
        }

        configs
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> SeedSettings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SeedSettings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn no_env_yields_plain_builtins() {
        let seeds = settings(&[]).seed_configs();
        assert_eq!(seeds, builtin_configs());
    }

    #[test]
    fn overrides_apply_to_default_builtin() {
        let seeds = settings(&[
            ("TRANSLATOR_DEFAULT_API_URL", "http://gpu-box:11434"),
            ("TRANSLATOR_DEFAULT_MODEL", "qwen2.5"),
        ])
        .seed_configs();

        assert_eq!(seeds[0].id, OLLAMA_DEFAULT_ID);
        assert_eq!(seeds[0].api_url, "http://gpu-box:11434");
        assert_eq!(seeds[0].model, "qwen2.5");
        assert_eq!(seeds[1], builtin_configs()[1]);
    }

    #[test]
    fn default_id_moves_builtin_to_front() {
        let seeds = settings(&[
            ("TRANSLATOR_DEFAULT_CONFIG_ID", "openai"),
            ("TRANSLATOR_DEFAULT_API_KEY", "sk-env"),
        ])
        .seed_configs();

        assert_eq!(seeds[0].id, OPENAI_DEFAULT_ID);
        assert_eq!(seeds[0].api_key(), Some("sk-env"));
        assert_eq!(seeds[1].id, OLLAMA_DEFAULT_ID);
    }

    #[test]
    fn unknown_default_id_keeps_builtin_order() {
        let seeds = settings(&[("TRANSLATOR_DEFAULT_CONFIG_ID", "nope")]).seed_configs();
        assert_eq!(seeds[0].id, OLLAMA_DEFAULT_ID);
        assert_eq!(seeds.len(), 2);
    }

    #[test]
    fn complete_custom_default_goes_first() {
        let seeds = settings(&[
            ("TRANSLATOR_CUSTOM_NAME", "Team LLM"),
            ("TRANSLATOR_CUSTOM_API_URL", "https://llm.team.example.com"),
            ("TRANSLATOR_CUSTOM_MODEL", "mixtral"),
            ("TRANSLATOR_CUSTOM_API_KEY", "team-key"),
        ])
        .seed_configs();

        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0].id, CUSTOM_DEFAULT_ID);
        assert_eq!(seeds[0].name, "Team LLM");
        assert_eq!(seeds[0].api_key(), Some("team-key"));
        assert!(!is_builtin(&seeds[0].id));
    }

    #[test]
    fn incomplete_custom_default_is_ignored() {
        let s = settings(&[
            ("TRANSLATOR_CUSTOM_NAME", "Team LLM"),
            ("TRANSLATOR_CUSTOM_API_URL", "https://llm.team.example.com"),
            ("TRANSLATOR_CUSTOM_MODEL", "   "),
        ]);
        assert_eq!(s.custom, None);
        assert_eq!(s.seed_configs().len(), 2);
    }
}
