use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use llm_relay::{ApiFormat, LlmConfig, config::default_config::is_builtin};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use crate::{errors::StoreError, storage::KeyValueStorage};

/// Storage key holding the JSON array of configs.
pub const CONFIGS_KEY: &str = "llm-configs";
/// Storage key holding the JSON of the active config.
pub const SELECTED_KEY: &str = "selected-config";

/// Fields for a new config. `id` is generated when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub format: Option<ApiFormat>,
}

/// Partial update. Absent fields keep their value; for the optional fields
/// an explicit JSON `null` clears them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub api_key: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub headers: Option<Option<BTreeMap<String, String>>>,
    #[serde(default, deserialize_with = "present")]
    pub format: Option<Option<ApiFormat>>,
}

/// Distinguishes "field present (maybe null)" from "field absent".
fn present<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl ConfigPatch {
    fn apply(self, cfg: &mut LlmConfig) {
        if let Some(name) = self.name {
            cfg.name = name;
        }
        if let Some(api_url) = self.api_url {
            cfg.api_url = api_url;
        }
        if let Some(model) = self.model {
            cfg.model = model;
        }
        if let Some(api_key) = self.api_key {
            cfg.api_key = api_key;
        }
        if let Some(headers) = self.headers {
            cfg.headers = headers;
        }
        if let Some(format) = self.format {
            cfg.format = format;
        }
    }
}

/// Only the id of the persisted active config matters on load.
#[derive(Deserialize)]
struct SelectedRef {
    id: String,
}

/// Ordered config list plus the active selection, mirrored to storage.
///
/// Invariant: while the list is non-empty, `active_id` names an entry of the
/// list. It is `None` only when the list is empty.
pub struct ConfigStore {
    storage: Arc<dyn KeyValueStorage>,
    seeds: Vec<LlmConfig>,
    configs: Vec<LlmConfig>,
    active_id: Option<String>,
}

impl ConfigStore {
    /// Restores state from `storage`, falling back to `seeds`.
    ///
    /// An absent, unreadable or malformed config list is replaced by the
    /// seeds; the problem is logged, not returned. Duplicate ids keep their
    /// first occurrence. An unknown or unreadable selection selects the first
    /// config.
    pub fn load(storage: Arc<dyn KeyValueStorage>, seeds: Vec<LlmConfig>) -> Self {
        let configs = match storage.get(CONFIGS_KEY) {
            Ok(Some(raw)) => match parse_stored(&raw) {
                Ok(list) => dedupe(list),
                Err(e) => {
                    warn!(error = %e, "discarding stored configs; reseeding defaults");
                    seeds.clone()
                }
            },
            Ok(None) => seeds.clone(),
            Err(e) => {
                warn!(error = %e, "config storage unreadable; using defaults");
                seeds.clone()
            }
        };

        let stored_active = match storage.get(SELECTED_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<SelectedRef>(&raw)
                .map(|s| s.id)
                .map_err(|e| debug!(error = %e, "ignoring malformed stored selection"))
                .ok(),
            _ => None,
        };

        let active_id = stored_active
            .filter(|id| configs.iter().any(|c| &c.id == id))
            .or_else(|| configs.first().map(|c| c.id.clone()));

        info!(
            configs = configs.len(),
            active = active_id.as_deref().unwrap_or("-"),
            "config store loaded"
        );

        Self {
            storage,
            seeds,
            configs,
            active_id,
        }
    }

    pub fn list(&self) -> &[LlmConfig] {
        &self.configs
    }

    pub fn get(&self, id: &str) -> Option<&LlmConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    pub fn active(&self) -> Option<&LlmConfig> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The seed list used by [`ConfigStore::reset_to_defaults`].
    pub fn seeds(&self) -> &[LlmConfig] {
        &self.seeds
    }

    /// Makes `id` the active config.
    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.active_id = Some(id.to_string());
        self.persist()
    }

    /// Validates and appends a new config, returning it.
    ///
    /// A fresh `custom-{millis}` id is assigned when the draft has none. If
    /// the store had no active config, the new one becomes active.
    pub fn add(&mut self, draft: ConfigDraft) -> Result<LlmConfig, StoreError> {
        let id = match draft.id.filter(|id| !id.trim().is_empty()) {
            Some(id) if self.get(&id).is_some() => return Err(StoreError::DuplicateId(id)),
            Some(id) => id,
            None => self.fresh_id(),
        };

        let cfg = LlmConfig {
            id,
            name: draft.name,
            api_url: draft.api_url,
            model: draft.model,
            api_key: draft.api_key,
            headers: draft.headers,
            format: draft.format,
        };
        validate(&cfg)?;

        if self.active().is_none() {
            self.active_id = Some(cfg.id.clone());
        }
        self.configs.push(cfg.clone());
        self.persist()?;

        info!(id = %cfg.id, "config added");
        Ok(cfg)
    }

    /// Merges `patch` into the config with `id`.
    ///
    /// Returns `Ok(false)` without touching anything if `id` is unknown.
    pub fn update(&mut self, id: &str, patch: ConfigPatch) -> Result<bool, StoreError> {
        let Some(pos) = self.configs.iter().position(|c| c.id == id) else {
            debug!(id, "update ignored: no such config");
            return Ok(false);
        };

        let mut merged = self.configs[pos].clone();
        patch.apply(&mut merged);
        validate(&merged)?;

        self.configs[pos] = merged;
        self.persist()?;

        info!(id, "config updated");
        Ok(true)
    }

    /// Removes the config with `id`.
    ///
    /// Returns `Ok(false)` if `id` is unknown. Deleting the active config
    /// selects the first remaining one.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(pos) = self.configs.iter().position(|c| c.id == id) else {
            return Ok(false);
        };
        if is_builtin(id) {
            return Err(StoreError::BuiltinProtected(id.to_string()));
        }

        self.configs.remove(pos);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.configs.first().map(|c| c.id.clone());
        }
        self.persist()?;

        info!(id, active = self.active_id.as_deref().unwrap_or("-"), "config deleted");
        Ok(true)
    }

    /// Replaces every config with the seeds and selects the first.
    pub fn reset_to_defaults(&mut self) -> Result<(), StoreError> {
        self.configs = self.seeds.clone();
        self.active_id = self.configs.first().map(|c| c.id.clone());
        self.persist()?;

        info!(configs = self.configs.len(), "configs reset to defaults");
        Ok(())
    }

    /// Writes the config list and the active config to storage.
    fn persist(&self) -> Result<(), StoreError> {
        let list = serde_json::to_string(&self.configs).map_err(StoreError::Serialize)?;
        self.storage.set(CONFIGS_KEY, &list)?;

        if let Some(active) = self.active() {
            let selected = serde_json::to_string(active).map_err(StoreError::Serialize)?;
            self.storage.set(SELECTED_KEY, &selected)?;
        }
        Ok(())
    }

    fn fresh_id(&self) -> String {
        let base = format!("custom-{}", Utc::now().timestamp_millis());
        if self.get(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

fn parse_stored(raw: &str) -> Result<Vec<LlmConfig>, StoreError> {
    serde_json::from_str(raw).map_err(StoreError::MalformedStoredConfig)
}

fn dedupe(list: Vec<LlmConfig>) -> Vec<LlmConfig> {
    let mut out: Vec<LlmConfig> = Vec::with_capacity(list.len());
    for cfg in list {
        if out.iter().any(|c| c.id == cfg.id) {
            warn!(id = %cfg.id, "dropping stored config with duplicate id");
            continue;
        }
        out.push(cfg);
    }
    out
}

fn validate(cfg: &LlmConfig) -> Result<(), StoreError> {
    if cfg.name.trim().is_empty() {
        return Err(StoreError::Validation("name is required"));
    }
    if cfg.api_url.trim().is_empty() {
        return Err(StoreError::Validation("apiUrl is required"));
    }
    if cfg.model.trim().is_empty() {
        return Err(StoreError::Validation("model is required"));
    }
    Ok(())
}
