use std::{env, path::PathBuf, sync::Arc};

use config_store::{ConfigStore, FileStorage, StoreError};
use llm_relay::{
    TranslationRelay, config::default_config::SeedSettings, error_handler::env_opt_u64,
};
use tokio::{sync::RwLock, task};

use crate::error_handler::AppError;

const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Listen address, from `API_ADDRESS`.
    pub address: String,
    /// Config store file, from `CONFIG_STORE_PATH`.
    pub store_path: PathBuf,
    /// Outbound LLM request timeout, from `LLM_TIMEOUT_SECS`. Unset means none.
    pub llm_timeout_secs: Option<u64>,
}

impl ApiSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let address = env::var("API_ADDRESS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.into());
        let store_path = env::var("CONFIG_STORE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(FileStorage::default_path);

        Ok(Self {
            address,
            store_path,
            llm_timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
        })
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Stateless translation relay.
    pub relay: TranslationRelay,
    /// Server-side config store; writers are serialized by the lock.
    pub configs: Arc<RwLock<ConfigStore>>,
}

impl AppState {
    pub fn new(relay: TranslationRelay, configs: ConfigStore) -> Self {
        Self {
            relay,
            configs: Arc::new(RwLock::new(configs)),
        }
    }

    /// Runs `f` against the config store on the blocking pool.
    ///
    /// Every mutation persists through storage, which may be synchronous
    /// file IO, so it must not run on a runtime worker.
    pub async fn mutate_configs<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut ConfigStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let configs = Arc::clone(&self.configs);
        let result = task::spawn_blocking(move || f(&mut configs.blocking_write())).await?;
        Ok(result?)
    }

    /// Builds the relay and a file-backed store seeded from the environment.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self, AppError> {
        let relay = TranslationRelay::new(settings.llm_timeout_secs)?;
        let storage = Arc::new(FileStorage::new(settings.store_path.clone()));
        let seeds = SeedSettings::from_env().seed_configs();

        Ok(Self::new(relay, ConfigStore::load(storage, seeds)))
    }
}
