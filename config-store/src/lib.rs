//! Config store for LLM endpoint configurations.
//!
//! Holds an ordered list of [`LlmConfig`](llm_relay::LlmConfig) entries and
//! the id of the active one. Every mutation is mirrored to a
//! [`KeyValueStorage`] backend under two keys:
//! - [`CONFIGS_KEY`]  → JSON array of configs
//! - [`SELECTED_KEY`] → JSON of the active config

pub mod errors;
pub mod storage;
pub mod store;

pub use errors::{StorageError, StoreError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{CONFIGS_KEY, ConfigDraft, ConfigPatch, ConfigStore, SELECTED_KEY};
