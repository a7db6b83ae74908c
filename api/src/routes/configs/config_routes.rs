use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use config_store::{ConfigDraft, ConfigPatch, ConfigStore};
use llm_relay::LlmConfig;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::configs::config_response::{ConfigListResponse, DeletedResponse, UpdatedResponse},
};

fn snapshot(store: &ConfigStore) -> ConfigListResponse {
    ConfigListResponse {
        configs: store.list().to_vec(),
        active_id: store.active_id().map(str::to_owned),
    }
}

/// GET /api/configs
pub async fn list_configs(State(state): State<Arc<AppState>>) -> Json<ConfigListResponse> {
    let store = state.configs.read().await;
    Json(snapshot(&store))
}

/// POST /api/configs
///
/// Adds a config and returns it with its assigned id (201).
pub async fn create_config(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConfigDraft>, JsonRejection>,
) -> AppResult<(StatusCode, Json<LlmConfig>)> {
    let Json(draft) = payload?;
    let created = state.mutate_configs(move |store| store.add(draft)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/configs/{id}
///
/// Unknown ids are not an error: the body reports `updated: false`.
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ConfigPatch>, JsonRejection>,
) -> AppResult<Json<UpdatedResponse>> {
    let Json(patch) = payload?;
    let updated = state
        .mutate_configs(move |store| store.update(&id, patch))
        .await?;
    Ok(Json(UpdatedResponse { updated }))
}

/// DELETE /api/configs/{id}
///
/// Built-in configs are protected (403). Unknown ids report `deleted: false`.
pub async fn delete_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = state.mutate_configs(move |store| store.delete(&id)).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// PUT /api/configs/{id}/active
pub async fn select_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.mutate_configs(move |store| store.select(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/configs/reset
///
/// Restores the seed configs and returns the new list.
pub async fn reset_configs(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ConfigListResponse>> {
    let list = state
        .mutate_configs(|store| {
            store.reset_to_defaults()?;
            Ok(snapshot(store))
        })
        .await?;
    Ok(Json(list))
}
