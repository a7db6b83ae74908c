use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use llm_relay::{TranslationRequest, TranslationResponse};
use tracing::debug;

use crate::{core::app_state::AppState, error_handler::AppResult};

/// POST /api/translate
///
/// Relays one translation to the LLM endpoint described by `config`.
/// Missing fields and oversized text are 400; endpoint failures are 500.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> AppResult<Json<TranslationResponse>> {
    let Json(request) = payload?;
    debug!(
        target_lang = request.target_lang.as_deref().unwrap_or_default(),
        config = request.config.as_ref().map(|c| c.id.as_str()).unwrap_or_default(),
        "translate request"
    );

    let response = state.relay.translate(request).await?;
    Ok(Json(response))
}
