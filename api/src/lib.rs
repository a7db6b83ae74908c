use std::{error::Error, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::{ApiSettings, AppState};
use crate::{
    error_handler::AppError,
    routes::{
        configs::config_routes::{
            create_config, delete_config, list_configs, reset_configs, select_config,
            update_config,
        },
        languages_route::languages,
        translate::translate_route::translate,
    },
};

/// Builds the HTTP router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/translate", post(translate))
        .route("/api/languages", get(languages))
        .route("/api/configs", get(list_configs).post(create_config))
        .route("/api/configs/reset", post(reset_configs))
        .route(
            "/api/configs/{id}",
            put(update_config).delete(delete_config),
        )
        .route("/api/configs/{id}/active", put(select_config))
        .with_state(state)
}

/// Reads settings from the environment, binds, and serves until Ctrl+C.
pub async fn start() -> Result<(), Box<dyn Error>> {
    let settings = ApiSettings::from_env()?;
    let state = Arc::new(AppState::from_settings(&settings)?);

    let listener = tokio::net::TcpListener::bind(&settings.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %settings.address, store = %settings.store_path.display(), "translator API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("translator API stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
