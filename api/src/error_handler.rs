use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use config_store::StoreError;
use llm_relay::{ConfigError, RelayError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    #[error("background task failed")]
    Task(#[from] tokio::task::JoinError),

    // --- Request / routing ---
    #[error("{0}")]
    BadRequest(String),

    // --- Domain ---
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            AppError::Relay(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::Store(e) => match e {
                StoreError::Validation(_) => StatusCode::BAD_REQUEST,
                StoreError::DuplicateId(_) => StatusCode::CONFLICT,
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::BuiltinProtected(_) => StatusCode::FORBIDDEN,
                StoreError::MalformedStoredConfig(_)
                | StoreError::Serialize(_)
                | StoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },

            AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // startup-only
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Task(_) => "TASK_FAILED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Relay(e) => match e {
                RelayError::MissingFields => "MISSING_FIELDS",
                RelayError::TextTooLong { .. } => "TEXT_TOO_LONG",
                RelayError::Endpoint(_) => "ENDPOINT_ERROR",
                RelayError::Transport(_) => "TRANSPORT_ERROR",
                RelayError::Decode { .. } => "DECODE_ERROR",
                RelayError::InvalidHeader { .. } => "INVALID_HEADER",
                RelayError::UnreachableEndpoint => "UNREACHABLE_ENDPOINT",
                _ => "RELAY_ERROR",
            },
            AppError::Store(e) => match e {
                StoreError::Validation(_) => "INVALID_CONFIG",
                StoreError::DuplicateId(_) => "DUPLICATE_ID",
                StoreError::NotFound(_) => "CONFIG_NOT_FOUND",
                StoreError::BuiltinProtected(_) => "BUILTIN_PROTECTED",
                StoreError::MalformedStoredConfig(_)
                | StoreError::Serialize(_)
                | StoreError::Storage(_) => "STORAGE_ERROR",
            },
        }
    }
}

/// Error body: `error` carries the human-readable message shown to users.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
            code: self.error_code(),
        };

        if status.is_server_error() {
            error!(%status, code = body.code, error = %body.error, "request failed");
        } else {
            warn!(%status, code = body.code, error = %body.error, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Unparseable or mistyped JSON bodies are client errors.
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}
