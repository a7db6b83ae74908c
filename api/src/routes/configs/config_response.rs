use llm_relay::LlmConfig;
use serde::Serialize;

/// Body of `GET /api/configs` and `POST /api/configs/reset`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigListResponse {
    pub configs: Vec<LlmConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}
