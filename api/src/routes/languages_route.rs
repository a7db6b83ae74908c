use axum::Json;
use llm_relay::languages::{Language, selectable_languages};

/// GET /api/languages
///
/// Auto-detect first, then every supported language.
pub async fn languages() -> Json<Vec<Language>> {
    Json(selectable_languages())
}
