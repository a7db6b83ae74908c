//! Supported language codes and their English names.

use serde::Serialize;

/// Sentinel source language meaning "let the model figure it out".
pub const AUTO_DETECT: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

const fn lang(code: &'static str, name: &'static str) -> Language {
    Language { code, name }
}

/// Code → English name lookup table.
pub const LANGUAGES: [Language; 14] = [
    lang("en", "English"),
    lang("es", "Spanish"),
    lang("fr", "French"),
    lang("de", "German"),
    lang("it", "Italian"),
    lang("pt", "Portuguese"),
    lang("ru", "Russian"),
    lang("ja", "Japanese"),
    lang("ko", "Korean"),
    lang("zh", "Chinese"),
    lang("ar", "Arabic"),
    lang("hi", "Hindi"),
    lang("th", "Thai"),
    lang("vi", "Vietnamese"),
];

/// English name for `code`, or `code` itself if it is not in the table.
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.name)
        .unwrap_or(code)
}

/// Languages offered for selection: auto-detect first, then the table.
pub fn selectable_languages() -> Vec<Language> {
    std::iter::once(lang(AUTO_DETECT, "Detect language"))
        .chain(LANGUAGES)
        .collect()
}
