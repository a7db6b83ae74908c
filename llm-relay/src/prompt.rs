use crate::languages::{AUTO_DETECT, language_name};

/// Substituted for the source language when it is [`AUTO_DETECT`].
pub const DETECTED_LANGUAGE: &str = "the detected language";

/// Builds the single-turn translation instruction sent to the model.
pub fn build_prompt(text: &str, source_lang: &str, target_lang: &str) -> String {
    let source = if source_lang == AUTO_DETECT {
        DETECTED_LANGUAGE
    } else {
        language_name(source_lang)
    };
    let target = language_name(target_lang);

    format!(
        "Translate the following text from {source} to {target}. \
         Only return the translation, nothing else:\n\n{text}"
    )
}
