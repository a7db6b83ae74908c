pub mod api_format;
pub mod default_config;
pub mod llm_config;
