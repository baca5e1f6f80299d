use std::env;

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Absent key means degraded mode: the service starts but model calls
    /// fail lazily.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| default_model());
        let api_base = env::var("GEMINI_API_BASE").unwrap_or_else(|_| default_api_base());

        Self {
            api_key,
            model,
            api_base,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
        }
    }
}
