use std::env;

use serde::{Deserialize, Serialize};

fn default_api_base() -> String {
    "https://api.arasaac.org/api".to_string()
}

fn default_static_base() -> String {
    "https://static.arasaac.org".to_string()
}

fn default_language() -> String {
    "es".to_string()
}

fn default_timeout_secs() -> u64 {
    4
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArasaacConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_static_base")]
    pub static_base: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Per-lookup timeout. No retry on expiry.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ArasaacConfig {
    pub fn from_env() -> Self {
        let api_base = env::var("ARASAAC_API_BASE").unwrap_or_else(|_| default_api_base());
        let static_base =
            env::var("ARASAAC_STATIC_BASE").unwrap_or_else(|_| default_static_base());
        let language = env::var("ARASAAC_LANGUAGE").unwrap_or_else(|_| default_language());
        let timeout_secs = env::var("ARASAAC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_secs);

        Self {
            api_base,
            static_base,
            language,
            timeout_secs,
        }
    }
}

impl Default for ArasaacConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            static_base: default_static_base(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
