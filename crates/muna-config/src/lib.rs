use std::env;
use std::net::SocketAddr;

use self::arasaac::ArasaacConfig;
use self::gemini::GeminiConfig;

pub mod arasaac;
pub mod gemini;

pub struct Config {
    pub gemini: GeminiConfig,
    pub arasaac: ArasaacConfig,

    /// JSON file holding learned corrections.
    pub corrections_path: String,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Self {
        let corrections_path =
            env::var("CORRECTIONS_PATH").unwrap_or_else(|_| "correcciones.json".to_string());

        let listen_addr = env::var("LISTEN_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| "0.0.0.0:8000".parse().expect("static addr"));

        Config {
            gemini: GeminiConfig::from_env(),
            arasaac: ArasaacConfig::from_env(),
            corrections_path,
            listen_addr,
        }
    }
}
