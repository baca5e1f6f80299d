use std::sync::Arc;

use muna_arasaac::{ArasaacClient, PictogramSource};
use muna_config::Config;
use muna_store::CorrectionStore;
use muna_translator::{GeminiClient, GenerativeModel, TermTranslator};

/// Shared handler state. Every collaborator is constructed once at startup
/// and injected here; tests swap in fakes behind the same trait objects.
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<TermTranslator>,
    pub pictograms: Arc<dyn PictogramSource>,
    pub store: Arc<CorrectionStore>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let model: Arc<dyn GenerativeModel> =
            Arc::new(GeminiClient::new(config.gemini.clone()));
        let store = Arc::new(CorrectionStore::new(&config.corrections_path));
        let pictograms: Arc<dyn PictogramSource> =
            Arc::new(ArasaacClient::new(config.arasaac.clone()));

        Self {
            translator: Arc::new(TermTranslator::new(model, store.clone())),
            pictograms,
            store,
        }
    }
}
