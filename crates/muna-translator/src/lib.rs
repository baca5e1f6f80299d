use std::collections::BTreeMap;
use std::sync::Arc;

use muna_store::CorrectionStore;
use muna_types::TranslationItem;
use serde_json::Value;

mod gemini;
mod prompt;

pub use gemini::GeminiClient;

/// Generative-model backend. One implementation talks to Gemini; tests
/// substitute fakes.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one generation request expected to produce a JSON payload and
    /// return its raw text.
    async fn generate_json(&self, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("no API key configured for the generative model")]
    MissingApiKey,

    #[error("network error calling the generative model: {0}")]
    Network(#[from] reqwest::Error),

    #[error("generative model returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("generative model returned no candidates")]
    EmptyResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("model output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model output has an unexpected shape: {0}")]
    ResponseShape(String),
}

/// Turns colloquial phrases into ARASAAC search terms through a generative
/// model, feeding learned corrections into every prompt as priority rules.
pub struct TermTranslator {
    model: Arc<dyn GenerativeModel>,
    store: Arc<CorrectionStore>,
}

impl TermTranslator {
    pub fn new(model: Arc<dyn GenerativeModel>, store: Arc<CorrectionStore>) -> Self {
        Self { model, store }
    }

    /// Decompose a phrase into an ordered sequence of search terms.
    ///
    /// Stored corrections are read first and rendered into the prompt ahead
    /// of the general simplification rules, so they win whenever both would
    /// apply to the same word.
    pub async fn translate_phrase(
        &self,
        phrase: &str,
    ) -> Result<Vec<TranslationItem>, TranslateError> {
        let corrections = match self.store.load().await {
            Ok(corrections) => corrections,
            Err(e) => {
                tracing::warn!("could not load corrections, prompting without them: {e}");
                BTreeMap::new()
            }
        };

        let prompt = prompt::phrase_prompt(phrase, &corrections);
        let raw = self.model.generate_json(&prompt).await?;
        parse_item_list(&raw)
    }

    /// Derive one corrected search term for a mis-resolved word from the
    /// user's free-text clarification.
    pub async fn translate_single_term(
        &self,
        original: &str,
        clarification: &str,
    ) -> Result<String, TranslateError> {
        let prompt = prompt::single_term_prompt(original, clarification);
        let raw = self.model.generate_json(&prompt).await?;

        let value: Value = serde_json::from_str(&raw)?;
        match value.get("busqueda_arasaac").and_then(Value::as_str) {
            Some(term) if !term.trim().is_empty() => Ok(term.trim().to_string()),
            _ => Err(TranslateError::ResponseShape(
                "expected a {\"busqueda_arasaac\": ...} object".to_string(),
            )),
        }
    }
}

/// Parse the model's term list. The model usually emits a bare array but
/// occasionally wraps it under a single key; anything else is rejected
/// instead of indexed blindly.
fn parse_item_list(raw: &str) -> Result<Vec<TranslationItem>, TranslateError> {
    let value: Value = serde_json::from_str(raw)?;

    let list = match value {
        Value::Array(_) => value,
        Value::Object(map) if map.len() == 1 => {
            let inner = map.into_iter().next().map(|(_, v)| v);
            match inner {
                Some(inner @ Value::Array(_)) => inner,
                _ => {
                    return Err(TranslateError::ResponseShape(
                        "wrapped value is not an array".to_string(),
                    ));
                }
            }
        }
        other => {
            return Err(TranslateError::ResponseShape(format!(
                "expected an array or a single-key wrapper, got {other}"
            )));
        }
    };

    Ok(serde_json::from_value(list)?)
}
