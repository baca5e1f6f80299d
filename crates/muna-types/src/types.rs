use serde::{Deserialize, Serialize};

/// One concept extracted from a phrase by the generative model.
///
/// `search_term` keeps the `busqueda_arasaac` wire name so the model's JSON
/// output deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationItem {
    pub original: String,
    #[serde(rename = "busqueda_arasaac", default)]
    pub search_term: String,
}

impl TranslationItem {
    /// Term to send to the pictogram search, falling back to the original
    /// word when the model returned an empty search term.
    pub fn effective_term(&self) -> &str {
        if self.search_term.trim().is_empty() {
            &self.original
        } else {
            &self.search_term
        }
    }
}

/// Outcome of resolving one translated concept against the pictogram
/// repository. `image_url` is `None` when no pictogram was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictogramResult {
    pub word: String,
    pub image_url: Option<String>,
}

impl PictogramResult {
    /// Keep only resolved words; unresolved ones are dropped from the
    /// phrase-translation response rather than reported as nulls.
    pub fn into_resolved(self) -> Option<TranslatedWord> {
        self.image_url.map(|imagen| TranslatedWord {
            palabra: self.word,
            imagen,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    pub texto: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectRequest {
    pub original: String,
    pub aclaracion: String,
}

/// One entry of the `/translate` response. Words whose resolution failed are
/// omitted entirely, so `imagen` is always present here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedWord {
    pub palabra: String,
    pub imagen: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub status: String,
    pub data: Vec<TranslatedWord>,
}

impl TranslateResponse {
    pub fn ok(data: Vec<TranslatedWord>) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}

/// Response for `/correct`. Unlike `/translate`, the attempted term is always
/// reported even when resolution failed (`nuevo_url: null`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectResponse {
    pub status: String,
    pub nuevo_url: Option<String>,
    pub termino_usado: String,
}

impl CorrectResponse {
    pub fn ok(termino_usado: String, nuevo_url: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            nuevo_url,
            termino_usado,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_item_uses_model_wire_field() {
        let item: TranslationItem =
            serde_json::from_str(r#"{"original":"agua","busqueda_arasaac":"agua"}"#).unwrap();
        assert_eq!(item.original, "agua");
        assert_eq!(item.search_term, "agua");
    }

    #[test]
    fn unresolved_results_are_dropped() {
        let hit = PictogramResult {
            word: "agua".to_string(),
            image_url: Some("https://static.example/agua.png".to_string()),
        };
        let miss = PictogramResult {
            word: "zzz".to_string(),
            image_url: None,
        };

        assert_eq!(
            hit.into_resolved().map(|w| w.palabra),
            Some("agua".to_string())
        );
        assert!(miss.into_resolved().is_none());
    }

    #[test]
    fn effective_term_falls_back_to_original() {
        let item = TranslationItem {
            original: "papá".to_string(),
            search_term: "  ".to_string(),
        };
        assert_eq!(item.effective_term(), "papá");
    }
}
