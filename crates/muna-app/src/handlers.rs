use anyhow::Context;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use muna_types::{
    CorrectRequest, CorrectResponse, PictogramResult, TranslateRequest, TranslateResponse,
    TranslatedWord,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/translate", post(translate))
        .route("/correct", post(correct))
        // The web app is served from another origin; allow everything,
        // credentials included.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status":"ok"}))
}

/// Phrase translation. Model failures degrade to an empty result list; this
/// endpoint never reports a transport-level error for upstream problems.
async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Json<TranslateResponse> {
    tracing::info!("translating phrase: {}", request.texto);

    let items = match state.translator.translate_phrase(&request.texto).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("phrase translation failed, returning empty data: {e}");
            Vec::new()
        }
    };

    let terms: Vec<String> = items
        .iter()
        .map(|item| item.effective_term().to_string())
        .collect();
    let urls = muna_arasaac::resolve_all(state.pictograms.as_ref(), &terms).await;

    let data: Vec<TranslatedWord> = items
        .into_iter()
        .zip(urls)
        .map(|(item, image_url)| PictogramResult {
            word: item.original,
            image_url,
        })
        .filter_map(PictogramResult::into_resolved)
        .collect();

    Json(TranslateResponse::ok(data))
}

#[derive(Serialize)]
#[serde(untagged)]
enum CorrectReply {
    Ok(CorrectResponse),
    Err { status: String, message: String },
}

/// Correction flow: derive a better search term from the clarification,
/// persist the learned mapping, then try to resolve it. The attempted term
/// is always reported, even when no pictogram was found.
async fn correct(
    State(state): State<AppState>,
    Json(request): Json<CorrectRequest>,
) -> Json<CorrectReply> {
    tracing::info!(
        "correcting '{}' with clarification '{}'",
        request.original,
        request.aclaracion
    );

    match apply_correction(&state, &request.original, &request.aclaracion).await {
        Ok(response) => Json(CorrectReply::Ok(response)),
        Err(e) => {
            tracing::error!("correction failed: {e:#}");
            Json(CorrectReply::Err {
                status: "error".to_string(),
                message: e.to_string(),
            })
        }
    }
}

async fn apply_correction(
    state: &AppState,
    original: &str,
    clarification: &str,
) -> anyhow::Result<CorrectResponse> {
    let term = match state
        .translator
        .translate_single_term(original, clarification)
        .await
    {
        Ok(term) => term,
        Err(e) => {
            // Degraded mode: the clarification itself becomes the term.
            tracing::warn!("single-term translation failed, using clarification verbatim: {e}");
            clarification.trim().to_string()
        }
    };

    // Persist before resolving: the learned mapping is the durable value
    // even if the lookup below finds nothing.
    state
        .store
        .save(original, &term)
        .await
        .context("persisting correction")?;

    let url = state.pictograms.resolve(&term).await;
    Ok(CorrectResponse::ok(term, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use muna_arasaac::PictogramSource;
    use muna_store::CorrectionStore;
    use muna_translator::{GenerativeModel, ModelError, TermTranslator};
    use tower::ServiceExt;

    struct CannedModel {
        response: Option<String>,
    }

    #[async_trait::async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate_json(&self, _prompt: &str) -> Result<String, ModelError> {
            self.response.clone().ok_or(ModelError::EmptyResponse)
        }
    }

    struct MapSource {
        urls: BTreeMap<String, String>,
    }

    #[async_trait::async_trait]
    impl PictogramSource for MapSource {
        async fn resolve(&self, term: &str) -> Option<String> {
            self.urls.get(term).cloned()
        }
    }

    fn test_state(
        dir: &tempfile::TempDir,
        model_response: Option<&str>,
        urls: &[(&str, &str)],
    ) -> AppState {
        let store = Arc::new(CorrectionStore::new(dir.path().join("correcciones.json")));
        let model: Arc<dyn GenerativeModel> = Arc::new(CannedModel {
            response: model_response.map(str::to_string),
        });
        let pictograms: Arc<dyn PictogramSource> = Arc::new(MapSource {
            urls: urls
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        AppState {
            translator: Arc::new(TermTranslator::new(model, store.clone())),
            pictograms,
            store,
        }
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn translate_returns_resolved_words_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(
            &dir,
            Some(r#"[{"original":"agua","busqueda_arasaac":"agua"}]"#),
            &[("agua", "https://static.example/agua.png")],
        );

        let (status, body) = post_json(router(state), "/translate", r#"{"texto":"quiero agua"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data"][0]["palabra"], "agua");
        assert_eq!(body["data"][0]["imagen"], "https://static.example/agua.png");
    }

    #[tokio::test]
    async fn translate_drops_unresolved_words() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(
            &dir,
            Some(
                r#"[{"original":"agua","busqueda_arasaac":"agua"},
                    {"original":"zzz","busqueda_arasaac":"zzz"}]"#,
            ),
            &[("agua", "https://static.example/agua.png")],
        );

        let (_, body) = post_json(router(state), "/translate", r#"{"texto":"quiero agua zzz"}"#).await;

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["palabra"], "agua");
    }

    #[tokio::test]
    async fn translate_degrades_to_empty_data_on_model_failure() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, None, &[]);

        let (status, body) = post_json(router(state), "/translate", r#"{"texto":"quiero agua"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn correct_persists_mapping_and_reports_term() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(
            &dir,
            Some(r#"{"busqueda_arasaac":"padre"}"#),
            &[("padre", "https://static.example/padre.png")],
        );
        let store = state.store.clone();

        let (status, body) = post_json(
            router(state),
            "/correct",
            r#"{"original":"papá","aclaracion":"padre de familia"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["termino_usado"], "padre");
        assert_eq!(body["nuevo_url"], "https://static.example/padre.png");

        let entries = store.load().await.unwrap();
        assert_eq!(entries.get("papá").map(String::as_str), Some("padre"));
    }

    #[tokio::test]
    async fn correct_falls_back_to_clarification_when_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, None, &[]);
        let store = state.store.clone();

        let (status, body) = post_json(
            router(state),
            "/correct",
            r#"{"original":"papá","aclaracion":"padre"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["termino_usado"], "padre");
        assert!(body["nuevo_url"].is_null());

        let entries = store.load().await.unwrap();
        assert_eq!(entries.get("papá").map(String::as_str), Some("padre"));
    }

    #[tokio::test]
    async fn correct_reports_store_failure_as_structured_error() {
        // A directory in place of the corrections file makes every save fail.
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("correcciones.json");
        std::fs::create_dir(&store_path).unwrap();

        let store = Arc::new(CorrectionStore::new(&store_path));
        let model: Arc<dyn GenerativeModel> = Arc::new(CannedModel {
            response: Some(r#"{"busqueda_arasaac":"padre"}"#.to_string()),
        });
        let pictograms: Arc<dyn PictogramSource> = Arc::new(MapSource {
            urls: BTreeMap::new(),
        });
        let state = AppState {
            translator: Arc::new(TermTranslator::new(model, store.clone())),
            pictograms,
            store,
        };

        let (status, body) = post_json(
            router(state),
            "/correct",
            r#"{"original":"papá","aclaracion":"padre"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn correction_takes_effect_on_later_translations() {
        let dir = tempfile::tempdir().unwrap();

        // First, learn the correction.
        let state = test_state(
            &dir,
            Some(r#"{"busqueda_arasaac":"padre"}"#),
            &[("padre", "https://static.example/padre.png")],
        );
        let (_, body) = post_json(
            router(state.clone()),
            "/correct",
            r#"{"original":"papá","aclaracion":"padre de familia"}"#,
        )
        .await;
        assert_eq!(body["termino_usado"], "padre");

        // The stored entry is now visible to the translator's prompt context.
        let entries = state.store.load().await.unwrap();
        assert_eq!(entries.get("papá").map(String::as_str), Some("padre"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, None, &[]);

        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
