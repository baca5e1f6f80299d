use std::time::Duration;

use muna_config::arasaac::ArasaacConfig;
use serde::Deserialize;

use crate::PictogramSource;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("network error querying ARASAAC: {0}")]
    Network(#[from] reqwest::Error),

    #[error("ARASAAC returned status {0}")]
    Status(u16),

    #[error("ARASAAC returned no match")]
    NoMatch,
}

/// Best-match search client for the ARASAAC pictogram API.
///
/// A hit is turned into a canonical static-asset URL built from the match
/// identifier; every failure mode collapses to `None` at the
/// `PictogramSource` boundary. Single attempt, no retry.
#[derive(Clone)]
pub struct ArasaacClient {
    config: ArasaacConfig,
    client: reqwest::Client,
}

impl ArasaacClient {
    pub fn new(config: ArasaacConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { config, client }
    }

    async fn best_search(&self, term: &str) -> Result<String, SearchError> {
        let url = format!(
            "{}/pictograms/{}/bestsearch/{}",
            self.config.api_base, self.config.language, term
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let matches: Vec<PictogramMatch> = response.json().await?;
        let first = matches.first().ok_or(SearchError::NoMatch)?;

        Ok(self.image_url(first.id))
    }

    /// Canonical static URL for a pictogram id: the id appears in both the
    /// directory and the filename, with a fixed size suffix.
    fn image_url(&self, id: u64) -> String {
        format!(
            "{}/pictograms/{id}/{id}_500.png",
            self.config.static_base
        )
    }
}

#[async_trait::async_trait]
impl PictogramSource for ArasaacClient {
    async fn resolve(&self, term: &str) -> Option<String> {
        match self.best_search(term).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("no pictogram for '{term}': {e}");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct PictogramMatch {
    #[serde(rename = "_id")]
    id: u64,
}
