mod client;

pub use client::{ArasaacClient, SearchError};

/// Pictogram lookup backend. `resolve` absorbs every failure into `None`;
/// a term that cannot be resolved never fails the batch it belongs to.
#[async_trait::async_trait]
pub trait PictogramSource: Send + Sync {
    async fn resolve(&self, term: &str) -> Option<String>;
}

/// Resolve every term concurrently, one lookup per term, and return the
/// results in input order regardless of completion order.
pub async fn resolve_all(source: &dyn PictogramSource, terms: &[String]) -> Vec<Option<String>> {
    let lookups = terms.iter().map(|term| source.resolve(term));
    futures::future::join_all(lookups).await
}
