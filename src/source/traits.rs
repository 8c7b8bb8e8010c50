use crate::model::FetchError;

/// Reads a document from a local path or an http(s) URL.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String, FetchError>;
}
