use crate::model::FetchError;
use crate::source::traits::Fetcher;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub struct FetcherImpl {
    pub client: Client,
}

impl FetcherImpl {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) JobsDeclutter/0.1")
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self { client })
    }

    fn is_remote(location: &str) -> bool {
        location.starts_with("http://") || location.starts_with("https://")
    }
}

#[async_trait::async_trait]
impl Fetcher for FetcherImpl {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        if !Self::is_remote(location) {
            info!("📄 Reading {}", location);
            return Ok(tokio::fs::read_to_string(location).await?);
        }

        info!("🌐 Fetching {}", location);
        let response = self.client.get(location).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::InvalidResponse(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}
