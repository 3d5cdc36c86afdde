pub mod model;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::{config::Config, store::SearchQuery};

pub use model::{SearchResponse, Track};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Catalog returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Track has no preview")]
    NoPreview,
}

#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Track>, ApiError>;
}

pub struct CatalogClient {
    client: Client,
    base_url: String,
    country: String,
    media: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            country: config.country.clone(),
            media: config.media.clone(),
        })
    }

    pub async fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        if url.is_empty() {
            return Err(ApiError::NoPreview);
        }

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let bytes = response.bytes().await?;
        debug!(url, len = bytes.len(), "preview_downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SearchApi for CatalogClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Track>, ApiError> {
        info!(
            term = query.term.as_str(),
            offset = query.offset(),
            limit = query.page_size,
            "catalog_search"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("term", query.term.as_str()),
                ("country", self.country.as_str()),
                ("media", self.media.as_str()),
            ])
            .query(&[("offset", query.offset()), ("limit", query.page_size)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.into_tracks())
    }
}
