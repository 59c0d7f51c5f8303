//! GIF lookup against the Giphy random endpoint.
//!
//! The image is decoration: no key, a failed request or an unexpected body
//! all yield `None` and the message goes out without it. There is no retry.

use crate::retry::FetchError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, instrument, warn};
use url::Url;

/// Upper bound on the single lookup.
pub const GIF_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RandomGifResponse {
    data: GifData,
}

#[derive(Debug, Deserialize)]
struct GifData {
    images: GifImages,
}

#[derive(Debug, Deserialize)]
struct GifImages {
    original: GifRendition,
}

#[derive(Debug, Deserialize)]
struct GifRendition {
    url: String,
}

#[derive(Debug, Clone)]
pub struct GifClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    rating: String,
    timeout: Duration,
}

impl GifClient {
    pub fn new(http: Client, base_url: Url, api_key: Option<String>, rating: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
            rating,
            timeout: GIF_TIMEOUT,
        }
    }

    async fn search(&self, api_key: &str, tag: &str) -> Result<String, FetchError> {
        let mut url = self
            .base_url
            .join("v1/gifs/random")
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("tag", tag)
            .append_pair("rating", &self.rating);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let parsed: RandomGifResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
        let url = parsed.data.images.original.url;
        if url.is_empty() {
            return Err(FetchError::Parse("empty image url".to_string()));
        }
        Ok(url)
    }

    /// A GIF URL for `tag`, if one can be had.
    #[instrument(level = "info", skip_all, fields(tag = %tag))]
    pub async fn fetch(&self, tag: &str) -> Option<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("GIPHY_API_KEY not set; sending without a GIF");
            return None;
        };

        let result = match timeout(self.timeout, self.search(api_key, tag)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        match result {
            Ok(url) => {
                info!(%url, "Fetched GIF");
                Some(url)
            }
            Err(e) => {
                warn!(error = %e, "GIF lookup failed; sending without a GIF");
                None
            }
        }
    }
}
