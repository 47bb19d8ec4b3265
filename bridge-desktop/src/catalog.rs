//! HTTP track catalog using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    catalog::{Track, TrackCatalog},
    error::{BridgeError, Result},
};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetches the playlist as a JSON array of tracks from a single endpoint.
///
/// The endpoint is expected to answer `GET` with
/// `[{"url": "...", "name": "...", "artist": "..."}, ...]`. Only `url` is
/// required.
pub struct HttpTrackCatalog {
    client: Client,
    endpoint: Url,
}

impl HttpTrackCatalog {
    /// Create a catalog for `endpoint` with a 30 second request timeout.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(30))
    }

    /// Create a catalog with a custom request timeout.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cloud-player-core/0.1.0")
            .build()
            .map_err(|e| BridgeError::Http(e.to_string()))?;

        Self::with_client(client, endpoint)
    }

    /// Create a catalog around an existing client.
    pub fn with_client(client: Client, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| BridgeError::NotAvailable(format!("invalid catalog endpoint: {e}")))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(BridgeError::NotAvailable(format!(
                "unsupported catalog scheme: {}",
                endpoint.scheme()
            )));
        }

        Ok(Self { client, endpoint })
    }

    /// Catalog endpoint with any query string removed, for logging.
    pub fn display_endpoint(&self) -> String {
        let mut shown = self.endpoint.clone();
        shown.set_query(None);
        shown.set_fragment(None);
        shown.to_string()
    }
}

#[async_trait]
impl TrackCatalog for HttpTrackCatalog {
    async fn list_tracks(&self) -> Result<Vec<Track>> {
        debug!(endpoint = %self.display_endpoint(), "Fetching track catalog");

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Track catalog request failed");
                if e.is_timeout() {
                    BridgeError::Http("Request timed out".to_string())
                } else {
                    BridgeError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Http(format!(
                "catalog responded with HTTP {}",
                status.as_u16()
            )));
        }

        let tracks: Vec<Track> = response
            .json()
            .await
            .map_err(|e| BridgeError::Deserialization(e.to_string()))?;

        info!(count = tracks.len(), "Loaded track catalog");
        Ok(tracks)
    }
}
