//! Track catalog bridge.
//!
//! The playlist is sourced from an external collaborator (a cloud bucket
//! listing, a static manifest, a media server). The core only needs the final
//! ordered list of playable items, delivered once and complete.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};

/// A playable item supplied by a [`TrackCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Resolvable media URL handed to the media element.
    pub url: String,
    /// Display title, when the catalog knows one.
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    /// Display artist, when the catalog knows one.
    #[serde(default)]
    pub artist: Option<String>,
}

impl Track {
    /// Create a track with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            artist: None,
        }
    }

    /// Attach a display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a display artist.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }
}

/// Source of the ordered track list.
///
/// Implementations return the complete list in a single call; pagination and
/// authentication are the implementation's concern.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait TrackCatalog: PlatformSendSync {
    /// Fetch every playable track, in playlist order.
    async fn list_tracks(&self) -> Result<Vec<Track>>;
}

/// In-memory catalog, useful for fixed manifests and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTrackCatalog {
    tracks: Vec<Track>,
}

impl StaticTrackCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse a JSON array of tracks (`[{"url": "...", "name": "..."}]`).
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks = serde_json::from_str(json)?;
        Ok(Self { tracks })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl TrackCatalog for StaticTrackCatalog {
    async fn list_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    #[tokio::test]
    async fn static_catalog_preserves_order() {
        let catalog = StaticTrackCatalog::new(vec![
            Track::new("https://cdn.example.com/a.mp3"),
            Track::new("https://cdn.example.com/b.mp3"),
        ]);

        let tracks = catalog.list_tracks().await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].url, "https://cdn.example.com/a.mp3");
        assert_eq!(tracks[1].url, "https://cdn.example.com/b.mp3");
    }

    #[tokio::test]
    async fn from_json_accepts_name_alias() {
        let catalog = StaticTrackCatalog::from_json(
            r#"[
                {"url": "https://cdn.example.com/1.mp3", "name": "Intro", "artist": "Band"},
                {"url": "https://cdn.example.com/2.mp3"}
            ]"#,
        )
        .unwrap();

        let tracks = catalog.list_tracks().await.unwrap();
        assert_eq!(
            tracks[0],
            Track::new("https://cdn.example.com/1.mp3")
                .with_title("Intro")
                .with_artist("Band")
        );
        assert_eq!(tracks[1].title, None);
    }

    #[test]
    fn from_json_rejects_missing_url() {
        let err = StaticTrackCatalog::from_json(r#"[{"name": "No url"}]"#).unwrap_err();
        assert!(matches!(err, BridgeError::Deserialization(_)));
    }
}
