//! # Player Configuration Module
//!
//! Builder-based configuration for the player core.
//!
//! ## Overview
//!
//! [`PlayerConfig`] holds the host capabilities the core needs and the few
//! settings it honours. The builder enforces fail-fast validation: a missing
//! capability is reported at build time with an actionable message instead
//! of surfacing later as a silent playback failure.
//!
//! ## Required Dependencies
//!
//! - `MediaElement` - the host audio primitive
//! - `TrackCatalog` - source of the playlist
//!
//! When the `desktop-shims` feature is enabled, a headless media element is
//! injected if none is provided, and a catalog URL can stand in for a
//! `TrackCatalog` implementation.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::{StaticTrackCatalog, Track};
//! use core_runtime::config::PlayerConfig;
//! use std::sync::Arc;
//!
//! let config = PlayerConfig::builder()
//!     .media_element(Arc::new(MyAudioElement::new()))
//!     .track_catalog(Arc::new(StaticTrackCatalog::new(vec![
//!         Track::new("https://cdn.example.com/intro.mp3"),
//!     ])))
//!     .initial_volume(0.8)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use bridge_traits::{MediaElement, TrackCatalog};
use std::sync::Arc;

/// Volume applied when the builder is not given one.
pub const DEFAULT_INITIAL_VOLUME: f64 = 1.0;

/// Configuration for the player core.
///
/// Use [`PlayerConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct PlayerConfig {
    /// Host audio primitive driven by the playback service
    pub media_element: Arc<dyn MediaElement>,

    /// Source of the ordered track list
    pub track_catalog: Arc<dyn TrackCatalog>,

    /// Output volume applied at startup, in `[0.0, 1.0]`
    pub initial_volume: f64,

    /// Logging setup; `None` leaves subscriber installation to the host
    pub logging: Option<LoggingConfig>,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("media_element", &"MediaElement { ... }")
            .field("track_catalog", &"TrackCatalog { ... }")
            .field("initial_volume", &self.initial_volume)
            .field("logging", &self.logging)
            .finish()
    }
}

impl PlayerConfig {
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Only the volume can be wrong once the capabilities are present.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::Config(format!(
                "Initial volume {} is outside [0.0, 1.0]",
                self.initial_volume
            )));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn media_element_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "MediaElement".to_string(),
        message: "MediaElement implementation is required for playback. \
                 Desktop: enable the 'desktop-shims' feature to use the default HeadlessMediaElement. \
                 Web: inject bridge_wasm::media::HtmlAudioMediaElement. \
                 Mobile: inject a wrapper around the platform media player."
            .to_string(),
    }
}

fn track_catalog_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "TrackCatalog".to_string(),
        message: "TrackCatalog implementation is required to populate the playlist. \
                 Inject a StaticTrackCatalog for fixed manifests, or set .catalog_url() \
                 with the 'desktop-shims' feature enabled to fetch a JSON manifest over HTTP."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_media_element() -> Result<Arc<dyn MediaElement>> {
    use bridge_desktop::HeadlessMediaElement;

    let element: Arc<dyn MediaElement> = Arc::new(HeadlessMediaElement::new());
    Ok(element)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_media_element() -> Result<Arc<dyn MediaElement>> {
    Err(media_element_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_http_catalog(endpoint: &str) -> Result<Arc<dyn TrackCatalog>> {
    use bridge_desktop::HttpTrackCatalog;

    let catalog = HttpTrackCatalog::new(endpoint)
        .map_err(|e| Error::Config(format!("Invalid catalog URL: {}", e)))?;
    let catalog: Arc<dyn TrackCatalog> = Arc::new(catalog);
    Ok(catalog)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_http_catalog(_endpoint: &str) -> Result<Arc<dyn TrackCatalog>> {
    Err(track_catalog_missing_error())
}

/// Builder for [`PlayerConfig`].
#[derive(Default)]
pub struct PlayerConfigBuilder {
    media_element: Option<Arc<dyn MediaElement>>,
    track_catalog: Option<Arc<dyn TrackCatalog>>,
    catalog_url: Option<String>,
    initial_volume: Option<f64>,
    logging: Option<LoggingConfig>,
}

impl PlayerConfigBuilder {
    /// Sets the host media element.
    pub fn media_element(mut self, element: Arc<dyn MediaElement>) -> Self {
        self.media_element = Some(element);
        self
    }

    /// Sets the track catalog. Takes precedence over [`catalog_url`](Self::catalog_url).
    pub fn track_catalog(mut self, catalog: Arc<dyn TrackCatalog>) -> Self {
        self.track_catalog = Some(catalog);
        self
    }

    /// Fetch the playlist from a JSON endpoint (requires `desktop-shims`).
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = Some(url.into());
        self
    }

    /// Sets the startup volume (defaults to 1.0).
    pub fn initial_volume(mut self, volume: f64) -> Self {
        self.initial_volume = Some(volume);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when a required capability has no
    ///   implementation and no platform default applies
    /// - [`Error::Config`] when a setting is out of range
    pub fn build(self) -> Result<PlayerConfig> {
        let media_element = match self.media_element {
            Some(element) => element,
            None => provide_default_media_element()?,
        };

        let track_catalog = match (self.track_catalog, self.catalog_url) {
            (Some(catalog), _) => catalog,
            (None, Some(url)) => provide_http_catalog(&url)?,
            (None, None) => return Err(track_catalog_missing_error()),
        };

        let config = PlayerConfig {
            media_element,
            track_catalog,
            initial_volume: self.initial_volume.unwrap_or(DEFAULT_INITIAL_VOLUME),
            logging: self.logging,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{
        error::Result as BridgeResult, ListenerId, MediaEventListener, StaticTrackCatalog, Track,
    };

    struct NullMediaElement;

    impl MediaElement for NullMediaElement {
        fn set_src(&self, _url: &str) -> BridgeResult<()> {
            Ok(())
        }
        fn load(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn play(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn pause(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn set_current_time(&self, _seconds: f64) -> BridgeResult<()> {
            Ok(())
        }
        fn duration(&self) -> f64 {
            f64::NAN
        }
        fn volume(&self) -> f64 {
            1.0
        }
        fn set_volume(&self, _volume: f64) -> BridgeResult<()> {
            Ok(())
        }
        fn has_source(&self) -> bool {
            false
        }
        fn add_listener(&self, _listener: MediaEventListener) -> ListenerId {
            ListenerId::new(0)
        }
        fn remove_listener(&self, _id: ListenerId) {}
    }

    fn catalog() -> Arc<dyn TrackCatalog> {
        Arc::new(StaticTrackCatalog::new(vec![Track::new(
            "https://cdn.example.com/a.mp3",
        )]))
    }

    #[test]
    fn test_builder_with_all_required_fields() {
        let config = PlayerConfig::builder()
            .media_element(Arc::new(NullMediaElement))
            .track_catalog(catalog())
            .build()
            .unwrap();

        assert_eq!(config.initial_volume, DEFAULT_INITIAL_VOLUME);
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_builder_requires_track_catalog() {
        let err = PlayerConfig::builder()
            .media_element(Arc::new(NullMediaElement))
            .build()
            .unwrap_err();

        match err {
            Error::CapabilityMissing { capability, message } => {
                assert_eq!(capability, "TrackCatalog");
                assert!(message.contains("StaticTrackCatalog"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_media_element() {
        let err = PlayerConfig::builder()
            .track_catalog(catalog())
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::CapabilityMissing { ref capability, .. } if capability == "MediaElement"
        ));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_defaults() {
        let config = PlayerConfig::builder()
            .catalog_url("https://bucket.example.com/tracks.json")
            .build()
            .unwrap();

        assert!(!config.media_element.has_source());
        assert_eq!(config.media_element.volume(), 1.0);
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_invalid_catalog_url_is_config_error() {
        let err = PlayerConfig::builder()
            .catalog_url("ftp://bucket.example.com/tracks.json")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range_volume() {
        for volume in [-0.1, 1.01, f64::NAN] {
            let result = PlayerConfig::builder()
                .media_element(Arc::new(NullMediaElement))
                .track_catalog(catalog())
                .initial_volume(volume)
                .build();

            assert!(matches!(result, Err(Error::Config(_))), "volume {volume}");
        }
    }

    #[test]
    fn test_builder_keeps_logging_config() {
        let config = PlayerConfig::builder()
            .media_element(Arc::new(NullMediaElement))
            .track_catalog(catalog())
            .initial_volume(0.4)
            .logging(LoggingConfig::default().with_filter("core_playback=trace"))
            .build()
            .unwrap();

        assert_eq!(config.initial_volume, 0.4);
        assert_eq!(
            config.logging.and_then(|l| l.filter),
            Some("core_playback=trace".to_string())
        );
    }

    #[test]
    fn test_config_debug_hides_capabilities() {
        let config = PlayerConfig::builder()
            .media_element(Arc::new(NullMediaElement))
            .track_catalog(catalog())
            .build()
            .unwrap();

        let rendered = format!("{:?}", config);
        assert!(rendered.contains("MediaElement { ... }"));
        assert!(rendered.contains("initial_volume: 1.0"));
    }
}
