//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided media element and track catalog into
//! the playback core. Desktop apps typically enable the `desktop-shims`
//! feature (which depends on `bridge-desktop`), whereas WebAssembly builds
//! enable the `wasm` feature and drive an `<audio>` element through
//! `bridge-wasm`.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::TrackCatalog;
use core_playback::{fetch_tracks, PlaybackService, PlaylistController};
use core_runtime::{init_logging, PlayerConfig};
use parking_lot::Mutex;
use tracing::info;

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use bridge_desktop::{HeadlessMediaElement, HttpTrackCatalog};
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use bridge_wasm::media::HtmlAudioMediaElement;

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    catalog: Arc<dyn TrackCatalog>,
    playback: PlaybackService,
    playlist: Arc<Mutex<PlaylistController>>,
}

impl CoreService {
    /// Build the playback service and playlist from `config`.
    ///
    /// Installs the global log subscriber when the config carries a
    /// logging section.
    pub fn new(config: PlayerConfig) -> Result<Self> {
        config.validate()?;

        if let Some(logging) = config.logging.clone() {
            init_logging(logging)?;
        }

        let playback =
            PlaybackService::with_initial_volume(config.media_element, config.initial_volume)?;
        let playlist = PlaylistController::new(playback.clone());

        info!(volume = config.initial_volume, "Player core initialized");

        Ok(Self {
            catalog: config.track_catalog,
            playback,
            playlist: Arc::new(Mutex::new(playlist)),
        })
    }

    /// Fetch the playlist from the configured catalog.
    ///
    /// Returns the number of tracks loaded.
    pub async fn start(&self) -> Result<usize> {
        let tracks = fetch_tracks(self.catalog.as_ref()).await?;

        let count = tracks.len();
        self.playlist.lock().set_tracks(tracks);
        info!(count, "Player core started");
        Ok(count)
    }

    /// The playback state service.
    pub fn playback(&self) -> &PlaybackService {
        &self.playback
    }

    /// Shared playlist controller.
    pub fn playlist(&self) -> Arc<Mutex<PlaylistController>> {
        Arc::clone(&self.playlist)
    }

    /// Stop playback and release the current session.
    pub fn shutdown(&self) {
        self.playlist.lock().stop();
        info!("Player core shut down");
    }
}

/// Convenience bootstrapper for WebAssembly hosts.
///
/// Reuses (or creates) the `<audio>` element with the given id.
///
/// ```ignore
/// use bridge_traits::StaticTrackCatalog;
/// use core_service::bootstrap_wasm;
/// use std::sync::Arc;
///
/// let core = bootstrap_wasm("player-audio", Arc::new(StaticTrackCatalog::from_json(manifest)?))?;
/// core.start().await?;
/// ```
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub fn bootstrap_wasm(audio_element_id: &str, catalog: Arc<dyn TrackCatalog>) -> Result<CoreService> {
    let element = HtmlAudioMediaElement::attach_to_document(audio_element_id)?;
    let config = PlayerConfig::builder()
        .media_element(Arc::new(element))
        .track_catalog(catalog)
        .build()?;
    CoreService::new(config)
}
