//! # Playlist Controller
//!
//! Keeps an ordered list of tracks, remembers which one is selected, and
//! drives the [`PlaybackService`] so that at most one track plays at a time.
//!
//! Navigation past either end of the list is an error and leaves both the
//! selection and playback untouched.

use bridge_traits::catalog::{Track, TrackCatalog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PlaybackError, Result};
use crate::service::PlaybackService;
use crate::session::PlaybackSession;
use crate::state::PlaybackState;

/// The selected track and its position in the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSelection {
    pub index: usize,
    pub track: Track,
}

/// Playlist navigation on top of a [`PlaybackService`].
pub struct PlaylistController {
    service: PlaybackService,
    tracks: Vec<Track>,
    selection: Option<PlaylistSelection>,
    session: Option<PlaybackSession>,
}

impl PlaylistController {
    /// Controller with an empty playlist.
    pub fn new(service: PlaybackService) -> Self {
        Self::with_tracks(service, Vec::new())
    }

    pub fn with_tracks(service: PlaybackService, tracks: Vec<Track>) -> Self {
        Self {
            service,
            tracks,
            selection: None,
            session: None,
        }
    }

    /// Replace the playlist with whatever `catalog` returns.
    ///
    /// The current selection and playback are left alone. Returns the number
    /// of tracks loaded.
    pub async fn load_from(&mut self, catalog: &dyn TrackCatalog) -> Result<usize> {
        let tracks = fetch_tracks(catalog).await?;
        self.set_tracks(tracks);
        Ok(self.tracks.len())
    }

    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        debug!(count = tracks.len(), "Playlist replaced");
        self.tracks = tracks;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn selection(&self) -> Option<&PlaylistSelection> {
        self.selection.as_ref()
    }

    /// Latest playback snapshot.
    pub fn state(&self) -> PlaybackState {
        self.service.snapshot()
    }

    pub fn service(&self) -> &PlaybackService {
        &self.service
    }

    /// The running session, if one was started and not yet dropped.
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Mutable access to the running session, e.g. to poll its events.
    pub fn session_mut(&mut self) -> Option<&mut PlaybackSession> {
        self.session.as_mut()
    }

    /// Select `track` at `index` and play it, stopping whatever was playing.
    ///
    /// `index` must be a position in the current playlist.
    pub fn open_track(&mut self, track: Track, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(self.out_of_range(index));
        }

        info!(index, title = ?track.title, "Opening track");

        self.selection = Some(PlaylistSelection {
            index,
            track: track.clone(),
        });

        self.service.stop();
        self.session = None;
        self.session = Some(self.service.play_stream(&track.url)?);
        Ok(())
    }

    /// Open the track stored at `index`.
    pub fn open_index(&mut self, index: usize) -> Result<()> {
        let track = self
            .tracks
            .get(index)
            .cloned()
            .ok_or_else(|| self.out_of_range(index))?;
        self.open_track(track, index)
    }

    /// Open the track before the current one.
    pub fn previous(&mut self) -> Result<()> {
        self.step(-1)
    }

    /// Open the track after the current one.
    pub fn next(&mut self) -> Result<()> {
        self.step(1)
    }

    fn step(&mut self, delta: isize) -> Result<()> {
        let current = self
            .selection
            .as_ref()
            .map(|s| s.index)
            .ok_or(PlaybackError::NoTrackSelected)?;

        // The selection may point past the end after `set_tracks` shrank the list.
        let len = self.tracks.len();
        let Some(target) = current.checked_add_signed(delta).filter(|&t| t < len) else {
            let index = isize::try_from(current).map_or(isize::MAX, |c| c.saturating_add(delta));
            warn!(index, len, "Playlist navigation out of range");
            return Err(PlaybackError::OutOfRange { index, len });
        };

        self.open_index(target)
    }

    fn out_of_range(&self, index: usize) -> PlaybackError {
        PlaybackError::OutOfRange {
            index: isize::try_from(index).unwrap_or(isize::MAX),
            len: self.tracks.len(),
        }
    }

    /// Whether the selected track is the first one.
    pub fn is_first_playing(&self) -> bool {
        self.selection.as_ref().is_some_and(|s| s.index == 0)
    }

    /// Whether the selected track is the last one.
    pub fn is_last_playing(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| self.tracks.len().checked_sub(1) == Some(s.index))
    }

    pub fn play(&self) -> Result<()> {
        self.service.play()
    }

    pub fn pause(&self) -> Result<()> {
        self.service.pause()
    }

    /// Stop playback and release the session. The selection is kept.
    pub fn stop(&mut self) {
        self.service.stop();
        self.session = None;
    }

    pub fn seek_to(&self, seconds: f64) -> Result<()> {
        self.service.seek_to(seconds)
    }

    pub fn set_volume(&self, volume: f64) -> Result<()> {
        self.service.set_volume(volume)
    }
}

/// Fetch the playlist from `catalog`, mapping failures to
/// [`PlaybackError::Catalog`].
pub async fn fetch_tracks(catalog: &dyn TrackCatalog) -> Result<Vec<Track>> {
    let tracks = catalog.list_tracks().await.map_err(|e| {
        warn!(error = %e, "Failed to load track catalog");
        PlaybackError::Catalog(e.to_string())
    })?;

    info!(count = tracks.len(), "Playlist loaded");
    Ok(tracks)
}

impl std::fmt::Debug for PlaylistController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistController")
            .field("tracks", &self.tracks.len())
            .field("selection", &self.selection)
            .field("session", &self.session)
            .finish()
    }
}
