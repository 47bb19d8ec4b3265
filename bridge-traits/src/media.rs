//! Media element bridge.
//!
//! The core never decodes audio itself. Every host ships a *media element*: a
//! platform object that accepts a source URL, plays it, and reports progress
//! through a fixed vocabulary of named events (the HTML `<audio>` element is the
//! reference model). This module defines that contract so the playback service
//! can drive a browser element, a native player or a headless test double
//! through the same API.
//!
//! ## Event delivery
//!
//! Listeners registered with [`MediaElement::add_listener`] receive every event
//! kind listed in [`MediaEventKind::ALL`]. Hosts may deliver events
//! synchronously from inside a control call (e.g. `pause()` emitting `pause`
//! before it returns) or asynchronously from their event loop; callers must
//! not hold locks across control calls. Implementations must tolerate a
//! listener removing itself, or another listener, while an event is being
//! dispatched.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Named lifecycle events emitted by a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEventKind {
    /// The element started fetching a new source.
    LoadStart,
    /// Duration and dimensions are known.
    LoadedMetadata,
    /// Enough data is buffered to start playback.
    CanPlay,
    /// Playback was requested (may still be waiting for data).
    Play,
    /// Playback is actually progressing.
    Playing,
    /// Playback was paused by the user or the platform.
    Pause,
    /// The playback position changed.
    TimeUpdate,
    /// The output volume changed.
    VolumeChange,
    /// The end of the media was reached.
    Ended,
    /// Fetching or decoding failed.
    Error,
}

impl MediaEventKind {
    /// Every event kind, in the order hosts usually register them.
    pub const ALL: [MediaEventKind; 10] = [
        MediaEventKind::Ended,
        MediaEventKind::Error,
        MediaEventKind::Play,
        MediaEventKind::Playing,
        MediaEventKind::Pause,
        MediaEventKind::TimeUpdate,
        MediaEventKind::CanPlay,
        MediaEventKind::LoadedMetadata,
        MediaEventKind::LoadStart,
        MediaEventKind::VolumeChange,
    ];

    /// DOM event name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaEventKind::LoadStart => "loadstart",
            MediaEventKind::LoadedMetadata => "loadedmetadata",
            MediaEventKind::CanPlay => "canplay",
            MediaEventKind::Play => "play",
            MediaEventKind::Playing => "playing",
            MediaEventKind::Pause => "pause",
            MediaEventKind::TimeUpdate => "timeupdate",
            MediaEventKind::VolumeChange => "volumechange",
            MediaEventKind::Ended => "ended",
            MediaEventKind::Error => "error",
        }
    }
}

impl fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaEventKind {
    type Err = UnknownMediaEvent;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MediaEventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownMediaEvent(s.to_string()))
    }
}

/// Returned when a DOM event name is not part of the media vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown media event: {0}")]
pub struct UnknownMediaEvent(pub String);

/// Handle returned by [`MediaElement::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a host-allocated listener number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw listener number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Callback invoked for every media event.
#[cfg(not(target_arch = "wasm32"))]
pub type MediaEventListener = Arc<dyn Fn(MediaEventKind) + Send + Sync>;

/// Callback invoked for every media event.
#[cfg(target_arch = "wasm32")]
pub type MediaEventListener = Arc<dyn Fn(MediaEventKind)>;

/// Host media primitive.
///
/// Mirrors the subset of `HTMLMediaElement` the core relies on. Control calls
/// are synchronous because every known host exposes them that way; the
/// asynchronous part of playback is reported through events.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::media::{MediaElement, MediaEventKind};
/// use std::sync::Arc;
///
/// fn autoplay(element: &dyn MediaElement, url: &str) -> bridge_traits::error::Result<()> {
///     element.add_listener(Arc::new(|kind| println!("media event: {kind}")));
///     element.set_src(url)?;
///     element.load()?;
///     element.play()
/// }
/// ```
pub trait MediaElement: PlatformSendSync {
    /// Assign a new source. Any previously loaded source is discarded.
    fn set_src(&self, url: &str) -> Result<()>;

    /// Start (re)loading the current source.
    fn load(&self) -> Result<()>;

    /// Request playback of the current source.
    ///
    /// # Errors
    ///
    /// Returns an error when the host rejects the request outright (for
    /// example because no source is assigned). Failures that happen later
    /// while fetching or decoding are reported as [`MediaEventKind::Error`].
    fn play(&self) -> Result<()>;

    /// Pause playback, keeping the current position.
    fn pause(&self) -> Result<()>;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position. Out-of-range handling is host-defined.
    fn set_current_time(&self, seconds: f64) -> Result<()>;

    /// Media duration in seconds; `NaN` until metadata is available and
    /// infinite for unbounded streams.
    fn duration(&self) -> f64;

    /// Output volume in `[0.0, 1.0]`.
    fn volume(&self) -> f64;

    /// Set the output volume. Hosts reject values outside `[0.0, 1.0]`.
    fn set_volume(&self, volume: f64) -> Result<()>;

    /// Whether a source is currently assigned.
    fn has_source(&self) -> bool;

    /// Register a listener for the whole event vocabulary.
    fn add_listener(&self, listener: MediaEventListener) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}
