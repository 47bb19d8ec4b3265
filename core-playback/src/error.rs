//! # Playback Error Types
//!
//! Errors surfaced by the playback service and the playlist controller.
//!
//! Media failures reported by the host (network, decode, unsupported format)
//! are absent on purpose: they are opaque and only ever show up as
//! [`PlaybackStatus::Error`](crate::PlaybackStatus::Error) on the published
//! snapshot and as an `error` event on the session stream.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The media URL cannot be handed to the media element.
    #[error("Invalid audio source: {0}")]
    InvalidSource(String),

    /// The track catalog could not be loaded.
    #[error("Track catalog unavailable: {0}")]
    Catalog(String),

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f64),

    /// Seek target is not a finite number of seconds.
    #[error("Invalid seek position: {0}")]
    InvalidSeek(f64),

    /// Time format pattern contains an unknown specifier.
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    // ========================================================================
    // Navigation Errors
    // ========================================================================
    /// Navigation was requested before any track was opened.
    #[error("No track selected")]
    NoTrackSelected,

    /// Requested playlist position does not exist.
    #[error("Track index {index} out of range (playlist has {len} tracks)")]
    OutOfRange { index: isize, len: usize },

    // ========================================================================
    // Platform/Adapter Errors
    // ========================================================================
    /// The host media element rejected a command.
    #[error("Media element error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` for playlist navigation failures (edges, no selection).
    pub fn is_navigation_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::NoTrackSelected | PlaybackError::OutOfRange { .. }
        )
    }

    /// Returns `true` if the value passed to a transport control was rejected.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidSource(_)
                | PlaybackError::InvalidVolume(_)
                | PlaybackError::InvalidSeek(_)
                | PlaybackError::InvalidTimeFormat(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
