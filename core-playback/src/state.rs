//! # Playback State Model
//!
//! A [`PlaybackState`] is an immutable snapshot of what the media element is
//! doing. Snapshots are never edited in place: every input (a media event, a
//! load, a volume change, a teardown) goes through
//! [`PlaybackState::transition`], which returns the next snapshot.
//!
//! ## Status machine
//!
//! ```text
//!            load              canplay             playing
//!   Idle ───────────> Loading ─────────> Ready ──────────────> Playing
//!    ^                   │                 │                   │    ^
//!    │ reset             │ playing         │ pause       pause │    │ playing
//!    │ (stop/end)        └─────────────────┼──────────> Paused <┘    │
//!    │                                     │               └─────────┘
//!    └──────── any ──── error ──> Error (sticky until the next load/reset)
//! ```

use bridge_traits::media::{MediaElement, MediaEventKind};
use serde::{Deserialize, Serialize};

use crate::time_format::format_time;

/// Default output volume for a freshly constructed service.
pub const DEFAULT_VOLUME: f64 = 1.0;

/// Where the current session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No session is active.
    #[default]
    Idle,
    /// A source was assigned and is being fetched.
    Loading,
    /// Enough data is buffered; playback has not started yet.
    Ready,
    /// Audio is progressing.
    Playing,
    /// Playback is paused.
    Paused,
    /// The host reported a media failure.
    Error,
}

/// Values read back from the media element when an event arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaReadout {
    pub duration: f64,
    pub current_time: f64,
    pub volume: f64,
}

impl MediaReadout {
    /// Sample the element's current duration, position and volume.
    pub fn from_element(element: &dyn MediaElement) -> Self {
        Self {
            duration: element.duration(),
            current_time: element.current_time(),
            volume: element.volume(),
        }
    }
}

/// Everything that can move the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    /// A new source is being loaded.
    Load,
    /// The media element emitted an event.
    Media {
        kind: MediaEventKind,
        readout: MediaReadout,
    },
    /// The volume was set through the service.
    VolumeSet(f64),
    /// The session ended (stop, natural end, unsubscribe).
    Reset,
}

/// Immutable playback snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// Media duration in seconds, known once the element can play.
    pub duration: Option<f64>,
    /// Last reported playback position in seconds.
    pub current_time: Option<f64>,
    /// Output volume in `[0.0, 1.0]`.
    pub volume: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::with_volume(DEFAULT_VOLUME)
    }
}

impl PlaybackState {
    /// Idle snapshot carrying the given volume.
    pub fn with_volume(volume: f64) -> Self {
        Self {
            status: PlaybackStatus::Idle,
            duration: None,
            current_time: None,
            volume,
        }
    }

    pub fn playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Whether the element has buffered enough to play.
    pub fn can_play(&self) -> bool {
        matches!(
            self.status,
            PlaybackStatus::Ready | PlaybackStatus::Playing | PlaybackStatus::Paused
        )
    }

    pub fn error(&self) -> bool {
        self.status == PlaybackStatus::Error
    }

    /// `HH:MM:SS` rendering of the duration, empty while unknown.
    pub fn readable_duration(&self) -> String {
        self.duration.map(format_time).unwrap_or_default()
    }

    /// `HH:MM:SS` rendering of the position, empty while unknown.
    pub fn readable_current_time(&self) -> String {
        self.current_time.map(format_time).unwrap_or_default()
    }

    /// Compute the snapshot that follows `input`.
    pub fn transition(&self, input: &StateInput) -> PlaybackState {
        match *input {
            StateInput::Load => PlaybackState {
                status: PlaybackStatus::Loading,
                ..self.reset()
            },
            StateInput::Reset => self.reset(),
            StateInput::VolumeSet(volume) => PlaybackState {
                volume,
                ..self.clone()
            },
            StateInput::Media { kind, readout } => self.on_media_event(kind, &readout),
        }
    }

    // Volume is the element's, not the session's, so it survives resets.
    fn reset(&self) -> PlaybackState {
        PlaybackState::with_volume(self.volume)
    }

    fn on_media_event(&self, kind: MediaEventKind, readout: &MediaReadout) -> PlaybackState {
        match (self.status, kind) {
            (_, MediaEventKind::Error) => PlaybackState {
                status: PlaybackStatus::Error,
                ..self.reset()
            },
            (_, MediaEventKind::VolumeChange) => PlaybackState {
                volume: readout.volume.clamp(0.0, 1.0),
                ..self.clone()
            },
            (PlaybackStatus::Idle | PlaybackStatus::Error, _) => self.clone(),
            (PlaybackStatus::Loading, MediaEventKind::CanPlay) => PlaybackState {
                status: PlaybackStatus::Ready,
                duration: finite(readout.duration),
                ..self.clone()
            },
            (_, MediaEventKind::CanPlay) => PlaybackState {
                duration: finite(readout.duration),
                ..self.clone()
            },
            (_, MediaEventKind::Playing) => PlaybackState {
                status: PlaybackStatus::Playing,
                ..self.clone()
            },
            (PlaybackStatus::Playing | PlaybackStatus::Ready, MediaEventKind::Pause) => {
                PlaybackState {
                    status: PlaybackStatus::Paused,
                    ..self.clone()
                }
            }
            (_, MediaEventKind::TimeUpdate) => PlaybackState {
                current_time: finite(readout.current_time),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readout(duration: f64, current_time: f64) -> MediaReadout {
        MediaReadout {
            duration,
            current_time,
            volume: 1.0,
        }
    }

    fn media(kind: MediaEventKind, duration: f64, current_time: f64) -> StateInput {
        StateInput::Media {
            kind,
            readout: readout(duration, current_time),
        }
    }

    fn loaded() -> PlaybackState {
        PlaybackState::default().transition(&StateInput::Load)
    }

    #[test]
    fn default_snapshot_is_idle_at_full_volume() {
        let state = PlaybackState::default();
        assert_eq!(state.status, PlaybackStatus::Idle);
        assert!(!state.playing());
        assert!(!state.can_play());
        assert!(!state.error());
        assert_eq!(state.duration, None);
        assert_eq!(state.current_time, None);
        assert_eq!(state.volume, 1.0);
        assert_eq!(state.readable_duration(), "");
    }

    #[test]
    fn canplay_records_duration() {
        let state = loaded().transition(&media(MediaEventKind::CanPlay, 185.0, 0.0));
        assert_eq!(state.status, PlaybackStatus::Ready);
        assert!(state.can_play());
        assert_eq!(state.duration, Some(185.0));
        assert_eq!(state.readable_duration(), "00:03:05");
    }

    #[test]
    fn unbounded_duration_stays_unknown() {
        let state = loaded().transition(&media(MediaEventKind::CanPlay, f64::INFINITY, 0.0));
        assert!(state.can_play());
        assert_eq!(state.duration, None);
    }

    #[test]
    fn playing_and_pause_toggle() {
        let ready = loaded().transition(&media(MediaEventKind::CanPlay, 60.0, 0.0));
        let playing = ready.transition(&media(MediaEventKind::Playing, 60.0, 0.0));
        assert!(playing.playing());

        let paused = playing.transition(&media(MediaEventKind::Pause, 60.0, 4.0));
        assert_eq!(paused.status, PlaybackStatus::Paused);
        assert!(paused.can_play());

        let paused_again = paused.transition(&media(MediaEventKind::Pause, 60.0, 4.0));
        assert_eq!(paused_again, paused);

        let resumed = paused.transition(&media(MediaEventKind::Playing, 60.0, 4.0));
        assert!(resumed.playing());
    }

    #[test]
    fn pause_while_loading_keeps_loading() {
        let state = loaded().transition(&media(MediaEventKind::Pause, f64::NAN, 0.0));
        assert_eq!(state.status, PlaybackStatus::Loading);
        assert!(!state.can_play());
    }

    #[test]
    fn timeupdate_echoes_position() {
        let state = loaded().transition(&media(MediaEventKind::TimeUpdate, f64::NAN, 42.5));
        assert_eq!(state.current_time, Some(42.5));
        assert_eq!(state.readable_current_time(), "00:00:42");
    }

    #[test]
    fn error_clears_progress_and_is_sticky() {
        let playing = loaded()
            .transition(&media(MediaEventKind::CanPlay, 60.0, 0.0))
            .transition(&media(MediaEventKind::Playing, 60.0, 0.0))
            .transition(&media(MediaEventKind::TimeUpdate, 60.0, 12.0));

        let failed = playing.transition(&media(MediaEventKind::Error, 60.0, 12.0));
        assert!(failed.error());
        assert!(!failed.playing());
        assert!(!failed.can_play());
        assert_eq!(failed.duration, None);
        assert_eq!(failed.current_time, None);

        let still_failed = failed
            .transition(&media(MediaEventKind::Playing, 60.0, 12.0))
            .transition(&media(MediaEventKind::TimeUpdate, 60.0, 13.0));
        assert_eq!(still_failed, failed);

        let reloaded = failed.transition(&StateInput::Load);
        assert_eq!(reloaded.status, PlaybackStatus::Loading);
        assert!(!reloaded.error());
    }

    #[test]
    fn reset_keeps_volume() {
        let state = loaded()
            .transition(&StateInput::VolumeSet(0.3))
            .transition(&media(MediaEventKind::CanPlay, 60.0, 0.0))
            .transition(&StateInput::Reset);

        assert_eq!(state, PlaybackState::with_volume(0.3));
    }

    #[test]
    fn idle_ignores_stray_media_events() {
        let idle = PlaybackState::default();
        assert_eq!(idle.transition(&media(MediaEventKind::Playing, 1.0, 0.0)), idle);
        assert_eq!(idle.transition(&media(MediaEventKind::TimeUpdate, 1.0, 0.5)), idle);
    }

    #[test]
    fn volumechange_reads_element_volume() {
        let state = loaded().transition(&StateInput::Media {
            kind: MediaEventKind::VolumeChange,
            readout: MediaReadout {
                duration: f64::NAN,
                current_time: 0.0,
                volume: 0.6,
            },
        });
        assert_eq!(state.volume, 0.6);
        assert_eq!(state.status, PlaybackStatus::Loading);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let state = PlaybackState {
            status: PlaybackStatus::Playing,
            duration: Some(10.0),
            current_time: Some(1.0),
            volume: 0.5,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "playing");
        assert_eq!(json["currentTime"], 1.0);
        assert_eq!(json["duration"], 10.0);
    }
}
