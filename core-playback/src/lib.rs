//! # Playback Module
//!
//! Turns a host media element into observable playback state and layers
//! playlist navigation on top.
//!
//! ## Overview
//!
//! This module handles:
//! - The playback state model and its transition function ([`state`])
//! - The playback service and its sessions ([`service`], [`session`])
//! - Playlist selection and previous/next navigation ([`playlist`])
//! - `HH:MM:SS` formatting for progress displays ([`time_format`])
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::HeadlessMediaElement;
//! use core_playback::{PlaybackService, PlaylistController};
//! use std::sync::Arc;
//!
//! let service = PlaybackService::new(Arc::new(HeadlessMediaElement::new()));
//! let mut playlist = PlaylistController::with_tracks(service.clone(), tracks);
//! playlist.open_index(0)?;
//!
//! let mut state = service.state();
//! while state.changed().await.is_ok() {
//!     let snapshot = state.borrow().clone();
//!     println!("{} / {}", snapshot.readable_current_time(), snapshot.readable_duration());
//! }
//! ```

pub mod error;
pub mod playlist;
pub mod service;
pub mod session;
pub mod state;
pub mod time_format;

pub use bridge_traits::catalog::Track;
pub use error::{PlaybackError, Result};
pub use playlist::{fetch_tracks, PlaylistController, PlaylistSelection};
pub use service::PlaybackService;
pub use session::{PlaybackEvent, PlaybackSession, PlaybackSessionId};
pub use state::{MediaReadout, PlaybackState, PlaybackStatus, StateInput};
pub use time_format::{format_time, format_time_with};
