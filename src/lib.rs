//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-service`, `core-playback`). Host applications can
//! depend on `cloud-player-workspace`, pick `desktop-shims` or `wasm`, and get
//! the façade plus the playback types without wiring each crate individually.

#[cfg(any(feature = "desktop-shims", feature = "wasm"))]
pub use core_service::{CoreError, CoreService, Result};

#[cfg(any(feature = "desktop-shims", feature = "wasm"))]
pub use core_playback::{
    format_time, format_time_with, PlaybackEvent, PlaybackService, PlaybackSession, PlaybackState,
    PlaybackStatus, PlaylistController, PlaylistSelection,
};
