//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for native hosts
//! (macOS, Windows, Linux, CI).
//!
//! ## Overview
//!
//! - `MediaElement` as [`HeadlessMediaElement`], an in-process element that
//!   emits the browser event sequence without producing sound
//! - `TrackCatalog` as [`HttpTrackCatalog`], a JSON manifest fetched with
//!   `reqwest`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HeadlessMediaElement, HttpTrackCatalog};
//! use std::sync::Arc;
//!
//! let element = Arc::new(HeadlessMediaElement::with_auto_ready(180.0));
//! let catalog = Arc::new(HttpTrackCatalog::new("https://example.com/tracks.json")?);
//! // Hand both to `core_runtime::config::PlayerConfig::builder()`
//! ```

mod catalog;
mod media;

pub use catalog::HttpTrackCatalog;
pub use media::HeadlessMediaElement;
