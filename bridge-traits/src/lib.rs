//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and the platform
//! that actually renders audio. Each trait represents a capability the core
//! requires but that must be implemented differently per host (browser,
//! desktop, tests).
//!
//! ## Traits
//!
//! - [`MediaElement`](media::MediaElement) - The native media primitive (the
//!   HTML `<audio>` element on the web) and its event vocabulary
//! - [`TrackCatalog`](catalog::TrackCatalog) - Ordered list of playable tracks
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Media element |
//! |----------|----------------------|---------------|
//! | Desktop  | `bridge-desktop`     | `HeadlessMediaElement` |
//! | Web      | `bridge-wasm`        | `HtmlAudioMediaElement` |
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with a descriptive `CapabilityMissing` error when a
//! required bridge is not supplied (see `core_runtime::config`).
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations convert their native errors (JS exceptions, HTTP
//! failures) into it with an actionable message.
//!
//! ## Thread Safety
//!
//! On native targets every bridge is `Send + Sync`. On `wasm32` the bounds are
//! dropped (see [`platform`]) because browser objects are single-threaded.

pub mod catalog;
pub mod error;
pub mod logging;
pub mod media;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use catalog::{StaticTrackCatalog, Track, TrackCatalog};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{ListenerId, MediaElement, MediaEventKind, MediaEventListener, UnknownMediaEvent};
pub use platform::PlatformSendSync;
