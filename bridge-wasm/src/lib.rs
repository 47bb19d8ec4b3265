//! WebAssembly Bridge Implementations
//!
//! Browser implementations of the bridge traits defined in `bridge-traits`,
//! built on `web-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! On native targets it compiles to an empty crate.
//!
//! # Implementations
//!
//! - [`HtmlAudioMediaElement`]: `MediaElement` over the DOM `<audio>` element
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::HtmlAudioMediaElement;
//! use std::sync::Arc;
//!
//! let element = Arc::new(HtmlAudioMediaElement::attach_to_document("player-audio")?);
//! // Hand it to `core_runtime::config::PlayerConfig::builder().media_element(element)`
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod media;

pub use media::HtmlAudioMediaElement;
