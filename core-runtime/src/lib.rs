//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the player core:
//! - Logging and tracing setup
//! - Player configuration and capability validation
//!
//! ## Overview
//!
//! Every other core crate depends on this one for its logging conventions
//! (see [`logging::redact_url`]) and receives its host capabilities through
//! [`config::PlayerConfig`].

pub mod config;
pub mod error;
pub mod logging;

pub use config::{PlayerConfig, PlayerConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
