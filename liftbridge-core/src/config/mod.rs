//! Configuration types
//!
//! Board-agnostic configuration parsed from the `bridge.toml` compiled into
//! the firmware.

pub mod toml;
pub mod types;

pub use toml::parse_config;
pub use types::*;
