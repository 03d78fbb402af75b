//! Core types and configuration for hushkey.
//!
//! This crate is platform-agnostic: the configuration schema, the toggle
//! mode, and the press state machine live here so they can be tested
//! without any OS hotkey or audio integration.

mod config;
mod state;
mod toggle;

pub use config::{Config, ConfigManager, Language};
pub use state::MicState;
pub use toggle::{KeyEdge, MuteToggle, PressState, ToggleMode};

/// Application name
pub const APP_NAME: &str = "hushkey";

/// Pretty application name for display
pub const APP_NAME_PRETTY: &str = "Hushkey";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";
