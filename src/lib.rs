// Re-export from sub-crates
pub use hushkey_audio::{
    DEFAULT_POLL_INTERVAL, DeviceChange, DeviceError, DeviceMonitor, Endpoint, EndpointBinding,
    EndpointHost,
};
pub use hushkey_core::{
    APP_NAME, APP_NAME_PRETTY, Config, ConfigManager, DEFAULT_LOG_LEVEL, KeyEdge, Language,
    MicState, MuteToggle, PressState, ToggleMode,
};

// App-specific modules
pub mod event;
pub mod hotkey;
pub mod icon;
pub mod lang;
pub mod notify;

// Version from this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
