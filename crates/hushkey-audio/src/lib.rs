//! Audio endpoint binding for hushkey.
//!
//! Wraps the OS notion of "the default capture device" behind a single
//! atomically swappable binding, and polls for default-device changes so
//! the hotkey path always talks to whichever microphone is current.

mod binding;
mod endpoint;
mod monitor;
mod unsupported;
#[cfg(windows)]
mod wasapi;

pub use binding::EndpointBinding;
pub use endpoint::{DeviceError, Endpoint, EndpointHost};
pub use monitor::{DEFAULT_POLL_INTERVAL, DeviceChange, DeviceMonitor};
pub use unsupported::UnsupportedHost;
#[cfg(windows)]
pub use wasapi::WasapiHost;
