//! Application events for the tao event loop.

use hushkey_core::MicState;

/// Events delivered into the tao event loop from other threads.
#[derive(Debug, Clone)]
pub enum HushEvent {
    /// The microphone display state has changed
    StateChanged(MicState),
    /// The device monitor swapped the binding to a new endpoint
    DeviceChanged { identity: String, name: String },
}
