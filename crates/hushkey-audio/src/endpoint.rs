//! Trait seam between the binding and the OS audio backend.

use std::sync::Arc;

use thiserror::Error;

/// Errors from the endpoint binding. Never fatal: callers log and leave
/// the volume unchanged; the next key edge or monitor tick retries.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No endpoint is bound, or the OS reports no default capture device.
    #[error("no default capture device available")]
    NoDevice,
    /// The endpoint exists but an OS call against it failed.
    #[error("capture endpoint unavailable: {0}")]
    Unavailable(String),
}

pub(crate) type Result<T> = std::result::Result<T, DeviceError>;

/// One capture endpoint: a stable identity plus scalar volume control.
///
/// An endpoint is never re-pointed at a different device. When the default
/// changes, the binding replaces the whole endpoint; handles already
/// snapshotted by in-flight calls keep addressing the device they started
/// with, or fail cleanly if it is gone.
pub trait Endpoint: Send + Sync {
    /// Opaque comparable token for this device.
    fn identity(&self) -> &str;

    /// Human-readable device name, for diagnostics and the tray tooltip.
    fn name(&self) -> &str;

    /// Current master volume scalar in `[0.0, 1.0]`.
    fn volume(&self) -> std::result::Result<f32, DeviceError>;

    /// Set the master volume scalar. The binding clamps before calling.
    fn set_volume(&self, level: f32) -> std::result::Result<(), DeviceError>;
}

/// Source of "the current default capture endpoint".
pub trait EndpointHost: Send + Sync {
    /// Query the OS for the current default capture endpoint.
    fn default_capture(&self) -> std::result::Result<Arc<dyn Endpoint>, DeviceError>;
}
