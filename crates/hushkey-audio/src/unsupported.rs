//! Fallback host for platforms without a capture-volume backend.

use std::sync::Arc;

use crate::endpoint::{DeviceError, Endpoint, EndpointHost, Result};

/// Host that always reports no device.
///
/// Used where no OS volume backend exists. The binding stays unbound and
/// every monitor tick retries, so the rest of the application (tray,
/// menu, hotkey) runs normally; volume commands surface
/// [`DeviceError::NoDevice`] and are logged by the caller.
pub struct UnsupportedHost;

impl EndpointHost for UnsupportedHost {
    fn default_capture(&self) -> Result<Arc<dyn Endpoint>> {
        Err(DeviceError::NoDevice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::EndpointBinding;
    use crate::monitor::DeviceMonitor;

    #[test]
    fn binding_stays_unbound_but_usable() {
        let binding = EndpointBinding::new(Box::new(UnsupportedHost));
        assert!(matches!(
            binding.refresh_default_device(),
            Err(DeviceError::NoDevice)
        ));
        assert!(binding.snapshot().is_none());
        assert!(matches!(
            binding.set_volume(0.5),
            Err(DeviceError::NoDevice)
        ));
    }

    #[test]
    fn monitor_ticks_survive_a_hostless_platform() {
        let binding = Arc::new(EndpointBinding::new(Box::new(UnsupportedHost)));
        let monitor = DeviceMonitor::new(binding.clone());
        for _ in 0..3 {
            monitor.tick(&|_| panic!("no device can ever be reported"));
        }
        assert!(binding.snapshot().is_none());
    }
}
