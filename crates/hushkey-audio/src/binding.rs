//! The process-wide binding to the current default capture endpoint.
//!
//! Single-writer (the device monitor), multi-reader (the toggle path).
//! The lock guards only the reference swap and clone; OS volume calls run
//! against a snapshot, so a slow device query can never sit between a key
//! edge and its volume command.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::endpoint::{DeviceError, Endpoint, EndpointHost, Result};

pub struct EndpointBinding {
    host: Box<dyn EndpointHost>,
    current: RwLock<Option<Arc<dyn Endpoint>>>,
}

impl EndpointBinding {
    /// Create an unbound binding. The first successful
    /// [`refresh_default_device`](Self::refresh_default_device) binds it.
    pub fn new(host: Box<dyn EndpointHost>) -> Self {
        Self {
            host,
            current: RwLock::new(None),
        }
    }

    /// Snapshot of the currently bound endpoint, if any.
    pub fn snapshot(&self) -> Option<Arc<dyn Endpoint>> {
        self.current.read().clone()
    }

    /// Friendly name of the bound endpoint.
    pub fn device_name(&self) -> Option<String> {
        self.snapshot().map(|e| e.name().to_owned())
    }

    /// Current volume of the bound endpoint.
    pub fn current_volume(&self) -> Result<f32> {
        let endpoint = self.snapshot().ok_or(DeviceError::NoDevice)?;
        endpoint.volume()
    }

    /// Set the volume on whichever endpoint is bound right now.
    ///
    /// `level` is clamped to `[0.0, 1.0]` before it reaches the OS. A
    /// failure leaves the volume unchanged; the caller logs it and the
    /// next key edge retries. No automatic retry here.
    pub fn set_volume(&self, level: f32) -> Result<()> {
        let endpoint = self.snapshot().ok_or(DeviceError::NoDevice)?;
        endpoint.set_volume(level.clamp(0.0, 1.0))
    }

    /// Re-query the default capture device and swap it in if its identity
    /// differs from the bound endpoint's. Returns whether a swap happened.
    ///
    /// Safe to run concurrently with the volume calls above: readers that
    /// already took a snapshot finish against the endpoint that was
    /// current when they started.
    pub fn refresh_default_device(&self) -> Result<bool> {
        let fresh = self.host.default_capture()?;
        {
            let current = self.current.read();
            if current
                .as_ref()
                .is_some_and(|c| c.identity() == fresh.identity())
            {
                return Ok(false);
            }
        }
        info!(
            identity = %fresh.identity(),
            name = %fresh.name(),
            "Binding default capture device"
        );
        *self.current.write() = Some(fresh);
        Ok(true)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeEndpoint, FakeHost};
    use super::*;

    fn bound(host: &Arc<FakeHost>) -> EndpointBinding {
        let binding = EndpointBinding::new(Box::new(host.clone()));
        binding.refresh_default_device().unwrap();
        binding
    }

    #[test]
    fn unbound_binding_reports_no_device() {
        let host = FakeHost::new(FakeEndpoint::new("mic-a"));
        let binding = EndpointBinding::new(Box::new(host));
        assert!(matches!(
            binding.set_volume(0.5),
            Err(DeviceError::NoDevice)
        ));
        assert!(matches!(
            binding.current_volume(),
            Err(DeviceError::NoDevice)
        ));
    }

    #[test]
    fn refresh_binds_and_is_stable_for_same_identity() {
        let mic = FakeEndpoint::new("mic-a");
        let host = FakeHost::new(mic);
        let binding = EndpointBinding::new(Box::new(host.clone()));

        assert!(binding.refresh_default_device().unwrap());
        // Same identity again: untouched.
        assert!(!binding.refresh_default_device().unwrap());
        assert_eq!(binding.device_name().as_deref(), Some("mic-a"));
    }

    #[test]
    fn set_volume_is_clamped() {
        let mic = FakeEndpoint::new("mic-a");
        let host = FakeHost::new(mic.clone());
        let binding = bound(&host);

        binding.set_volume(1.7).unwrap();
        binding.set_volume(-0.3).unwrap();
        assert_eq!(*mic.commands.lock(), vec![1.0, 0.0]);
    }

    #[test]
    fn hot_swap_retargets_subsequent_commands() {
        let mic_a = FakeEndpoint::new("mic-a");
        let mic_b = FakeEndpoint::new("mic-b");
        let host = FakeHost::new(mic_a.clone());
        let binding = bound(&host);

        binding.set_volume(0.0).unwrap();

        host.set_default(Some(mic_b.clone()));
        assert!(binding.refresh_default_device().unwrap());

        binding.set_volume(0.7).unwrap();
        binding.set_volume(0.2).unwrap();

        // Everything after the swap lands on B; A saw only the pre-swap call.
        assert_eq!(*mic_a.commands.lock(), vec![0.0]);
        assert_eq!(*mic_b.commands.lock(), vec![0.7, 0.2]);
    }

    #[test]
    fn inflight_snapshot_survives_a_swap() {
        let mic_a = FakeEndpoint::new("mic-a");
        let mic_b = FakeEndpoint::new("mic-b");
        let host = FakeHost::new(mic_a.clone());
        let binding = bound(&host);

        // Reader takes its snapshot, then the monitor swaps underneath it.
        let snapshot = binding.snapshot().unwrap();
        host.set_default(Some(mic_b.clone()));
        binding.refresh_default_device().unwrap();

        // The in-flight operation completes against the old endpoint; it
        // does not silently hit the new one.
        snapshot.set_volume(0.9).unwrap();
        assert_eq!(*mic_a.commands.lock(), vec![0.9]);
        assert!(mic_b.commands.lock().is_empty());

        // New readers see B.
        binding.set_volume(0.1).unwrap();
        assert_eq!(*mic_b.commands.lock(), vec![0.1]);
    }

    #[test]
    fn failed_refresh_keeps_previous_binding() {
        let mic_a = FakeEndpoint::new("mic-a");
        let host = FakeHost::new(mic_a.clone());
        let binding = bound(&host);

        host.set_default(None);
        assert!(matches!(
            binding.refresh_default_device(),
            Err(DeviceError::NoDevice)
        ));

        // The stale endpoint stays bound; commands still reach it.
        binding.set_volume(0.4).unwrap();
        assert_eq!(*mic_a.commands.lock(), vec![0.4]);
    }

    #[test]
    fn press_release_round_trip_with_interleaved_refreshes() {
        use hushkey_core::{KeyEdge, MuteToggle, ToggleMode};

        let mic = FakeEndpoint::new("mic-a");
        let host = FakeHost::new(mic.clone());
        let binding = bound(&host);
        let mut toggle = MuteToggle::new();

        let level = toggle
            .on_edge(KeyEdge::Down, ToggleMode::MuteWhilePressed, 70)
            .unwrap();
        binding.set_volume(level).unwrap();

        // Monitor ticks land between the edges; the default has not moved,
        // so they must not disturb the held state or issue commands.
        assert!(!binding.refresh_default_device().unwrap());
        assert!(!binding.refresh_default_device().unwrap());

        let level = toggle
            .on_edge(KeyEdge::Up, ToggleMode::MuteWhilePressed, 70)
            .unwrap();
        binding.set_volume(level).unwrap();

        assert_eq!(*mic.commands.lock(), vec![0.0, 0.70]);
    }

    #[test]
    fn endpoint_failure_propagates_without_state_change() {
        let mic = FakeEndpoint::new("mic-a");
        let host = FakeHost::new(mic.clone());
        let binding = bound(&host);

        *mic.broken.lock() = true;
        assert!(matches!(
            binding.set_volume(0.5),
            Err(DeviceError::Unavailable(_))
        ));
        assert!(binding.snapshot().is_some());
    }
}
