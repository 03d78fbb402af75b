//! Polls the OS for default capture device changes.
//!
//! Pure polling, no push notifications: a device switch is picked up
//! within one interval, which is plenty for a tray utility and avoids a
//! COM callback registration. The loop runs for the life of the process.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::binding::EndpointBinding;

/// Default polling interval for default-device changes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Notification that the binding swapped to a new endpoint.
#[derive(Debug, Clone)]
pub struct DeviceChange {
    pub identity: String,
    pub name: String,
}

pub struct DeviceMonitor {
    binding: Arc<EndpointBinding>,
    interval: Duration,
}

impl DeviceMonitor {
    pub fn new(binding: Arc<EndpointBinding>) -> Self {
        Self::with_interval(binding, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(binding: Arc<EndpointBinding>, interval: Duration) -> Self {
        Self { binding, interval }
    }

    /// One poll: refresh the binding and report a swap through `on_change`.
    ///
    /// A failed OS query is logged and retried on the next tick, never
    /// escalated; a single hiccup must not take the monitor down.
    pub fn tick(&self, on_change: &dyn Fn(DeviceChange)) {
        match self.binding.refresh_default_device() {
            Ok(true) => {
                if let Some(endpoint) = self.binding.snapshot() {
                    on_change(DeviceChange {
                        identity: endpoint.identity().to_owned(),
                        name: endpoint.name().to_owned(),
                    });
                }
            }
            Ok(false) => {}
            Err(e) => warn!("Default capture device query failed: {e}"),
        }
    }

    /// Run the polling loop on its own thread for the life of the process.
    pub fn spawn(self, on_change: impl Fn(DeviceChange) + Send + 'static) {
        thread::spawn(move || {
            loop {
                self.tick(&on_change);
                thread::sleep(self.interval);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::binding::testing::{FakeEndpoint, FakeHost};

    fn changes_of(monitor: &DeviceMonitor, ticks: usize) -> Vec<String> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            move |change: DeviceChange| seen.lock().push(change.identity)
        };
        for _ in 0..ticks {
            monitor.tick(&sink);
        }
        let result = seen.lock().clone();
        result
    }

    #[test]
    fn first_tick_binds_and_reports() {
        let host = FakeHost::new(FakeEndpoint::new("mic-a"));
        let binding = Arc::new(EndpointBinding::new(Box::new(host)));
        let monitor = DeviceMonitor::new(binding);

        assert_eq!(changes_of(&monitor, 3), vec!["mic-a"]);
    }

    #[test]
    fn swap_is_reported_once() {
        let host = FakeHost::new(FakeEndpoint::new("mic-a"));
        let binding = Arc::new(EndpointBinding::new(Box::new(host.clone())));
        let monitor = DeviceMonitor::new(binding);

        assert_eq!(changes_of(&monitor, 2), vec!["mic-a"]);

        host.set_default(Some(FakeEndpoint::new("mic-b")));
        assert_eq!(changes_of(&monitor, 3), vec!["mic-b"]);
    }

    #[test]
    fn monitoring_never_issues_volume_commands() {
        // Even with no hotkey active (e.g. registration refused at
        // startup), the monitor keeps tracking the default device, and
        // tracking alone must never touch the volume.
        let mic = FakeEndpoint::new("mic-a");
        let host = FakeHost::new(mic.clone());
        let binding = Arc::new(EndpointBinding::new(Box::new(host.clone())));
        let monitor = DeviceMonitor::new(binding);

        assert_eq!(changes_of(&monitor, 3), vec!["mic-a"]);
        host.set_default(Some(FakeEndpoint::new("mic-b")));
        assert_eq!(changes_of(&monitor, 1), vec!["mic-b"]);

        assert!(mic.commands.lock().is_empty());
    }

    #[test]
    fn query_failure_is_survived_and_retried() {
        let host = FakeHost::new(FakeEndpoint::new("mic-a"));
        let binding = Arc::new(EndpointBinding::new(Box::new(host.clone())));
        let monitor = DeviceMonitor::new(binding);

        assert_eq!(changes_of(&monitor, 1), vec!["mic-a"]);

        // Device disappears: ticks log and carry on.
        host.set_default(None);
        assert!(changes_of(&monitor, 4).is_empty());

        // Device comes back under a new identity: next tick picks it up.
        host.set_default(Some(FakeEndpoint::new("mic-b")));
        assert_eq!(changes_of(&monitor, 1), vec!["mic-b"]);
    }
}
