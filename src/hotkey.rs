//! Global hotkey registration with atomic rebind.

use anyhow::Context;
use global_hotkey::GlobalHotKeyManager;
use global_hotkey::hotkey::HotKey;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum HotkeyError {
    /// The trigger string does not name a key combination.
    #[error("invalid trigger key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },
    /// The OS refused the registration, typically because another
    /// application already claimed the combination system-wide.
    #[error("failed to register hotkey {key:?}: {reason}")]
    RegistrationFailed { key: String, reason: String },
}

/// Parse a config trigger string like "ctrl+shift+m".
pub fn parse_trigger(trigger: &str) -> Result<HotKey, HotkeyError> {
    HotKey::try_from(trigger).map_err(|e| HotkeyError::InvalidKey {
        key: trigger.to_string(),
        reason: e.to_string(),
    })
}

/// Owns the single active global hotkey registration.
///
/// At most one trigger is registered at a time. A rebind unregisters the
/// old trigger before registering the new one, so a stale press of the
/// old key can never be delivered once the rebind has started. Callers
/// reset press tracking around the swap: a release edge for the old key
/// will never arrive.
pub struct HotkeyBinder {
    manager: GlobalHotKeyManager,
    active: Option<HotKey>,
}

impl HotkeyBinder {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            manager: GlobalHotKeyManager::new().context("Failed to create hotkey manager")?,
            active: None,
        })
    }

    /// Whether `id` belongs to the active registration.
    pub fn matches(&self, id: u32) -> bool {
        self.active.is_some_and(|key| key.id() == id)
    }

    /// Register `trigger` as the active hotkey.
    pub fn bind(&mut self, trigger: &str) -> Result<(), HotkeyError> {
        let key = parse_trigger(trigger)?;
        self.manager
            .register(key)
            .map_err(|e| HotkeyError::RegistrationFailed {
                key: trigger.to_string(),
                reason: e.to_string(),
            })?;
        self.active = Some(key);
        info!(trigger, "Registered global hotkey");
        Ok(())
    }

    /// Drop the active registration. A missing registration is a no-op.
    pub fn unbind(&mut self) {
        if let Some(key) = self.active.take() {
            if let Err(e) = self.manager.unregister(key) {
                // The listener is gone either way; nothing left to deliver.
                warn!("Failed to unregister hotkey: {e}");
            }
        }
    }

    /// Swap the active trigger. On failure the old binding is already
    /// gone and no hotkey is active until a later bind succeeds.
    pub fn rebind(&mut self, trigger: &str) -> Result<(), HotkeyError> {
        self.unbind();
        self.bind(trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_trigger() {
        assert!(parse_trigger("ctrl+shift+m").is_ok());
    }

    #[test]
    fn parses_single_named_key() {
        assert!(parse_trigger("capslock").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_trigger("ctrl+shift+definitely-not-a-key").unwrap_err();
        assert!(matches!(err, HotkeyError::InvalidKey { .. }));
    }

    #[test]
    fn failed_bind_leaves_press_tracking_idle() {
        use crate::{MuteToggle, PressState, ToggleMode};

        // Startup with a bad trigger: the bind fails before any
        // registration exists, so no edge can ever reach the toggle.
        let mut toggle = MuteToggle::new();
        assert!(parse_trigger("not-a-key").is_err());

        assert_eq!(toggle.state(), PressState::Idle);
        // Nothing to restore either; reset is a no-op.
        assert_eq!(toggle.reset(ToggleMode::MuteWhilePressed, 50), None);
    }
}
