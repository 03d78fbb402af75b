//! The hold-to-toggle state machine.
//!
//! Consumes key edges from the global hotkey and decides which volume
//! level, if any, must be applied to the bound endpoint. The machine is
//! deliberately symmetric: mute-while-pressed and unmute-while-pressed are
//! mirror images, differing only in which level corresponds to "held".

use serde::{Deserialize, Serialize};

/// Whether holding the trigger key mutes or unmutes the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleMode {
    /// Microphone is open normally; holding the key silences it.
    #[default]
    MuteWhilePressed,
    /// Microphone is silenced normally; holding the key opens it fully.
    UnmuteWhilePressed,
}

impl ToggleMode {
    /// Volume level applied while the trigger key is held.
    pub fn pressed_level(self) -> f32 {
        match self {
            ToggleMode::MuteWhilePressed => 0.0,
            ToggleMode::UnmuteWhilePressed => 1.0,
        }
    }

    /// Volume level applied when the trigger key is released.
    ///
    /// `restore_volume` is the configured 0..=100 restore level. It only
    /// matters in mute-while-pressed mode, where release re-opens the
    /// microphone at that level; the mirror mode always releases to 0.
    pub fn released_level(self, restore_volume: u8) -> f32 {
        match self {
            ToggleMode::MuteWhilePressed => f32::from(restore_volume.min(100)) / 100.0,
            ToggleMode::UnmuteWhilePressed => 0.0,
        }
    }
}

/// A physical key transition delivered by the hotkey manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Down,
    Up,
}

/// Whether the trigger key is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressState {
    #[default]
    Idle,
    Pressed,
}

/// Press state machine for the trigger key.
///
/// Owned by the event-loop thread; the only outside influence is the
/// explicit [`MuteToggle::reset`] on hotkey rebind or device swap.
#[derive(Debug, Default)]
pub struct MuteToggle {
    state: PressState,
}

impl MuteToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.state == PressState::Pressed
    }

    /// Feed one key edge through the transition table.
    ///
    /// Returns the volume level to apply, or `None` when the edge is an OS
    /// auto-repeat for a state the key is already in. Mode and restore
    /// volume are read here, at the instant of the transition, so a
    /// settings change takes effect on the very next edge.
    ///
    /// The transition is unconditional: even if the caller's volume command
    /// fails afterwards, press tracking must stay in sync with the physical
    /// key, and the opposite edge gets another chance to fix the volume.
    pub fn on_edge(&mut self, edge: KeyEdge, mode: ToggleMode, restore_volume: u8) -> Option<f32> {
        match (self.state, edge) {
            (PressState::Idle, KeyEdge::Down) => {
                self.state = PressState::Pressed;
                Some(mode.pressed_level())
            }
            (PressState::Pressed, KeyEdge::Up) => {
                self.state = PressState::Idle;
                Some(mode.released_level(restore_volume))
            }
            // Key-repeat debounce: the key is already in the state this
            // edge asks for, so no command is issued.
            (PressState::Pressed, KeyEdge::Down) | (PressState::Idle, KeyEdge::Up) => None,
        }
    }

    /// Force the machine back to `Idle`.
    ///
    /// Used on hotkey rebind and device swap, where a release edge for the
    /// old binding can no longer be observed. When the key was held this
    /// returns the release-level command so the caller restores the
    /// microphone *before* the pressed state is discarded.
    pub fn reset(&mut self, mode: ToggleMode, restore_volume: u8) -> Option<f32> {
        match std::mem::take(&mut self.state) {
            PressState::Pressed => Some(mode.released_level(restore_volume)),
            PressState::Idle => None,
        }
    }
}
