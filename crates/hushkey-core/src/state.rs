//! Microphone display state for the tray icon.

use crate::{PressState, ToggleMode};

/// What the microphone is doing right now, as shown in the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicState {
    /// Trigger key not held; microphone at its resting level.
    Idle,
    /// Trigger key held in mute-while-pressed mode; microphone silenced.
    Muted,
    /// Trigger key held in unmute-while-pressed mode; microphone open.
    Live,
}

impl MicState {
    /// Derive the display state from the press state and toggle mode.
    pub fn from_press(state: PressState, mode: ToggleMode) -> Self {
        match (state, mode) {
            (PressState::Idle, _) => MicState::Idle,
            (PressState::Pressed, ToggleMode::MuteWhilePressed) => MicState::Muted,
            (PressState::Pressed, ToggleMode::UnmuteWhilePressed) => MicState::Live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_idle_in_both_modes() {
        assert_eq!(
            MicState::from_press(PressState::Idle, ToggleMode::MuteWhilePressed),
            MicState::Idle
        );
        assert_eq!(
            MicState::from_press(PressState::Idle, ToggleMode::UnmuteWhilePressed),
            MicState::Idle
        );
    }

    #[test]
    fn pressed_reflects_mode() {
        assert_eq!(
            MicState::from_press(PressState::Pressed, ToggleMode::MuteWhilePressed),
            MicState::Muted
        );
        assert_eq!(
            MicState::from_press(PressState::Pressed, ToggleMode::UnmuteWhilePressed),
            MicState::Live
        );
    }
}
