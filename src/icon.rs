//! Tray icons, drawn in code: a filled circle recolored per mic state.

use std::sync::LazyLock;

use hushkey_core::MicState;

const SIZE: u32 = 32;

const COLOR_IDLE: (u8, u8, u8) = (158, 158, 158);
const COLOR_MUTED: (u8, u8, u8) = (229, 57, 53);
const COLOR_LIVE: (u8, u8, u8) = (67, 160, 71);

static ICON_IDLE: LazyLock<tray_icon::Icon> = LazyLock::new(|| render(COLOR_IDLE));
static ICON_MUTED: LazyLock<tray_icon::Icon> = LazyLock::new(|| render(COLOR_MUTED));
static ICON_LIVE: LazyLock<tray_icon::Icon> = LazyLock::new(|| render(COLOR_LIVE));

/// Extension trait mapping mic states to tray icons.
pub trait IconExt {
    fn icon(&self) -> tray_icon::Icon;
}

impl IconExt for MicState {
    fn icon(&self) -> tray_icon::Icon {
        match self {
            MicState::Idle => ICON_IDLE.clone(),
            MicState::Muted => ICON_MUTED.clone(),
            MicState::Live => ICON_LIVE.clone(),
        }
    }
}

fn render((r, g, b): (u8, u8, u8)) -> tray_icon::Icon {
    let center = (SIZE as f32 - 1.0) / 2.0;
    let radius = SIZE as f32 / 2.0 - 1.0;

    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let alpha = if (dx * dx + dy * dy).sqrt() <= radius {
                255
            } else {
                0
            };
            rgba.extend_from_slice(&[r, g, b, alpha]);
        }
    }

    tray_icon::Icon::from_rgba(rgba, SIZE, SIZE).expect("Failed to build icon")
}
