// ── Render planning ──
//
// Turns a level of the tree into per-key render commands for the device
// adapter. Planning is pure; the Surface trait is the adapter-facing
// sink (physical deck, virtual deck, or a headless logger).

use crate::model::ButtonNode;

/// Key slot of the synthetic lock button (center of a 15-key grid).
pub const LOCK_KEY_INDEX: u8 = 7;

/// Image reference shown on the synthetic lock button.
pub const LOCK_IMAGE: &str = "lock.png";

/// One key slot ready to hand to the surface. Slots not covered by a
/// `KeyRender` stay blank after the preceding clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRender {
    pub index: u8,
    pub name: String,
    pub image: Option<String>,
}

/// Render sink for the physical or virtual control surface.
///
/// The deck clears all keys before re-rendering a level, then issues one
/// `render_key` per declared button.
pub trait Surface: Send + Sync {
    fn clear_all(&self);
    fn render_key(&self, key: &KeyRender);
}

/// Plan the render of one level: each button shows its current state's
/// image (first declared state when the selector is unset or unknown) or
/// its plain image.
pub fn plan_level(buttons: &[ButtonNode]) -> Vec<KeyRender> {
    buttons
        .iter()
        .map(|button| KeyRender {
            index: button.button_number,
            name: button.name.clone(),
            image: button.current_image().map(str::to_owned),
        })
        .collect()
}

/// The synthetic single-button level shown while the deck is locked.
pub fn lock_screen() -> Vec<KeyRender> {
    vec![KeyRender {
        index: LOCK_KEY_INDEX,
        name: "Lock".to_owned(),
        image: Some(LOCK_IMAGE.to_owned()),
    }]
}
