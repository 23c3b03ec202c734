//! Status text model for an on-screen overlay. Drawing it is up to the front-end.

use crate::gesture::GestureSignal;
use crate::transition::DisplayMode;

pub const EXPANDED_LABEL_THRESHOLD: f32 = 0.8;
pub const EXPANDING_LABEL_THRESHOLD: f32 = 0.3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudStatus {
    /// "Raise your hand" prompt: camera is up but nothing is tracked.
    pub prompt_visible: bool,
    /// Camera permission hint.
    pub camera_hint_visible: bool,
    pub label: &'static str,
    pub tension_percent: u8,
    /// Set while the engine is spotlighting a photo.
    pub message: Option<String>,
}

pub fn status_label(signal: &GestureSignal) -> &'static str {
    if signal.gallery_mode {
        "Gallery"
    } else if !signal.detected {
        "Idle"
    } else if signal.tension > EXPANDED_LABEL_THRESHOLD {
        "Expanded"
    } else if signal.tension > EXPANDING_LABEL_THRESHOLD {
        "Expanding"
    } else {
        "Contracted"
    }
}

pub fn hud_status(
    signal: &GestureSignal,
    camera_ready: bool,
    mode: DisplayMode,
    hidden_message: &str,
) -> HudStatus {
    let tension = if signal.tension.is_finite() {
        signal.tension.clamp(0.0, 1.0)
    } else {
        0.0
    };
    HudStatus {
        prompt_visible: camera_ready && !signal.detected && !signal.gallery_mode,
        camera_hint_visible: !camera_ready,
        label: status_label(signal),
        tension_percent: (tension * 100.0).round() as u8,
        message: (mode == DisplayMode::Reveal).then(|| hidden_message.to_string()),
    }
}

impl HudStatus {
    /// One-line summary, used for window titles and logs.
    pub fn summary(&self) -> String {
        if self.label == "Gallery" {
            return "GALLERY MODE ACTIVE".to_string();
        }
        format!("{} | tension {}%", self.label, self.tension_percent)
    }
}
