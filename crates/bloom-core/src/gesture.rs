//! Gesture interpretation: one frame of hand landmarks in, one [`GestureSignal`] out.
//!
//! Tension is the thumb-to-index pinch distance normalized by palm size
//! (wrist to middle-finger base), so it does not depend on how far the hand
//! is from the camera. Only the first hand drives tension; the number of
//! hands drives gallery mode.

use crate::config::GestureConfig;
use crate::constants::*;
use crate::error::ObservationError;
use crate::landmark::{FrameResult, HandObservation, Landmark};
use glam::Vec2;

/// The interpreter's output, replaced wholesale every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSignal {
    pub detected: bool,
    /// 0 = closed pinch, 1 = fully open. Always within [0, 1].
    pub tension: f32,
    /// Anchor of hand 0 in [0, 1]², x mirrored so it follows the user.
    pub reference_position: Vec2,
    pub gallery_mode: bool,
}

impl Default for GestureSignal {
    fn default() -> Self {
        Self::IDLE
    }
}

impl GestureSignal {
    pub const IDLE: GestureSignal = GestureSignal {
        detected: false,
        tension: 0.0,
        reference_position: Vec2::ZERO,
        gallery_mode: false,
    };

    /// Tension downstream consumers should act on, `idle` when no hand is tracked.
    /// Non-finite values are treated as an absent signal.
    pub fn effective_tension(&self, idle: f32) -> f32 {
        let t = if self.detected { self.tension } else { idle };
        if t.is_finite() {
            t.clamp(0.0, 1.0)
        } else {
            idle.clamp(0.0, 1.0)
        }
    }
}

/// Geometry extracted from one valid hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandMeasurement {
    pub pinch_distance: f32,
    pub palm_size: f32,
    pub tension: f32,
    pub reference_position: Vec2,
}

/// Compute pinch, palm and tension for a hand, or report which landmark is missing.
pub fn measure_hand(
    hand: &HandObservation,
    config: &GestureConfig,
) -> Result<HandMeasurement, ObservationError> {
    let wrist = hand.require(WRIST)?;
    let thumb = hand.require(THUMB_TIP)?;
    let index = hand.require(INDEX_TIP)?;
    let anchor = hand.require(MIDDLE_MCP)?;

    let pinch_distance = thumb.distance(index);
    let mut palm_size = wrist.distance(anchor);
    if palm_size.is_nan() || palm_size < config.palm_size_epsilon {
        palm_size = config.palm_size_floor;
    }

    let tension = tension_from_ratio(pinch_distance / palm_size, config)
        .ok_or(ObservationError::NonFiniteTension)?;

    Ok(HandMeasurement {
        pinch_distance,
        palm_size,
        tension,
        reference_position: mirrored_anchor(anchor),
    })
}

/// Map a pinch/palm ratio to unit tension. `None` only for non-finite input.
pub fn tension_from_ratio(ratio: f32, config: &GestureConfig) -> Option<f32> {
    let span = if config.tension_span > 0.0 {
        config.tension_span
    } else {
        TENSION_SPAN
    };
    let raw = (ratio - config.tension_offset) / span;
    if raw.is_nan() {
        return None;
    }
    Some(raw.clamp(0.0, 1.0))
}

#[inline]
fn mirrored_anchor(anchor: Landmark) -> Vec2 {
    Vec2::new(1.0 - anchor.x, anchor.y).clamp(Vec2::ZERO, Vec2::ONE)
}

/// Stateless apart from the last anchor it saw, which is kept for inspection
/// only and never fed back into a later signal.
#[derive(Clone, Debug, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    last_anchor: Option<Landmark>,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_anchor: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn last_anchor(&self) -> Option<Landmark> {
        self.last_anchor
    }

    pub fn interpret(&mut self, frame: &FrameResult) -> GestureSignal {
        let gallery_mode = frame.hand_count() >= GALLERY_HAND_COUNT;
        let absent = GestureSignal {
            gallery_mode,
            ..GestureSignal::IDLE
        };

        let Some(hand) = frame.primary() else {
            return absent;
        };

        match measure_hand(hand, &self.config) {
            Ok(m) => {
                self.last_anchor = hand.landmark(MIDDLE_MCP);
                GestureSignal {
                    detected: true,
                    tension: m.tension,
                    reference_position: m.reference_position,
                    gallery_mode,
                }
            }
            Err(e) => {
                log::debug!("[gesture] hand 0 rejected: {}", e);
                absent
            }
        }
    }
}
