//! Runtime tunables. Every field has a default taken from [`crate::constants`],
//! and every section is `#[serde(default)]` so partial JSON files load.

use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub gesture: GestureConfig,
    pub transition: TransitionConfig,
    pub layout: LayoutConfig,
    pub camera: CameraConfig,
}

/// Calibration of the pinch-to-palm ratio into a unit tension signal.
///
/// `tension = clamp((pinch / palm - tension_offset) / tension_span, 0, 1)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub tension_offset: f32,
    pub tension_span: f32,
    pub palm_size_floor: f32,
    pub palm_size_epsilon: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tension_offset: TENSION_OFFSET,
            tension_span: TENSION_SPAN,
            palm_size_floor: PALM_SIZE_FLOOR,
            palm_size_epsilon: PALM_SIZE_EPSILON,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingConfig {
    pub position: f32,
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub color: f32,
    pub emissive: f32,
    pub group: f32,
}

impl Default for DampingConfig {
    fn default() -> Self {
        Self {
            position: POSITION_TAU_SEC,
            rotation: ROTATION_TAU_SEC,
            scale: SCALE_TAU_SEC,
            opacity: OPACITY_TAU_SEC,
            color: COLOR_TAU_SEC,
            emissive: EMISSIVE_TAU_SEC,
            group: GROUP_TAU_SEC,
        }
    }
}

/// A sinusoidal scale pulse: `amplitude * sin(2π t / period_sec)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub period_sec: f32,
    pub amplitude: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            period_sec: 2.5,
            amplitude: 0.05,
        }
    }
}

impl PulseConfig {
    pub fn sample(&self, elapsed_sec: f32) -> f32 {
        if self.period_sec <= 0.0 {
            return 0.0;
        }
        self.amplitude * (std::f32::consts::TAU * elapsed_sec / self.period_sec).sin()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub contract_threshold: f32,
    pub reveal_threshold: f32,
    /// Tension the engine assumes while no hand is detected.
    pub idle_tension: f32,
    pub damping: DampingConfig,
    pub heartbeat: PulseConfig,
    pub breathing: PulseConfig,

    pub contracted_scale: f32,
    pub contracted_opacity: f32,
    pub contracted_emissive: [f32; 3],

    pub expanding_scale_min: f32,
    pub expanding_scale_max: f32,
    pub expanding_opacity_min: f32,
    pub expanding_opacity_max: f32,
    pub expanding_emissive_max: [f32; 3],

    pub presentation_point: [f32; 3],
    pub reveal_scale_fraction: f32,
    pub reveal_scatter: f32,

    pub gallery_scale: f32,
    /// Must exceed the fastest heart spin, `heart_spin_per_sec * heart_spin_bias`.
    pub gallery_spin_per_sec: f32,
    pub heart_spin_per_sec: f32,
    pub heart_spin_bias: f32, // spin = heart_spin_per_sec * (bias - tension)
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            contract_threshold: CONTRACT_THRESHOLD,
            reveal_threshold: REVEAL_THRESHOLD,
            idle_tension: 0.0,
            damping: DampingConfig::default(),
            heartbeat: PulseConfig::default(),
            breathing: PulseConfig {
                period_sec: 4.0,
                amplitude: 0.02,
            },
            contracted_scale: 0.4,
            contracted_opacity: 0.7,
            contracted_emissive: [2.5, 0.3, 0.6],
            expanding_scale_min: 1.0,
            expanding_scale_max: 1.2,
            expanding_opacity_min: 0.8,
            expanding_opacity_max: 0.9,
            expanding_emissive_max: [0.3, 0.1, 0.2],
            presentation_point: [0.0, 0.0, 7.0],
            reveal_scale_fraction: 0.45,
            reveal_scatter: 3.5,
            gallery_scale: 1.5,
            gallery_spin_per_sec: 0.2,
            heart_spin_per_sec: 0.15,
            heart_spin_bias: 1.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub object_count: usize,
    pub heart_scale: f32,
    pub heart_depth: f32,
    pub exploded_extent: [f32; 3],
    pub rest_jitter: [f32; 3],
    pub gallery_radius: f32,
    pub gallery_reference_extent: f32,
    /// Fixed seed for the randomized parts of the layout; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            object_count: DEFAULT_OBJECT_COUNT,
            heart_scale: HEART_SCALE,
            heart_depth: HEART_DEPTH,
            exploded_extent: EXPLODED_EXTENT,
            rest_jitter: REST_JITTER,
            gallery_radius: GALLERY_RADIUS,
            gallery_reference_extent: GALLERY_REFERENCE_EXTENT,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub fovy_degrees: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, CAMERA_Z],
            target: [0.0, 0.0, 0.0],
            fovy_degrees: CAMERA_FOV_DEG,
            aspect: 16.0 / 9.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl BloomConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: BloomConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        log::info!("[config] loaded {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.transition;
        let ordered = t.contract_threshold >= 0.0
            && t.contract_threshold < t.reveal_threshold
            && t.reveal_threshold <= 1.0;
        if !ordered {
            return Err(ConfigError::ThresholdOrder {
                contract: t.contract_threshold,
                reveal: t.reveal_threshold,
            });
        }
        let d = &t.damping;
        let positive = [
            ("damping.position", d.position),
            ("damping.rotation", d.rotation),
            ("damping.scale", d.scale),
            ("damping.opacity", d.opacity),
            ("damping.color", d.color),
            ("damping.emissive", d.emissive),
            ("damping.group", d.group),
            ("gesture.tension_span", self.gesture.tension_span),
            ("gesture.palm_size_floor", self.gesture.palm_size_floor),
            ("layout.gallery_reference_extent", self.layout.gallery_reference_extent),
            ("camera.fovy_degrees", self.camera.fovy_degrees),
            ("camera.aspect", self.camera.aspect),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        let heart_max = t.heart_spin_per_sec * t.heart_spin_bias;
        if t.gallery_spin_per_sec.is_nan() || t.gallery_spin_per_sec <= heart_max {
            return Err(ConfigError::SpinOrder {
                gallery: t.gallery_spin_per_sec,
                heart_max,
            });
        }
        if self.layout.object_count == 0 {
            return Err(ConfigError::NoObjects);
        }
        Ok(())
    }
}
