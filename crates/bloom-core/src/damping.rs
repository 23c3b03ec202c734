//! Frame-rate independent exponential smoothing.
//!
//! Each call moves `current` a fraction `1 - exp(-dt / tau)` of the way to
//! `target`. For a constant target the distance shrinks geometrically and
//! never overshoots.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[inline]
pub fn smoothing_alpha(tau_sec: f32, dt_sec: f32) -> f32 {
    if dt_sec.is_nan() || dt_sec <= 0.0 {
        return 0.0;
    }
    if tau_sec.is_nan() || tau_sec <= 0.0 {
        return 1.0;
    }
    (1.0 - (-dt_sec / tau_sec).exp()).clamp(0.0, 1.0)
}

#[inline]
pub fn damp(current: f32, target: f32, tau_sec: f32, dt_sec: f32) -> f32 {
    current + (target - current) * smoothing_alpha(tau_sec, dt_sec)
}

#[inline]
pub fn damp_vec3(current: Vec3, target: Vec3, tau_sec: f32, dt_sec: f32) -> Vec3 {
    current.lerp(target, smoothing_alpha(tau_sec, dt_sec))
}

/// Difference `to - from` wrapped into (-π, π].
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// Damp an angle along the shorter way around the circle.
#[inline]
pub fn damp_angle(current: f32, target: f32, tau_sec: f32, dt_sec: f32) -> f32 {
    current + angle_delta(current, target) * smoothing_alpha(tau_sec, dt_sec)
}

/// Component-wise [`damp_angle`] for Euler angles.
pub fn damp_euler(current: Vec3, target: Vec3, tau_sec: f32, dt_sec: f32) -> Vec3 {
    Vec3::new(
        damp_angle(current.x, target.x, tau_sec, dt_sec),
        damp_angle(current.y, target.y, tau_sec, dt_sec),
        damp_angle(current.z, target.z, tau_sec, dt_sec),
    )
}
