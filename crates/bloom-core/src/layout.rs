//! Resting layouts computed once per display object: a point on the heart
//! curve, a random outward point, and a point on an evenly covered sphere.

use crate::config::LayoutConfig;
use glam::{Vec2, Vec3};
use rand::prelude::*;
use std::f32::consts::PI;

/// Where an object sits in each arrangement. Never recomputed after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectLayout {
    pub rest_position: Vec3,
    pub exploded_position: Vec3,
    pub gallery_position: Vec3,
    pub rest_rotation: Vec3,
}

/// Classic parametric heart, roughly 32 wide and 30 tall, for t in [-π, π].
#[inline]
pub fn heart_point(t: f32) -> Vec2 {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    Vec2::new(x, y)
}

/// Point `i` of `count` on the unit Fibonacci sphere, top to bottom.
pub fn fibonacci_sphere(i: usize, count: usize) -> Vec3 {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    let y = if count <= 1 {
        0.0
    } else {
        1.0 - (i as f32 / (count - 1) as f32) * 2.0
    };
    let radius = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden_angle * i as f32;
    Vec3::new(theta.cos() * radius, y, theta.sin() * radius)
}

#[inline]
fn centered<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * extent
}

pub fn generate_layouts<R: Rng + ?Sized>(
    count: usize,
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<ObjectLayout> {
    let [ex, ey, ez] = config.exploded_extent;
    let [jx, jy, jz] = config.rest_jitter;
    (0..count)
        .map(|i| {
            let t = (i as f32 / count as f32) * 2.0 * PI - PI;
            let h = heart_point(t);
            // thicker through the lobes, thin at the tip
            let depth = centered(rng, 1.0) * (config.heart_depth * t.cos()).abs();
            let rest_position = Vec3::new(h.x, h.y, depth) * config.heart_scale;

            let rest_rotation = Vec3::new(centered(rng, jx), centered(rng, jy), centered(rng, jz));
            let exploded_position =
                Vec3::new(centered(rng, ex), centered(rng, ey), centered(rng, ez));
            let gallery_position = fibonacci_sphere(i, count) * config.gallery_radius;

            ObjectLayout {
                rest_position,
                exploded_position,
                gallery_position,
                rest_rotation,
            }
        })
        .collect()
}

/// RNG for layout generation, reproducible when the config pins a seed.
pub fn layout_rng(config: &LayoutConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
