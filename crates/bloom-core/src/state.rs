//! Camera and viewport description shared with the front-ends.
//!
//! The engine needs the camera for two things: turning gallery photos toward
//! the viewer, and sizing the spotlighted photo relative to what is visible.

use crate::config::CameraConfig;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn from_config(c: &CameraConfig) -> Self {
        Self {
            eye: Vec3::from(c.eye),
            target: Vec3::from(c.target),
            up: Vec3::Y,
            aspect: c.aspect,
            fovy_radians: c.fovy_degrees.to_radians(),
            znear: c.znear,
            zfar: c.zfar,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-space size of the visible area at the camera's focus distance.
    pub fn viewport(&self) -> Viewport {
        let distance = self.eye.distance(self.target);
        let height = 2.0 * distance * (self.fovy_radians * 0.5).tan();
        Viewport {
            width: height * self.aspect,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}
