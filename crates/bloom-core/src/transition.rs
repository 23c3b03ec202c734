//! The particle transition engine.
//!
//! Every tick the engine picks a [`DisplayMode`] from the captured
//! `(gallery_mode, tension)` pair, derives a target transform per object, and
//! moves each channel of each object toward its target with exponential
//! damping. Nothing is edge-triggered: targets are recomputed from scratch
//! each tick, so crossing a threshold never causes a jump and a skipped frame
//! just means a larger step next time.
//!
//! Mode precedence is Gallery > Reveal > Expanding > Contracted.

use crate::config::{BloomConfig, LayoutConfig, TransitionConfig};
use crate::constants::{GALLERY_MIN_FACTOR, HOT_PINK, MAX_TICK_DT_SEC, WHITE};
use crate::damping::{damp, damp_euler, damp_vec3};
use crate::gesture::GestureSignal;
use crate::layout::{generate_layouts, layout_rng, ObjectLayout};
use crate::photos::{assign_cyclic, photo_tint, PhotoRef};
use crate::state::{Camera, Viewport};
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Two or more hands: photos on a slowly spinning sphere, facing the viewer.
    Gallery,
    /// Near-full tension: object 0 is spotlighted, the rest scatter and fade.
    Reveal,
    /// Between the thresholds: objects drift from the heart toward their exploded points.
    Expanding,
    /// Low tension or no hand: the beating heart.
    Contracted,
}

impl DisplayMode {
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Gallery => "gallery",
            DisplayMode::Reveal => "reveal",
            DisplayMode::Expanding => "expanding",
            DisplayMode::Contracted => "contracted",
        }
    }
}

pub fn select_mode(gallery_mode: bool, tension: f32, config: &TransitionConfig) -> DisplayMode {
    if gallery_mode {
        DisplayMode::Gallery
    } else if tension > config.reveal_threshold {
        DisplayMode::Reveal
    } else if tension > config.contract_threshold {
        DisplayMode::Expanding
    } else {
        DisplayMode::Contracted
    }
}

/// Position of `tension` inside the expanding band, clamped to [0, 1].
pub fn expansion_factor(tension: f32, config: &TransitionConfig) -> f32 {
    let band = config.reveal_threshold - config.contract_threshold;
    if band.is_nan() || band <= 0.0 {
        return 0.0;
    }
    ((tension - config.contract_threshold) / band).clamp(0.0, 1.0)
}

/// Animated state of one object, in group-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectTransform {
    pub position: Vec3,
    /// Euler angles (XYZ order), radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub opacity: f32,
    pub color: Vec3,
    pub emissive: Vec3,
}

impl ObjectTransform {
    pub const INITIAL: ObjectTransform = ObjectTransform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
        opacity: 1.0,
        color: Vec3::new(HOT_PINK[0], HOT_PINK[1], HOT_PINK[2]),
        emissive: Vec3::ZERO,
    };

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.rotation.is_finite()
            && self.scale.is_finite()
            && self.opacity.is_finite()
            && self.color.is_finite()
            && self.emissive.is_finite()
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// What an object is steering toward this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectTarget {
    pub transform: ObjectTransform,
    /// Rotation is applied as-is instead of damped (gallery look-at).
    pub snap_rotation: bool,
}

#[derive(Clone, Debug)]
pub struct DisplayObject {
    pub id: usize,
    pub photo: PhotoRef,
    pub tint: [f32; 3],
    layout: ObjectLayout,
    transform: ObjectTransform,
}

impl DisplayObject {
    fn new(id: usize, photo: PhotoRef, layout: ObjectLayout) -> Self {
        let tint = photo_tint(&photo.id);
        Self {
            id,
            photo,
            tint,
            layout,
            transform: ObjectTransform::INITIAL,
        }
    }

    pub fn layout(&self) -> &ObjectLayout {
        &self.layout
    }

    pub fn transform(&self) -> &ObjectTransform {
        &self.transform
    }

    fn bind_photo(&mut self, photo: PhotoRef) {
        if self.photo != photo {
            self.tint = photo_tint(&photo.id);
            self.photo = photo;
        }
    }
}

/// Transform applied to the whole set on top of each object's own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupTransform {
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl GroupTransform {
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.quat(), Vec3::ZERO)
    }

    /// Map a world-space point into group-local space.
    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        self.quat().inverse() * (world / self.scale.max(f32::EPSILON))
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.quat() * (local * self.scale)
    }
}

/// Everything a target needs that is shared by all objects in one tick.
struct TickFrame<'a> {
    config: &'a TransitionConfig,
    mode: DisplayMode,
    expansion: f32,
    elapsed: f32,
    group: GroupTransform,
    group_inverse: Quat,
    eye: Vec3,
    up: Vec3,
    gallery_factor: f32,
    reveal_scale: f32,
    presentation_local: Vec3,
}

impl TickFrame<'_> {
    fn target(&self, index: usize, layout: &ObjectLayout, current: &ObjectTransform) -> ObjectTarget {
        let c = self.config;
        let white = Vec3::from(WHITE);
        let mut snap_rotation = false;
        let transform = match self.mode {
            DisplayMode::Gallery => {
                snap_rotation = true;
                ObjectTransform {
                    position: layout.gallery_position * self.gallery_factor,
                    rotation: self.face_viewer(current.position),
                    scale: Vec3::splat(c.gallery_scale),
                    opacity: 1.0,
                    color: white,
                    emissive: Vec3::ZERO,
                }
            }
            DisplayMode::Reveal if index == 0 => {
                let s = self.reveal_scale / self.group.scale.max(f32::EPSILON);
                ObjectTransform {
                    position: self.presentation_local,
                    rotation: euler_xyz(self.group_inverse),
                    scale: Vec3::new(s, s, 1.0),
                    opacity: 1.0,
                    color: white,
                    emissive: Vec3::ZERO,
                }
            }
            DisplayMode::Reveal => ObjectTransform {
                position: layout.exploded_position * c.reveal_scatter,
                rotation: layout.rest_rotation,
                scale: Vec3::ZERO,
                opacity: 0.0,
                color: white,
                emissive: Vec3::ZERO,
            },
            DisplayMode::Expanding => {
                let f = self.expansion;
                let scale = c.expanding_scale_min + (c.expanding_scale_max - c.expanding_scale_min) * f;
                ObjectTransform {
                    position: layout.rest_position.lerp(layout.exploded_position, f),
                    rotation: layout.rest_rotation,
                    scale: Vec3::splat(scale),
                    opacity: c.expanding_opacity_min
                        + (c.expanding_opacity_max - c.expanding_opacity_min) * f,
                    color: white,
                    emissive: Vec3::from(c.expanding_emissive_max) * f,
                }
            }
            DisplayMode::Contracted => {
                let scale = c.contracted_scale + c.heartbeat.sample(self.elapsed);
                ObjectTransform {
                    position: layout.rest_position,
                    rotation: layout.rest_rotation,
                    scale: Vec3::splat(scale.max(0.0)),
                    opacity: c.contracted_opacity,
                    color: white,
                    emissive: Vec3::from(c.contracted_emissive),
                }
            }
        };
        ObjectTarget {
            transform,
            snap_rotation,
        }
    }

    /// Local rotation that turns an object's +Z toward the camera eye,
    /// compensating for the group's own rotation.
    fn face_viewer(&self, local_position: Vec3) -> Vec3 {
        let world = self.group.local_to_world(local_position);
        let to_eye = self.eye - world;
        if to_eye.length_squared() < 1e-8 {
            return euler_xyz(self.group_inverse);
        }
        let z = to_eye.normalize();
        let mut x = self.up.cross(z);
        if x.length_squared() < 1e-8 {
            x = Vec3::X;
        }
        let x = x.normalize();
        let y = z.cross(x);
        let world_rot = Quat::from_mat3(&Mat3::from_cols(x, y, z));
        euler_xyz(self.group_inverse * world_rot)
    }
}

struct FrameInputs<'a> {
    config: &'a TransitionConfig,
    layout: &'a LayoutConfig,
    camera: &'a Camera,
    group: GroupTransform,
    elapsed: f32,
}

impl<'a> FrameInputs<'a> {
    fn frame(self, mode: DisplayMode, tension: f32) -> TickFrame<'a> {
        let viewport = self.camera.viewport();
        let presentation = Vec3::from(self.config.presentation_point);
        TickFrame {
            config: self.config,
            mode,
            expansion: expansion_factor(tension, self.config),
            elapsed: self.elapsed,
            group: self.group,
            group_inverse: self.group.quat().inverse(),
            eye: self.camera.eye,
            up: self.camera.up,
            gallery_factor: gallery_factor(viewport, self.layout),
            reveal_scale: viewport.min_side() * self.config.reveal_scale_fraction,
            presentation_local: self.group.world_to_local(presentation),
        }
    }
}

#[inline]
fn euler_xyz(q: Quat) -> Vec3 {
    let (a, b, c) = q.normalize().to_euler(EulerRot::XYZ);
    Vec3::new(a, b, c)
}

#[inline]
fn sanitize_dt(dt_sec: f32) -> f32 {
    if dt_sec.is_finite() {
        dt_sec.clamp(0.0, MAX_TICK_DT_SEC)
    } else {
        0.0
    }
}

pub struct TransitionEngine {
    config: TransitionConfig,
    layout_config: LayoutConfig,
    camera: Camera,
    objects: Vec<DisplayObject>,
    group: GroupTransform,
    elapsed: f32,
    mode: DisplayMode,
    ticks: u64,
}

impl TransitionEngine {
    pub fn new(config: &BloomConfig, photos: &[PhotoRef]) -> Self {
        let mut engine = Self {
            config: config.transition.clone(),
            layout_config: config.layout.clone(),
            camera: Camera::from_config(&config.camera),
            objects: Vec::new(),
            group: GroupTransform::default(),
            elapsed: 0.0,
            mode: DisplayMode::Contracted,
            ticks: 0,
        };
        engine.rebuild(config.layout.object_count, photos);
        engine
    }

    /// Recreate all objects with fresh layouts. Only needed when the object
    /// count changes; photo changes go through [`assign_photos`](Self::assign_photos).
    pub fn rebuild(&mut self, count: usize, photos: &[PhotoRef]) {
        let count = count.max(1);
        self.layout_config.object_count = count;
        let mut rng = layout_rng(&self.layout_config);
        self.objects = generate_layouts(count, &self.layout_config, &mut rng)
            .into_iter()
            .enumerate()
            .map(|(i, layout)| DisplayObject::new(i, assign_cyclic(photos, i), layout))
            .collect();
        log::info!("[engine] built {} objects for {} photos", count, photos.len());
    }

    /// Rebind photos without touching layouts or animated state.
    pub fn assign_photos(&mut self, photos: &[PhotoRef]) {
        for (i, obj) in self.objects.iter_mut().enumerate() {
            obj.bind_photo(assign_cyclic(photos, i));
        }
        log::debug!("[engine] rebound {} photos", photos.len());
    }

    pub fn set_object_count(&mut self, count: usize, photos: &[PhotoRef]) {
        if count != self.objects.len() {
            self.rebuild(count, photos);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn objects(&self) -> &[DisplayObject] {
        &self.objects
    }

    pub fn group(&self) -> &GroupTransform {
        &self.group
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Viewport-responsive shrink applied to the gallery sphere.
    pub fn gallery_factor(&self) -> f32 {
        gallery_factor(self.camera.viewport(), &self.layout_config)
    }

    /// Advance the animation by `dt_sec` using one captured signal for all objects.
    pub fn tick(&mut self, signal: &GestureSignal, dt_sec: f32) {
        let signal = *signal;
        let dt = sanitize_dt(dt_sec);
        let tension = signal.effective_tension(self.config.idle_tension);
        let mode = select_mode(signal.gallery_mode, tension, &self.config);
        if mode != self.mode {
            log::debug!(
                "[engine] {} -> {} (tension {:.2})",
                self.mode.label(),
                mode.label(),
                tension
            );
            self.mode = mode;
        }
        self.elapsed += dt;
        self.ticks += 1;
        self.update_group(mode, tension, dt);

        let frame = FrameInputs {
            config: &self.config,
            layout: &self.layout_config,
            camera: &self.camera,
            group: self.group,
            elapsed: self.elapsed,
        }
        .frame(mode, tension);
        let d = &self.config.damping;
        for (i, obj) in self.objects.iter_mut().enumerate() {
            let target = frame.target(i, &obj.layout, &obj.transform);
            let t = &mut obj.transform;
            let goal = &target.transform;
            t.position = damp_vec3(t.position, goal.position, d.position, dt);
            t.scale = damp_vec3(t.scale, goal.scale, d.scale, dt);
            t.rotation = if target.snap_rotation {
                goal.rotation
            } else {
                damp_euler(t.rotation, goal.rotation, d.rotation, dt)
            };
            t.opacity = damp(t.opacity, goal.opacity, d.opacity, dt).clamp(0.0, 1.0);
            t.color = damp_vec3(t.color, goal.color, d.color, dt);
            t.emissive = damp_vec3(t.emissive, goal.emissive, d.emissive, dt);
            if !t.is_finite() {
                log::warn!("[engine] object {} left the finite range; snapping to target", i);
                *t = *goal;
            }
        }
    }

    /// Target the given object would steer toward right now.
    pub fn target_for(&self, index: usize, signal: &GestureSignal) -> Option<ObjectTarget> {
        let obj = self.objects.get(index)?;
        let tension = signal.effective_tension(self.config.idle_tension);
        let mode = select_mode(signal.gallery_mode, tension, &self.config);
        let frame = self.inputs().frame(mode, tension);
        Some(frame.target(index, &obj.layout, &obj.transform))
    }

    fn inputs(&self) -> FrameInputs<'_> {
        FrameInputs {
            config: &self.config,
            layout: &self.layout_config,
            camera: &self.camera,
            group: self.group,
            elapsed: self.elapsed,
        }
    }

    fn update_group(&mut self, mode: DisplayMode, tension: f32, dt: f32) {
        let c = &self.config;
        let g = &mut self.group;
        let tau = c.damping.group;
        match mode {
            DisplayMode::Gallery => {
                g.rotation.y += c.gallery_spin_per_sec * dt;
                g.rotation.x = damp(g.rotation.x, 0.0, tau, dt);
                g.scale = damp(g.scale, 1.0, tau, dt);
            }
            _ => {
                g.rotation.y += c.heart_spin_per_sec * dt * (c.heart_spin_bias - tension);
                let breath = 1.0 + c.breathing.sample(self.elapsed);
                g.scale = damp(g.scale, breath, tau, dt);
            }
        }
        g.rotation.y = g.rotation.y.rem_euclid(TAU);
    }
}

pub fn gallery_factor(viewport: Viewport, layout: &LayoutConfig) -> f32 {
    if layout.gallery_reference_extent.is_nan() || layout.gallery_reference_extent <= 0.0 {
        return 1.0;
    }
    (viewport.min_side() / layout.gallery_reference_extent).clamp(GALLERY_MIN_FACTOR, 1.0)
}
