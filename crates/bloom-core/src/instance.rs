//! Renderer-facing snapshot of the engine: one POD record per object.

use crate::transition::{DisplayObject, GroupTransform, TransitionEngine};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// World matrix, column-major, group transform included.
    pub model: [[f32; 4]; 4],
    /// Photo tint times animated color; alpha is opacity.
    pub color: [f32; 4],
    /// Emissive rgb, w unused.
    pub emissive: [f32; 4],
}

pub const FLOATS_PER_INSTANCE: usize = std::mem::size_of::<InstanceRaw>() / std::mem::size_of::<f32>();

impl InstanceRaw {
    pub fn new(group: &GroupTransform, obj: &DisplayObject) -> Self {
        let t = obj.transform();
        let model = group.matrix() * t.local_matrix();
        let rgb = Vec3::from(obj.tint) * t.color;
        Self {
            model: model.to_cols_array_2d(),
            color: [rgb.x, rgb.y, rgb.z, t.opacity],
            emissive: [t.emissive.x, t.emissive.y, t.emissive.z, 0.0],
        }
    }

    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

impl TransitionEngine {
    pub fn instances(&self) -> Vec<InstanceRaw> {
        let group = self.group();
        self.objects()
            .iter()
            .map(|obj| InstanceRaw::new(group, obj))
            .collect()
    }
}

/// Flat `f32` view, e.g. for copying into a JS `Float32Array`.
pub fn instances_as_floats(instances: &[InstanceRaw]) -> &[f32] {
    bytemuck::cast_slice(instances)
}
