//! Ring animation: a fixed group of meshes spread evenly around an axis.
//!
//! Every mesh in a ring shares one rotation axis and one translation offset.
//! Mesh `i` of an `N`-sized ring sits at angle `i * 2π/N + rotation`, so the
//! whole ring spins as the global rotation advances while the spacing between
//! neighbours stays fixed:
//!
//! ```text
//! model_i = Rotate(i * 2π/N + rotation, axis) * Translate(offset)
//! ```

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

use crate::scene::SceneTarget;

/// `N` mesh handles sharing an axis, an offset and a blend mode.
#[derive(Debug, Clone)]
pub struct MeshRing<H, const N: usize> {
    handles: [H; N],
    axis: Vec3,
    translation: Vec3,
    transparent: bool,
}

impl<H: Copy, const N: usize> MeshRing<H, N> {
    /// Builds a ring. `axis` is normalized; a zero axis falls back to +Z.
    pub fn new(handles: [H; N], axis: Vec3, translation: Vec3, transparent: bool) -> Self {
        Self {
            handles,
            axis: axis.try_normalize().unwrap_or(Vec3::Z),
            translation,
            transparent,
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn handles(&self) -> &[H; N] {
        &self.handles
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Angular spacing between neighbouring meshes.
    pub fn spacing() -> f32 {
        TAU / N as f32
    }

    pub fn angle(index: usize, rotation: f32) -> f32 {
        index as f32 * Self::spacing() + rotation
    }

    pub fn model(&self, index: usize, rotation: f32) -> Mat4 {
        Mat4::from_axis_angle(self.axis, Self::angle(index, rotation))
            * Mat4::from_translation(self.translation)
    }

    /// Model transform for every handle, in ring order.
    pub fn transforms(&self, rotation: f32) -> impl Iterator<Item = (H, Mat4)> + '_ {
        self.handles
            .iter()
            .enumerate()
            .map(move |(i, &handle)| (handle, self.model(i, rotation)))
    }
}

/// Something that writes per-frame model transforms into a scene.
pub trait Animate<T: SceneTarget> {
    fn animate(&self, rotation: f32, target: &mut T);
}

impl<T: SceneTarget, const N: usize> Animate<T> for MeshRing<T::Handle, N> {
    fn animate(&self, rotation: f32, target: &mut T) {
        for (handle, model) in self.transforms(rotation) {
            target.set_model_transform(handle, model);
        }
    }
}

impl<T: SceneTarget, A: Animate<T>, B: Animate<T>> Animate<T> for (A, B) {
    fn animate(&self, rotation: f32, target: &mut T) {
        self.0.animate(rotation, target);
        self.1.animate(rotation, target);
    }
}
