//! Flat 3D scene: camera, clear configuration, viewport and mesh instances.
//!
//! Meshes are owned by the scene and addressed by `MeshHandle` indices. Model
//! and camera matrices are edited on the CPU and streamed to their uniform
//! buffers once per frame, only when they changed.

use ego_core::{SceneTarget, Viewport};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::mesh_pipeline::MeshPipeline;
use crate::renderer::TextureId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneFlags {
    pub clear_color: bool,
    pub clear_depth: bool,
    pub depth_test: bool,
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self {
            clear_color: true,
            clear_depth: true,
            depth_test: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SceneCreateInfo {
    pub flags: SceneFlags,
    pub clear_color: wgpu::Color,
    pub view_proj: Mat4,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Copy)]
pub struct MeshCreateInfo {
    pub texture: TextureId,
    pub transparent: bool,
    pub model: Mat4,
}

/// Index of a mesh inside the scene that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(usize);

pub struct Mesh {
    texture: TextureId,
    transparent: bool,
    model: Mat4,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    dirty: bool,
}

impl Mesh {
    pub(crate) fn new(device: &wgpu::Device, pipeline: &MeshPipeline, info: MeshCreateInfo) -> Self {
        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Uniform Buffer"),
            contents: bytemuck::cast_slice(&info.model.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let model_bind_group = pipeline.create_model_bind_group(device, &model_buffer);
        Self {
            texture: info.texture,
            transparent: info.transparent,
            model: info.model,
            model_buffer,
            model_bind_group,
            dirty: false,
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
        self.dirty = true;
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.model_bind_group
    }
}

pub struct Scene3D {
    flags: SceneFlags,
    clear_color: wgpu::Color,
    view_proj: Mat4,
    viewport: Viewport,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    camera_dirty: bool,
    meshes: Vec<Mesh>,
}

impl Scene3D {
    pub(crate) fn new(device: &wgpu::Device, pipeline: &MeshPipeline, info: SceneCreateInfo) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::from_mat4(info.view_proj)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = pipeline.create_camera_bind_group(device, &camera_buffer);
        Self {
            flags: info.flags,
            clear_color: info.clear_color,
            view_proj: info.view_proj,
            viewport: info.viewport,
            camera_buffer,
            camera_bind_group,
            camera_dirty: false,
            meshes: Vec::new(),
        }
    }

    pub fn insert(&mut self, mesh: Mesh) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn flags(&self) -> SceneFlags {
        self.flags
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }

    pub fn set_view_proj(&mut self, view_proj: Mat4) {
        self.view_proj = view_proj;
        self.camera_dirty = true;
    }

    /// Transparent mesh indices ordered farthest first.
    pub fn transparent_draw_order(&self) -> Vec<usize> {
        let transparent: Vec<(usize, Mat4)> = self
            .meshes
            .iter()
            .enumerate()
            .filter(|(_, mesh)| mesh.transparent)
            .map(|(i, mesh)| (i, mesh.model))
            .collect();
        back_to_front(self.view_proj, &transparent)
    }

    pub(crate) fn camera_bind_group(&self) -> &wgpu::BindGroup {
        &self.camera_bind_group
    }

    /// Streams changed camera and model matrices to the GPU.
    pub(crate) fn upload(&mut self, queue: &wgpu::Queue) {
        if self.camera_dirty {
            queue.write_buffer(
                &self.camera_buffer,
                0,
                bytemuck::cast_slice(&[CameraUniform::from_mat4(self.view_proj)]),
            );
            self.camera_dirty = false;
        }
        for mesh in self.meshes.iter_mut().filter(|m| m.dirty) {
            queue.write_buffer(
                &mesh.model_buffer,
                0,
                bytemuck::cast_slice(&mesh.model.to_cols_array()),
            );
            mesh.dirty = false;
        }
    }
}

impl SceneTarget for Scene3D {
    type Handle = MeshHandle;

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn set_model_transform(&mut self, handle: MeshHandle, model: Mat4) {
        if let Some(mesh) = self.meshes.get_mut(handle.0) {
            mesh.set_model(model);
        }
    }
}

/// Orders `(index, model)` pairs by the clip-space distance of each model's
/// origin, farthest first.
pub fn back_to_front(view_proj: Mat4, meshes: &[(usize, Mat4)]) -> Vec<usize> {
    let mut keyed: Vec<(usize, f32)> = meshes
        .iter()
        .map(|&(index, model)| (index, (view_proj * model.w_axis).w))
        .collect();
    keyed.sort_by(|a, b| b.1.total_cmp(&a.1));
    keyed.into_iter().map(|(index, _)| index).collect()
}

/// Clips a scene viewport to the render target. Returns `[x, y, w, h]`, or
/// `None` when nothing of it is visible.
pub fn clamp_viewport(viewport: Viewport, target: (u32, u32)) -> Option<[f32; 4]> {
    let (x0, x1) = clip_span(viewport.x, viewport.width, target.0)?;
    let (y0, y1) = clip_span(viewport.y, viewport.height, target.1)?;
    Some([x0 as f32, y0 as f32, (x1 - x0) as f32, (y1 - y0) as f32])
}

/// Intersects `[start, start + len)` with `[0, limit)`.
fn clip_span(start: i32, len: u32, limit: u32) -> Option<(i64, i64)> {
    let lo = i64::from(start).max(0);
    let hi = (i64::from(start) + i64::from(len)).min(i64::from(limit));
    (hi > lo).then_some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera3D;
    use glam::Vec3;

    #[test]
    fn back_to_front_draws_farthest_first() {
        let view_proj = Camera3D::new(800, 800).view_proj();
        let near = Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0));
        let mid = Mat4::from_translation(Vec3::new(0.0, 0.0, 0.0));
        let far = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));

        let order = back_to_front(view_proj, &[(0, near), (1, far), (2, mid)]);
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn back_to_front_keeps_every_index() {
        let view_proj = Camera3D::new(640, 480).view_proj();
        let meshes: Vec<(usize, Mat4)> = (0..8)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 8.0;
                let model = Mat4::from_axis_angle(Vec3::Y, angle)
                    * Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0));
                (i, model)
            })
            .collect();
        let mut order = back_to_front(view_proj, &meshes);
        order.sort_unstable();
        assert_eq!(order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn viewport_inside_target_is_unchanged() {
        let clamped = clamp_viewport(Viewport::from_size(800, 600), (800, 600));
        assert_eq!(clamped, Some([0.0, 0.0, 800.0, 600.0]));
    }

    #[test]
    fn oversized_viewport_is_clipped_to_target() {
        let clamped = clamp_viewport(Viewport::from_size(1920, 1080), (800, 600));
        assert_eq!(clamped, Some([0.0, 0.0, 800.0, 600.0]));
    }

    #[test]
    fn empty_or_offscreen_viewport_is_skipped() {
        assert_eq!(clamp_viewport(Viewport::from_size(0, 600), (800, 600)), None);
        let offscreen = Viewport {
            x: 900,
            y: 0,
            width: 100,
            height: 100,
        };
        assert_eq!(clamp_viewport(offscreen, (800, 600)), None);
    }

    #[test]
    fn negative_origin_clips_instead_of_shifting() {
        let viewport = Viewport {
            x: -100,
            y: -50,
            width: 400,
            height: 300,
        };
        assert_eq!(
            clamp_viewport(viewport, (800, 600)),
            Some([0.0, 0.0, 300.0, 250.0])
        );
    }

    #[test]
    fn viewport_entirely_left_of_target_is_skipped() {
        let viewport = Viewport {
            x: -200,
            y: 0,
            width: 150,
            height: 100,
        };
        assert_eq!(clamp_viewport(viewport, (800, 600)), None);
    }

    #[test]
    fn offset_viewport_is_trimmed_at_far_edge() {
        let viewport = Viewport {
            x: 600,
            y: 500,
            width: 400,
            height: 400,
        };
        assert_eq!(
            clamp_viewport(viewport, (800, 600)),
            Some([600.0, 500.0, 200.0, 100.0])
        );
    }

    #[test]
    fn default_flags_clear_and_depth_test() {
        let flags = SceneFlags::default();
        assert!(flags.clear_color && flags.clear_depth && flags.depth_test);
    }
}
