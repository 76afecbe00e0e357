//! One-time scene setup: camera, scene, textures and the two mesh rings.

use ego_core::{MeshRing, Viewport};
use ego_render::{
    Camera3D, MeshCreateInfo, MeshHandle, Renderer, SceneCreateInfo, SceneFlags, SceneId,
    TextureId,
};
use glam::{Mat4, Vec3};

use crate::config::SampleConfig;

pub const RING_SIZE: usize = 8;

pub type Ring = MeshRing<MeshHandle, RING_SIZE>;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.4,
    b: 0.4,
    a: 1.0,
};

/// Placement shared by every mesh of a ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPlacement {
    pub axis: Vec3,
    pub translation: Vec3,
    pub transparent: bool,
}

pub const ALPHA_RING: RingPlacement = RingPlacement {
    axis: Vec3::new(-0.5, 1.0, 0.0),
    translation: Vec3::new(0.0, 0.0, 4.0),
    transparent: true,
};

pub const SOLID_RING: RingPlacement = RingPlacement {
    axis: Vec3::new(0.5, 0.4, 0.0),
    translation: Vec3::new(0.0, 0.0, -2.0),
    transparent: false,
};

/// Camera plus the policy for what a resize does to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub camera: Camera3D,
    pub reproject_on_resize: bool,
}

impl Projection {
    pub fn new(width: u32, height: u32, reproject_on_resize: bool) -> Self {
        Self {
            camera: Camera3D::new(width, height),
            reproject_on_resize,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.camera.view_proj()
    }

    /// New view-projection for a resized drawable, or `None` when the
    /// projection stays fixed (reprojection disabled or a zero-sized window).
    pub fn on_resize(&mut self, width: u32, height: u32) -> Option<Mat4> {
        if !self.reproject_on_resize || width == 0 || height == 0 {
            return None;
        }
        self.camera.set_viewport(width, height);
        Some(self.camera.view_proj())
    }
}

pub struct SampleScene {
    pub scene: SceneId,
    pub projection: Projection,
    /// (alpha, solid)
    pub rings: (Ring, Ring),
}

impl SampleScene {
    pub fn build(renderer: &mut Renderer, config: &SampleConfig, width: u32, height: u32) -> Self {
        let projection = Projection::new(width, height, config.reproject_on_resize);
        let scene = renderer.new_scene(SceneCreateInfo {
            flags: SceneFlags::default(),
            clear_color: CLEAR_COLOR,
            view_proj: projection.view_proj(),
            viewport: Viewport::from_size(width, height),
        });

        let alpha_texture = renderer.texture_from_path(&config.alpha_texture);
        let alpha = build_ring(renderer, scene, alpha_texture, &ALPHA_RING);
        let solid_texture = renderer.texture_from_path(&config.solid_texture);
        let solid = build_ring(renderer, scene, solid_texture, &SOLID_RING);

        log::info!(
            "Scene ready: {} meshes ({} transparent)",
            renderer.scene(scene).meshes().len(),
            alpha.len()
        );

        Self {
            scene,
            projection,
            rings: (alpha, solid),
        }
    }

    /// Applies a drawable resize to the scene camera, if the projection follows it.
    pub fn resize(&mut self, renderer: &mut Renderer, width: u32, height: u32) {
        if let Some(view_proj) = self.projection.on_resize(width, height) {
            renderer.scene_mut(self.scene).set_view_proj(view_proj);
        }
    }
}

fn build_ring(
    renderer: &mut Renderer,
    scene: SceneId,
    texture: TextureId,
    placement: &RingPlacement,
) -> Ring {
    let handles: [MeshHandle; RING_SIZE] = std::array::from_fn(|_| {
        let mesh = renderer.new_mesh(MeshCreateInfo {
            texture,
            transparent: placement.transparent,
            model: Mat4::IDENTITY,
        });
        renderer.scene_mut(scene).insert(mesh)
    });
    MeshRing::new(handles, placement.axis, placement.translation, placement.transparent)
}
