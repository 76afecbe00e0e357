//! Renderer: owns the GPU context, shared quad geometry, textures and scenes.
//!
//! Usage mirrors the bootstrap order of the sample: create textures, create a
//! scene, build meshes and insert them, then call `draw_all_scenes()` once per
//! frame. Scenes draw in creation order into the same frame; each pass clears
//! or loads according to its scene's flags.

use std::path::Path;
use std::sync::Arc;

use winit::window::Window;

use crate::gpu_context::{GpuContext, GpuInitError};
use crate::mesh_pipeline::MeshPipeline;
use crate::quad::QuadGeometry;
use crate::scene::{clamp_viewport, Mesh, MeshCreateInfo, Scene3D, SceneCreateInfo};
use crate::texture::{PixelBuffer, Texture, TextureOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(usize);

pub struct Renderer {
    gpu: GpuContext,
    pipeline: MeshPipeline,
    quad: QuadGeometry,
    // The bind group keeps the texture view and sampler alive.
    textures: Vec<wgpu::BindGroup>,
    scenes: Vec<Scene3D>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, present_mode: wgpu::PresentMode) -> Result<Self, GpuInitError> {
        let gpu = GpuContext::new(window, present_mode)?;
        let pipeline = MeshPipeline::new(&gpu.device, gpu.surface_format);
        let quad = QuadGeometry::new(&gpu.device);
        Ok(Self {
            gpu,
            pipeline,
            quad,
            textures: Vec::new(),
            scenes: Vec::new(),
        })
    }

    pub fn new_texture(
        &mut self,
        pixels: &PixelBuffer,
        options: TextureOptions,
        label: &str,
    ) -> TextureId {
        let texture = Texture::from_pixels(&self.gpu.device, &self.gpu.queue, pixels, options, label);
        let bind_group = self
            .pipeline
            .create_texture_bind_group(&self.gpu.device, &texture);
        self.textures.push(bind_group);
        TextureId(self.textures.len() - 1)
    }

    /// Loads an image with linear filtering and repeat wrapping. An unreadable
    /// image becomes an empty texture rather than an error.
    pub fn texture_from_path(&mut self, path: &Path) -> TextureId {
        let pixels = PixelBuffer::from_path_or_empty(path);
        let label = path.display().to_string();
        self.new_texture(&pixels, TextureOptions::default(), &label)
    }

    pub fn new_scene(&mut self, info: SceneCreateInfo) -> SceneId {
        let scene = Scene3D::new(&self.gpu.device, &self.pipeline, info);
        self.scenes.push(scene);
        SceneId(self.scenes.len() - 1)
    }

    pub fn scene(&self, id: SceneId) -> &Scene3D {
        &self.scenes[id.0]
    }

    pub fn scene_mut(&mut self, id: SceneId) -> &mut Scene3D {
        &mut self.scenes[id.0]
    }

    pub fn new_mesh(&self, info: MeshCreateInfo) -> Mesh {
        Mesh::new(&self.gpu.device, &self.pipeline, info)
    }

    /// Resizes the surface and depth buffer. Scene viewports are left alone.
    /// A zero-sized (minimized) window suspends drawing until the next resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn draw_all_scenes(&mut self) {
        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return;
        }
        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        for scene in &mut self.scenes {
            scene.upload(&self.gpu.queue);
        }

        let target_size = (self.gpu.config.width, self.gpu.config.height);
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        for scene in &self.scenes {
            let flags = scene.flags();
            let color_load = if flags.clear_color {
                wgpu::LoadOp::Clear(scene.clear_color())
            } else {
                wgpu::LoadOp::Load
            };
            let depth_load = if flags.clear_depth {
                wgpu::LoadOp::Clear(1.0)
            } else {
                wgpu::LoadOp::Load
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let Some([x, y, w, h]) = clamp_viewport(scene.viewport(), target_size) else {
                continue;
            };
            render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
            render_pass.set_bind_group(0, scene.camera_bind_group(), &[]);
            render_pass.set_vertex_buffer(0, self.quad.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.quad.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            // Opaque first so blended meshes composite over a finished depth buffer.
            render_pass.set_pipeline(self.pipeline.select(false, flags.depth_test));
            for mesh in scene.meshes().iter().filter(|m| !m.is_transparent()) {
                self.draw_mesh(&mut render_pass, mesh);
            }

            render_pass.set_pipeline(self.pipeline.select(true, flags.depth_test));
            for index in scene.transparent_draw_order() {
                self.draw_mesh(&mut render_pass, &scene.meshes()[index]);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn draw_mesh(&self, render_pass: &mut wgpu::RenderPass<'_>, mesh: &Mesh) {
        let Some(texture_bind_group) = self.textures.get(mesh.texture().0) else {
            return;
        };
        render_pass.set_bind_group(1, texture_bind_group, &[]);
        render_pass.set_bind_group(2, mesh.bind_group(), &[]);
        render_pass.draw_indexed(0..self.quad.index_count, 0, 0..1);
    }
}
