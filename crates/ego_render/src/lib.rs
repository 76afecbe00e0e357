pub mod camera;
pub mod gpu_context;
pub mod mesh_pipeline;
pub mod quad;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod vertex;

pub use camera::{Camera3D, CameraUniform};
pub use gpu_context::{GpuContext, GpuInitError};
pub use mesh_pipeline::MeshPipeline;
pub use quad::QuadGeometry;
pub use renderer::{Renderer, SceneId, TextureId};
pub use scene::{Mesh, MeshCreateInfo, MeshHandle, Scene3D, SceneCreateInfo, SceneFlags};
pub use texture::{texture_extent, PixelBuffer, Texture, TextureOptions};
pub use vertex::MeshVertex;
