pub mod animation;
pub mod lifecycle;
pub mod scene;
pub mod time;

pub use animation::{Animate, MeshRing};
pub use lifecycle::{Lifecycle, LoopState, PlatformEvent};
pub use scene::{SceneTarget, Viewport};
pub use time::FrameClock;
