use glam::Mat4;

/// Pixel rectangle a scene renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Rectangle anchored at the origin covering a `width` x `height` drawable.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Width over height; a degenerate (zero height) viewport reports 1.0.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The slice of a scene the per-frame logic is allowed to touch.
///
/// Handles are non-owning: the scene keeps the mesh resources alive and the
/// caller only holds indices into it.
pub trait SceneTarget {
    type Handle: Copy;

    fn set_viewport(&mut self, viewport: Viewport);

    fn set_model_transform(&mut self, handle: Self::Handle, model: Mat4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_size_is_anchored_at_origin() {
        let vp = Viewport::from_size(1024, 768);
        assert_eq!((vp.x, vp.y, vp.width, vp.height), (0, 0, 1024, 768));
    }

    #[test]
    fn aspect_ratio_handles_zero_height() {
        assert_eq!(Viewport::from_size(800, 0).aspect_ratio(), 1.0);
        assert!((Viewport::from_size(1600, 800).aspect_ratio() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_when_any_side_is_zero() {
        assert!(Viewport::from_size(0, 10).is_empty());
        assert!(Viewport::from_size(10, 0).is_empty());
        assert!(!Viewport::from_size(1, 1).is_empty());
    }
}
