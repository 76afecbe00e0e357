//! Application lifecycle state machine.
//!
//! The loop is `Running` until a quit signal arrives, then `Exiting` for good.
//! Each frame while running:
//!
//!   1. `dispatch()` every pending platform event (quit / resize / ignored)
//!   2. `frame()` advances the clock, accumulates rotation and animates the rings
//!   3. the caller draws and presents if `frame()` reported a frame
//!
//! Clock and rotation live here rather than in globals; they are created with
//! the lifecycle and dropped with it.

use crate::animation::Animate;
use crate::scene::{SceneTarget, Viewport};
use crate::time::FrameClock;

/// Frames between debug frame-time reports.
const STATS_INTERVAL_FRAMES: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Exiting,
}

/// Platform events the lifecycle reacts to. Anything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Quit,
    Resized { width: u32, height: u32 },
    Other,
}

pub struct Lifecycle {
    state: LoopState,
    viewport: Viewport,
    clock: FrameClock,
    rotation: f32,
}

impl Lifecycle {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_clock(width, height, FrameClock::new())
    }

    pub fn with_clock(width: u32, height: u32, clock: FrameClock) -> Self {
        Self {
            state: LoopState::Running,
            viewport: Viewport::from_size(width, height),
            clock,
            rotation: 0.0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn size(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Frames produced so far.
    pub fn frames(&self) -> u64 {
        self.clock.frame_count
    }

    /// Handles one platform event. Returns the new viewport on resize so the
    /// caller can resize whatever else tracks the drawable.
    pub fn dispatch<T: SceneTarget>(
        &mut self,
        event: PlatformEvent,
        target: &mut T,
    ) -> Option<Viewport> {
        match event {
            PlatformEvent::Quit => {
                if self.state == LoopState::Running {
                    log::info!("Quit requested after {} frames", self.frames());
                }
                self.state = LoopState::Exiting;
                None
            }
            PlatformEvent::Resized { width, height } => {
                self.viewport = Viewport::from_size(width, height);
                target.set_viewport(self.viewport);
                log::info!("Resized to ({}, {})", width, height);
                Some(self.viewport)
            }
            PlatformEvent::Other => None,
        }
    }

    /// Runs one frame against the current tick count.
    pub fn frame_now<T, A>(&mut self, rings: &A, target: &mut T) -> bool
    where
        T: SceneTarget,
        A: Animate<T>,
    {
        let now = self.clock.ticks_ms();
        self.frame(now, rings, target)
    }

    /// Advances time to `now_ms` and rewrites every ring's transforms.
    ///
    /// Returns `false` without touching anything once the loop is exiting; the
    /// caller must not draw in that case.
    pub fn frame<T, A>(&mut self, now_ms: u64, rings: &A, target: &mut T) -> bool
    where
        T: SceneTarget,
        A: Animate<T>,
    {
        if self.state == LoopState::Exiting {
            return false;
        }

        let elapsed = self.clock.tick_at(now_ms);
        self.rotation += elapsed;
        rings.animate(self.rotation, target);

        let frames = self.frames();
        if frames % STATS_INTERVAL_FRAMES == 0 {
            log::debug!(
                "frame {}: {:.2} ms avg ({:.1} fps), rotation {:.3}",
                frames,
                self.clock.smoothed_frame_time_ms,
                self.clock.smoothed_fps(),
                self.rotation
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MeshRing;
    use glam::{Mat4, Vec3};

    #[derive(Default)]
    struct Recorder {
        viewports: Vec<Viewport>,
        models: Vec<(u32, Mat4)>,
    }

    impl SceneTarget for Recorder {
        type Handle = u32;

        fn set_viewport(&mut self, viewport: Viewport) {
            self.viewports.push(viewport);
        }

        fn set_model_transform(&mut self, handle: u32, model: Mat4) {
            self.models.push((handle, model));
        }
    }

    fn rings() -> (MeshRing<u32, 8>, MeshRing<u32, 8>) {
        (
            MeshRing::new(
                [0, 1, 2, 3, 4, 5, 6, 7],
                Vec3::new(-0.5, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 4.0),
                true,
            ),
            MeshRing::new(
                [8, 9, 10, 11, 12, 13, 14, 15],
                Vec3::new(0.5, 0.4, 0.0),
                Vec3::new(0.0, 0.0, -2.0),
                false,
            ),
        )
    }

    #[test]
    fn starts_running_with_initial_size() {
        let lifecycle = Lifecycle::new(800, 800);
        assert_eq!(lifecycle.state(), LoopState::Running);
        assert_eq!(lifecycle.size(), (800, 800));
        assert_eq!(lifecycle.rotation(), 0.0);
        assert_eq!(lifecycle.frames(), 0);
    }

    #[test]
    fn resize_stores_size_and_sets_viewport_once() {
        let mut lifecycle = Lifecycle::new(800, 800);
        let mut target = Recorder::default();

        let outcome = lifecycle.dispatch(
            PlatformEvent::Resized {
                width: 1024,
                height: 600,
            },
            &mut target,
        );

        assert_eq!(lifecycle.size(), (1024, 600));
        assert_eq!(target.viewports, vec![Viewport::from_size(1024, 600)]);
        assert_eq!(outcome, Some(Viewport::from_size(1024, 600)));
        assert!(lifecycle.is_running());
    }

    #[test]
    fn other_events_are_ignored() {
        let mut lifecycle = Lifecycle::new(640, 480);
        let mut target = Recorder::default();
        assert_eq!(lifecycle.dispatch(PlatformEvent::Other, &mut target), None);
        assert!(target.viewports.is_empty());
        assert!(lifecycle.is_running());
        assert_eq!(lifecycle.size(), (640, 480));
    }

    #[test]
    fn quit_is_terminal_and_stops_frames() {
        let mut lifecycle = Lifecycle::with_clock(800, 800, FrameClock::starting_at(0));
        let mut target = Recorder::default();
        let rings = rings();

        assert!(lifecycle.frame(16, &rings, &mut target));
        lifecycle.dispatch(PlatformEvent::Quit, &mut target);
        assert_eq!(lifecycle.state(), LoopState::Exiting);

        let models_before = target.models.len();
        let rotation_before = lifecycle.rotation();
        assert!(!lifecycle.frame(33, &rings, &mut target));
        assert!(!lifecycle.frame(50, &rings, &mut target));
        assert_eq!(target.models.len(), models_before);
        assert_eq!(lifecycle.rotation(), rotation_before);
        assert_eq!(lifecycle.frames(), 1);

        lifecycle.dispatch(PlatformEvent::Other, &mut target);
        lifecycle.dispatch(PlatformEvent::Quit, &mut target);
        assert_eq!(lifecycle.state(), LoopState::Exiting);
    }

    #[test]
    fn two_ticks_accumulate_rotation() {
        let mut lifecycle = Lifecycle::with_clock(800, 800, FrameClock::starting_at(0));
        let mut target = Recorder::default();
        let rings = rings();

        lifecycle.frame(16, &rings, &mut target);
        assert!((lifecycle.clock().elapsed() - 0.016).abs() < 1e-6);
        lifecycle.frame(33, &rings, &mut target);
        assert!((lifecycle.clock().elapsed() - 0.017).abs() < 1e-6);
        assert!((lifecycle.rotation() - 0.033).abs() < 1e-6);
        assert_eq!(lifecycle.frames(), 2);
    }

    #[test]
    fn frame_updates_all_sixteen_meshes_with_current_rotation() {
        let mut lifecycle = Lifecycle::with_clock(800, 800, FrameClock::starting_at(0));
        let mut target = Recorder::default();
        let rings = rings();

        lifecycle.frame(500, &rings, &mut target);
        assert_eq!(target.models.len(), 16);

        let rotation = lifecycle.rotation();
        let (alpha, solid) = &rings;
        let (_, alpha3) = target.models[3];
        assert!(alpha3.abs_diff_eq(alpha.model(3, rotation), 1e-6));
        let (handle, solid0) = target.models[8];
        assert_eq!(handle, 8);
        assert!(solid0.abs_diff_eq(solid.model(0, rotation), 1e-6));
    }

    #[test]
    fn rotation_is_non_decreasing() {
        let mut lifecycle = Lifecycle::with_clock(800, 800, FrameClock::starting_at(0));
        let mut target = Recorder::default();
        let rings = rings();

        let mut last = lifecycle.rotation();
        for now in [3, 3, 20, 19, 45, 1000, 1001] {
            lifecycle.frame(now, &rings, &mut target);
            assert!(lifecycle.rotation() >= last);
            last = lifecycle.rotation();
        }
        assert!((last - 1.001).abs() < 1e-5);
    }

    #[test]
    fn resize_after_quit_still_tracks_drawable() {
        let mut lifecycle = Lifecycle::new(800, 800);
        let mut target = Recorder::default();
        lifecycle.dispatch(PlatformEvent::Quit, &mut target);
        lifecycle.dispatch(
            PlatformEvent::Resized {
                width: 300,
                height: 200,
            },
            &mut target,
        );
        assert_eq!(lifecycle.size(), (300, 200));
        assert_eq!(lifecycle.state(), LoopState::Exiting);
    }
}
