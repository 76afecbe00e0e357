//! Millisecond frame clock.
//!
//! Timestamps are integer milliseconds since the clock was created, the same
//! resolution a platform tick counter reports. `elapsed` is the duration of the
//! most recent frame in seconds, derived as `(now - then) * 0.001`.

use std::time::Instant;

const FRAME_SAMPLE_COUNT: usize = 60;

pub struct FrameClock {
    start: Instant,
    now: u64,
    then: u64,
    elapsed: f32,
    pub frame_count: u64,

    frame_samples: [f32; FRAME_SAMPLE_COUNT],
    frame_sample_index: usize,
    pub smoothed_frame_time_ms: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Clock whose first frame is measured from `then_ms`.
    pub fn starting_at(then_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            now: then_ms,
            then: then_ms,
            elapsed: 0.0,
            frame_count: 0,
            frame_samples: [1000.0 / 60.0; FRAME_SAMPLE_COUNT],
            frame_sample_index: 0,
            smoothed_frame_time_ms: 1000.0 / 60.0,
        }
    }

    /// Monotonic milliseconds since the clock was created.
    pub fn ticks_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Advances the clock to the current tick count.
    pub fn tick(&mut self) -> f32 {
        let now = self.ticks_ms();
        self.tick_at(now)
    }

    /// Advances the clock to `now_ms` and returns the elapsed seconds.
    ///
    /// A timestamp older than the previous one is clamped so `elapsed` never
    /// goes negative.
    pub fn tick_at(&mut self, now_ms: u64) -> f32 {
        self.now = now_ms.max(self.then);
        self.elapsed = (self.now - self.then) as f32 * 0.001;
        self.then = self.now;
        self.frame_count += 1;

        self.frame_samples[self.frame_sample_index] = self.elapsed * 1000.0;
        self.frame_sample_index = (self.frame_sample_index + 1) % FRAME_SAMPLE_COUNT;
        self.smoothed_frame_time_ms =
            self.frame_samples.iter().sum::<f32>() / FRAME_SAMPLE_COUNT as f32;

        self.elapsed
    }

    pub fn now_ms(&self) -> u64 {
        self.now
    }

    pub fn then_ms(&self) -> u64 {
        self.then
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn smoothed_fps(&self) -> f32 {
        if self.smoothed_frame_time_ms > 0.0 {
            1000.0 / self.smoothed_frame_time_ms
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
