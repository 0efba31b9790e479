//! Realized frames-per-second observer
//!
//! Counts frame-clock invocations and reports once per elapsed second.
//! It only reads timestamps handed to it, so it can never delay a frame.

/// Length of one measurement window in milliseconds
pub const FPS_WINDOW_MS: f64 = 1000.0;

/// Counts ticks and reports `count · 1000 / elapsed` at each window boundary
#[derive(Clone, Debug)]
pub struct FpsMonitor {
    window_start_ms: f64,
    frames: u32,
    last_fps: Option<f64>,
}

impl FpsMonitor {
    /// Start the first window at `now_ms`
    pub fn new(now_ms: f64) -> Self {
        Self {
            window_start_ms: now_ms,
            frames: 0,
            last_fps: None,
        }
    }

    /// Record one tick at `now_ms`. Returns the new reading when this tick
    /// closes a window.
    pub fn record_tick(&mut self, now_ms: f64) -> Option<f64> {
        self.frames += 1;
        let elapsed = now_ms - self.window_start_ms;
        if elapsed < FPS_WINDOW_MS {
            return None;
        }
        let fps = f64::from(self.frames) * 1000.0 / elapsed;
        self.frames = 0;
        self.window_start_ms = now_ms;
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// Most recent reading, if a window has closed yet
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }

    /// Most recent reading rounded for display
    pub fn display_fps(&self) -> Option<u32> {
        self.last_fps.map(|fps| fps.round() as u32)
    }

    /// Ticks counted in the currently open window
    pub fn pending_frames(&self) -> u32 {
        self.frames
    }
}
