//! Fair-share contention simulation
//!
//! Decides per frame whether the visualizer shows a fresh frame, keeps the
//! previous one (a stall), or shows a fresh frame sprinkled with noise.
//! The stall decision is a pure function of the frame index and the
//! `RenderState`; only the per-pixel noise is random.

use rand::Rng;

use super::fractal::FrameBuffer;
use crate::models::{BiasMode, RenderState};

/// Highlight color used for noise pixels
pub const NOISE_COLOR: [u8; 4] = [255, 0, 255, 255];

/// Default per-pixel noise probability on non-stalled contended frames
pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.15;

/// Frame-counter window defining the stall duty cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentionWindow {
    /// Window period in frames
    pub period: u64,
    /// Frames `[0, stall_frames)` of every period are stalled
    pub stall_frames: u64,
}

impl Default for ContentionWindow {
    fn default() -> Self {
        ContentionWindow {
            period: 30,
            stall_frames: 12,
        }
    }
}

impl ContentionWindow {
    /// A zero period is treated as one frame
    pub fn in_stall_window(&self, frame_index: u64) -> bool {
        frame_index % self.period.max(1) < self.stall_frames
    }

    /// Fraction of frames stalled under contention (12/30 by default)
    pub fn duty_cycle(&self) -> f64 {
        let period = self.period.max(1);
        self.stall_frames.min(period) as f64 / period as f64
    }
}

/// How a frame is delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDecision {
    /// Compute and present a clean frame
    Fresh,
    /// Keep the previous buffer; the lag signal is raised
    Stalled,
    /// Compute a frame and inject noise
    Degraded,
}

impl FrameDecision {
    pub fn is_stalled(&self) -> bool {
        matches!(self, FrameDecision::Stalled)
    }
}

/// Gates renderer output per frame according to the simulated regime.
pub struct ContentionSimulator<R: Rng> {
    window: ContentionWindow,
    noise_probability: f64,
    rng: R,
}

impl<R: Rng> ContentionSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self::with_settings(rng, ContentionWindow::default(), DEFAULT_NOISE_PROBABILITY)
    }

    /// `noise_probability` is clamped to `[0, 1]`; NaN disables noise
    pub fn with_settings(rng: R, window: ContentionWindow, noise_probability: f64) -> Self {
        let noise_probability = if noise_probability.is_nan() {
            0.0
        } else {
            noise_probability.clamp(0.0, 1.0)
        };
        Self {
            window,
            noise_probability,
            rng,
        }
    }

    pub fn window(&self) -> ContentionWindow {
        self.window
    }

    pub fn noise_probability(&self) -> f64 {
        self.noise_probability
    }

    /// Evaluate the delivery rule for frame `frame_index`
    pub fn decide(&self, frame_index: u64, state: &RenderState) -> FrameDecision {
        decide_frame(&self.window, frame_index, state)
    }

    /// Override each pixel with [`NOISE_COLOR`] with independent probability.
    /// Returns the number of pixels overridden.
    pub fn degrade(&mut self, frame: &mut FrameBuffer) -> usize {
        let mut hits = 0;
        for px in frame.pixels_mut() {
            if self.rng.gen_bool(self.noise_probability) {
                px.copy_from_slice(&NOISE_COLOR);
                hits += 1;
            }
        }
        hits
    }
}

/// Delivery rule, evaluated in order:
/// latency-biased → fresh; no stress → fresh; otherwise stall inside the
/// window and degrade outside it.
pub fn decide_frame(window: &ContentionWindow, frame_index: u64, state: &RenderState) -> FrameDecision {
    if state.bias_mode == BiasMode::LatencyBiased {
        return FrameDecision::Fresh;
    }
    if !state.stress_active {
        return FrameDecision::Fresh;
    }
    if window.in_stall_window(frame_index) {
        FrameDecision::Stalled
    } else {
        FrameDecision::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn contended() -> RenderState {
        RenderState::new(true, BiasMode::Fair)
    }

    #[test]
    fn test_duty_cycle_is_twelve_of_thirty() {
        let window = ContentionWindow::default();
        let stalled = (0..30).filter(|n| window.in_stall_window(*n)).count();
        assert_eq!(stalled, 12);
        assert!((window.duty_cycle() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decision_order() {
        let sim = ContentionSimulator::new(StdRng::seed_from_u64(1));
        assert_eq!(sim.decide(0, &contended()), FrameDecision::Stalled);
        assert_eq!(sim.decide(11, &contended()), FrameDecision::Stalled);
        assert_eq!(sim.decide(12, &contended()), FrameDecision::Degraded);
        assert_eq!(sim.decide(29, &contended()), FrameDecision::Degraded);
        assert_eq!(sim.decide(30, &contended()), FrameDecision::Stalled);

        let biased = RenderState::new(true, BiasMode::LatencyBiased);
        assert_eq!(sim.decide(0, &biased), FrameDecision::Fresh);

        let idle = RenderState::new(false, BiasMode::Fair);
        assert_eq!(sim.decide(0, &idle), FrameDecision::Fresh);
    }

    #[test]
    fn test_degrade_rate_near_probability() {
        let mut sim = ContentionSimulator::new(StdRng::seed_from_u64(42));
        let mut frame = FrameBuffer::new(200, 100);
        let hits = sim.degrade(&mut frame);
        let rate = hits as f64 / frame.pixel_count() as f64;
        assert!((rate - 0.15).abs() < 0.02, "noise rate {} too far from 0.15", rate);
        let magenta = frame.pixels().filter(|px| *px == NOISE_COLOR).count();
        assert_eq!(magenta, hits);
    }

    #[test]
    fn test_degenerate_settings_do_not_panic() {
        let window = ContentionWindow {
            period: 0,
            stall_frames: 12,
        };
        assert!(window.in_stall_window(0));
        assert!(window.in_stall_window(7));
        assert!((window.duty_cycle() - 1.0).abs() < f64::EPSILON);

        let mut sim = ContentionSimulator::with_settings(StdRng::seed_from_u64(5), window, f64::NAN);
        assert_eq!(sim.noise_probability(), 0.0);
        assert_eq!(sim.decide(3, &contended()), FrameDecision::Stalled);
        let mut frame = FrameBuffer::new(8, 8);
        assert_eq!(sim.degrade(&mut frame), 0);

        let loud = ContentionSimulator::with_settings(StdRng::seed_from_u64(5), window, 7.5);
        assert_eq!(loud.noise_probability(), 1.0);
        let quiet = ContentionSimulator::with_settings(StdRng::seed_from_u64(5), window, -1.0);
        assert_eq!(quiet.noise_probability(), 0.0);
    }

    #[test]
    fn test_zero_probability_leaves_frame_untouched() {
        let mut sim = ContentionSimulator::with_settings(
            StdRng::seed_from_u64(7),
            ContentionWindow::default(),
            0.0,
        );
        let mut frame = FrameBuffer::new(10, 10);
        let before = frame.clone();
        assert_eq!(sim.degrade(&mut frame), 0);
        assert_eq!(frame, before);
    }
}
