//! Frame clock: the per-presentation-opportunity driver
//!
//! The host (the egui update loop, or a test) calls [`FrameClock::tick`] once
//! per presentation opportunity. Each tick samples elapsed time, runs
//! renderer → contention simulator, hands back what to present, and re-arms
//! through a [`FrameSignal`] unless the clock has been cancelled.
//!
//! A new `RenderState` never mutates a running pipeline: [`FrameClock::start`]
//! tears the old pipeline down and builds a fresh one. The frame counter `n`
//! belongs to the clock and keeps increasing across restarts, so a switch
//! into contention lands wherever the stall window currently is.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::contention::{ContentionSimulator, ContentionWindow, FrameDecision};
use super::fractal::{FractalRenderer, FrameBuffer};
use crate::error::RenderError;
use crate::models::RenderState;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time since construction
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    micros: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: f64) {
        self.micros
            .fetch_add((ms * 1000.0).round() as u64, Ordering::SeqCst);
    }

    pub fn set_ms(&self, ms: f64) {
        self.micros.store((ms * 1000.0).round() as u64, Ordering::SeqCst);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> f64 {
        self.micros.load(Ordering::SeqCst) as f64 / 1000.0
    }
}

/// Re-arm hook: asks the host for another presentation opportunity
pub trait FrameSignal {
    fn request_next_frame(&self);
}

/// Per-start settings of the pipeline
#[derive(Clone, Copy, Debug)]
pub struct PipelineSettings {
    pub window: ContentionWindow,
    pub noise_probability: f64,
    /// Fixed noise seed; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            window: ContentionWindow::default(),
            noise_probability: super::contention::DEFAULT_NOISE_PROBABILITY,
            seed: None,
        }
    }
}

/// What a tick produced
#[derive(Debug)]
pub struct FrameReport<'a> {
    /// Frame counter `n` used for the decision
    pub frame_index: u64,
    /// Clock time sampled at the start of the tick
    pub elapsed_ms: f64,
    pub decision: FrameDecision,
    /// Set while the visible frame is frozen
    pub lag: bool,
    /// Buffer to present; for a stall this is the retained previous frame,
    /// or `None` when nothing has been computed yet
    pub frame: Option<&'a FrameBuffer>,
    /// Pipeline generation that produced the frame
    pub generation: u64,
}

impl FrameReport<'_> {
    /// True when the presented buffer was computed on this tick
    pub fn is_new_frame(&self) -> bool {
        !self.decision.is_stalled()
    }
}

/// Everything owned by one start of the clock
struct FramePipeline {
    state: RenderState,
    simulator: ContentionSimulator<StdRng>,
    previous: Option<FrameBuffer>,
}

/// Cancellable, restartable frame driver
pub struct FrameClock<C: Clock> {
    clock: C,
    renderer: FractalRenderer,
    settings: PipelineSettings,
    pipeline: Option<FramePipeline>,
    generation: u64,
    /// Monotonic frame counter `n`, never reset by `start`
    frame_index: u64,
}

impl<C: Clock> FrameClock<C> {
    /// Construction fails without a drawable surface
    pub fn new(clock: C, width: usize, height: usize) -> Result<Self, RenderError> {
        Self::with_settings(clock, width, height, PipelineSettings::default())
    }

    pub fn with_settings(
        clock: C,
        width: usize,
        height: usize,
        settings: PipelineSettings,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            clock,
            renderer: FractalRenderer::new(width, height)?,
            settings,
            pipeline: None,
            generation: 0,
            frame_index: 0,
        })
    }

    /// Tear down any running pipeline and start a fresh one for `state`
    pub fn start(&mut self, state: RenderState) {
        if self.pipeline.take().is_some() {
            log::debug!("[FrameClock] Tearing down generation {}", self.generation);
        }
        self.generation = self.generation.wrapping_add(1);
        let rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.pipeline = Some(FramePipeline {
            state,
            simulator: ContentionSimulator::with_settings(
                rng,
                self.settings.window,
                self.settings.noise_probability,
            ),
            previous: None,
        });
        log::debug!(
            "[FrameClock] Started generation {} at frame {} (stress={}, bias={:?})",
            self.generation,
            self.frame_index,
            state.stress_active,
            state.bias_mode
        );
    }

    /// Stop immediately; no further tick produces a frame or re-arms
    pub fn cancel(&mut self) {
        if self.pipeline.take().is_some() {
            log::debug!("[FrameClock] Cancelled generation {}", self.generation);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Counter value the next tick will use
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// State the running pipeline was started with
    pub fn state(&self) -> Option<RenderState> {
        self.pipeline.as_ref().map(|p| p.state)
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn renderer(&self) -> &FractalRenderer {
        &self.renderer
    }

    /// Run one frame. Returns `None` (and does not re-arm) once cancelled.
    pub fn tick(&mut self, signal: &dyn FrameSignal) -> Option<FrameReport<'_>> {
        let elapsed_ms = self.clock.now_ms();
        let generation = self.generation;
        let frame_index = self.frame_index;
        let renderer = &self.renderer;
        let pipeline = self.pipeline.as_mut()?;

        let decision = pipeline.simulator.decide(frame_index, &pipeline.state);
        match decision {
            FrameDecision::Stalled => {}
            FrameDecision::Fresh => {
                pipeline.previous = Some(renderer.render(elapsed_ms));
            }
            FrameDecision::Degraded => {
                let mut frame = renderer.render(elapsed_ms);
                pipeline.simulator.degrade(&mut frame);
                pipeline.previous = Some(frame);
            }
        }
        self.frame_index = frame_index.wrapping_add(1);

        signal.request_next_frame();

        Some(FrameReport {
            frame_index,
            elapsed_ms,
            decision,
            lag: decision.is_stalled(),
            frame: pipeline.previous.as_ref(),
            generation,
        })
    }
}
