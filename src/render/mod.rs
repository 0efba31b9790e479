//! Frame-pacing fractal renderer
//!
//! ## Architecture
//! - **Fractal**: escape-time Julia image per frame
//! - **Contention**: fresh / stalled / degraded delivery per frame
//! - **Clock**: cancellable, restartable frame driver over a pluggable time source
//! - **Fps**: independent realized-FPS observer

pub mod clock;
pub mod contention;
pub mod fps;
pub mod fractal;

pub use clock::{Clock, FrameClock, FrameReport, FrameSignal, PipelineSettings, SystemClock, VirtualClock};
pub use contention::{decide_frame, ContentionSimulator, ContentionWindow, FrameDecision, NOISE_COLOR};
pub use fps::FpsMonitor;
pub use fractal::{iteration_color, FractalRenderer, FrameBuffer, MAX_ITERATIONS};
