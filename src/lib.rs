//! BORE Dashboard
//!
//! A frame-pacing visualizer that shows how a latency-biased scheduler keeps an
//! interactive task smooth while a CPU-bound workload runs, and how a fair
//! scheduler lets it stutter.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Render state and wire types shared by client and backend
//! - **config**: Settings file, validation and defaults
//! - **log_collector**: Non-blocking logging pipeline behind the `log` facade
//! - **render**: Fractal renderer, contention simulator, FrameClock and FPS monitor
//! - **workload**: WorkloadController and the launchers behind it
//! - **server**: axum backend exposing the status and command channels
//! - **sync**: Client side of those channels (polling, commands, reconciliation)
//! - **ui**: egui visualizer
//! - **monitor**: htop-style terminal view of the backend status
//! - **research**: Offline scheduler comparison

pub mod error;
pub mod models;

pub mod config;
pub mod log_collector;

pub mod render;
pub mod workload;

pub mod server;
pub mod sync;

pub mod monitor;
pub mod research;
pub mod ui;

// Re-export the log crate for macro usage
pub use log;

pub use error::{AppError, Result};
pub use log_collector::{init_logging, LogCollector, LogLine};
