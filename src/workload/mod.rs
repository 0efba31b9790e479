//! Simulated workload backend state
//!
//! - **Controller**: the single-session store behind `GET /status` and `POST /command`
//! - **Launcher**: how a session's CPU-bound workload is started and stopped

pub mod controller;
pub mod launcher;

pub use controller::{SessionInfo, WorkloadController, WorkloadSession};
pub use launcher::{
    launcher_from_config, NicenessPolicy, ProcessLauncher, StressorLauncher, WorkloadHandle,
    WorkloadLauncher,
};
