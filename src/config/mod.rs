//! Configuration for the dashboard binaries.
//!
//! # Module Structure
//!
//! - `loader`: locating, reading and writing `settings.json`
//! - `validator`: range and format checks applied after loading
//!
//! # Configuration Flow
//!
//! 1. `loader::load_or_default` reads the file (or falls back to defaults)
//! 2. Binaries apply their CLI overrides on top
//! 3. `validator::validate_config` rejects unusable values before anything starts

pub mod loader;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loader::{get_global_settings_path, load_config_from_file, load_or_default, save_config_to_file};
pub use validator::validate_config;

/// Complete settings shared by the visualizer, backend and monitor
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub workload: WorkloadConfig,
    pub logging: LoggingConfig,
}

/// Backend listener settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
        }
    }
}

/// Visualizer and monitor settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend_url: String,
    pub poll_interval_ms: u64,
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub noise_probability: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:3001".to_string(),
            poll_interval_ms: 500,
            canvas_width: 400,
            canvas_height: 300,
            noise_probability: 0.15,
        }
    }
}

/// How the backend realizes a workload session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// External program to run under `nice`; the in-process stressor is used when unset
    pub executable: Option<PathBuf>,
    pub args: Vec<String>,
    pub normal_nice: i32,
    pub biased_nice: i32,
    /// 0 = one thread per logical CPU
    pub stressor_threads: usize,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            executable: None,
            args: Vec::new(),
            normal_nice: 19,
            biased_nice: -10,
            stressor_threads: 0,
        }
    }
}

/// Log file location and stderr verbosity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    /// One of error, warn, info, debug, trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parsed stderr level, `Info` if the string is unrecognized
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
