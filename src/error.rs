//! Unified error type hierarchy for the BORE dashboard
//!
//! Provides structured error handling with ConfigError, RenderError,
//! WorkloadError, TransportError, and the umbrella AppError.

use std::io;
use thiserror::Error;

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Renderer construction errors.
///
/// A missing drawing surface is a construction-time failure; frames
/// themselves never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid drawing surface: {width}x{height}")]
    InvalidSurface { width: usize, height: usize },
}

/// Workload session lifecycle errors.
#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("Failed to launch workload '{program}': {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("Failed to stop workload: {0}")]
    StopFailed(String),
}

/// Client-side transport errors for the status and command channels.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {0}")]
    BadStatus(u16),

    #[error("Backend rejected command: {0}")]
    Rejected(String),
}

/// Global error type for all dashboard modules
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Workload(#[from] WorkloadError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// File I/O error (read/write/delete)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Get a user-facing error message suitable for UI display
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => format!("Settings error: {}", e),
            AppError::Render(e) => format!("Cannot start renderer: {}", e),
            AppError::Workload(e) => format!("Workload error: {}", e),
            AppError::Transport(_) => "Backend offline".to_string(),
            AppError::Io(e) => format!("File operation failed: {}", e),
        }
    }
}

/// Top-level result type for operations that may fail.
pub type Result<T> = std::result::Result<T, AppError>;
