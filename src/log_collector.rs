//! Decoupled logging pipeline for the dashboard binaries.
//!
//! # Architecture
//!
//! ```text
//! log::info!() / log::warn!() ...
//!     |
//! [LogCollector] (non-blocking, implements log::Log)
//!     | (crossbeam unbounded channel)
//!     v
//! [Persister thread] --> logs/<timestamp>_<component>.log   (every record)
//!                    --> stderr                              (records >= echo level)
//!                    --> optional UI tap     (records >= echo level, try_send, may drop)
//! ```
//!
//! Logging from the frame loop or a request handler never waits on disk.

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::LoggingConfig;

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker; the persister answers once everything before it is on disk
    Flush(tokio::sync::oneshot::Sender<()>),
}

/// A log line with metadata
#[derive(Clone, Debug)]
pub struct LogLine {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Wall-clock time the record was created (HH:MM:SS.mmm)
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        LogLine {
            level,
            target: target.into(),
            message: message.into(),
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    /// `[HH:MM:SS.mmm] [LEVEL] message`
    pub fn format(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Logger that forwards every record to a background persister thread
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    log_path: PathBuf,
    echo_level: LevelFilter,
}

impl LogCollector {
    /// Create the log file for `component` under `log_dir` and start the persister.
    ///
    /// `ui_tx` receives a copy of each line at or above `echo_level` for
    /// in-app display; lines are dropped if it is full.
    pub fn new(
        log_dir: &Path,
        component: &str,
        echo_level: LevelFilter,
        ui_tx: Option<tokio::sync::mpsc::Sender<LogLine>>,
    ) -> Result<Self, String> {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| format!("Failed to create logs directory: {}", e))?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("{}_{}.log", timestamp, component));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| format!("Failed to open log file {}: {}", log_path.display(), e))?;

        let (tx, rx) = unbounded::<LogMessage>();

        // OS thread rather than a tokio task: records arrive from the UI thread,
        // blocking workers and runtime threads alike
        std::thread::Builder::new()
            .name(format!("log-{}", component))
            .spawn(move || persist_loop(rx, file, echo_level, ui_tx))
            .map_err(|e| format!("Failed to spawn log persister: {}", e))?;

        Ok(LogCollector {
            tx,
            log_path,
            echo_level,
        })
    }

    /// Path of the file this collector appends to
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Queue a line (never blocks)
    pub fn log_line(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Wait until every line queued before this call has been written.
    pub async fn wait_for_empty(&self) -> Result<(), String> {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(LogMessage::Flush(done_tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        done_rx
            .await
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

/// Target prefixes of this package's library and binaries
const OWN_TARGETS: &[&str] = &["bore_", "sched_sim"];

/// Wires all log::info!(), log::warn!(), log::error!() calls into LogCollector
impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Dependency chatter (hyper, reqwest, winit...) is kept to info and above
        metadata.level() <= Level::Info
            || OWN_TARGETS.iter().any(|prefix| metadata.target().starts_with(prefix))
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_line(LogLine::new(
                record.level(),
                record.target(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {}
}

fn persist_loop(
    rx: crossbeam_channel::Receiver<LogMessage>,
    mut file: File,
    echo_level: LevelFilter,
    ui_tx: Option<tokio::sync::mpsc::Sender<LogLine>>,
) {
    while let Ok(msg) = rx.recv() {
        match msg {
            LogMessage::Line(line) => {
                let formatted = line.format();
                let _ = writeln!(file, "{}", formatted);
                if line.level > echo_level {
                    continue;
                }
                eprintln!("{}", formatted);
                if let Some(tx) = &ui_tx {
                    let _ = tx.try_send(line);
                }
            }
            LogMessage::Flush(done) => {
                let _ = file.flush();
                let _ = done.send(());
            }
        }
    }
}

/// Install a [`LogCollector`] as the global logger for `component`.
///
/// The file receives debug and above; stderr gets the configured level.
pub fn init_logging(
    component: &str,
    config: &LoggingConfig,
    ui_tx: Option<tokio::sync::mpsc::Sender<LogLine>>,
) -> Result<LogCollector, String> {
    let echo_level = config.level_filter();
    let collector = LogCollector::new(&config.log_dir, component, echo_level, ui_tx)?;

    log::set_boxed_logger(Box::new(collector.clone()))
        .map_err(|e| format!("Logger already installed: {}", e))?;
    log::set_max_level(echo_level.max(LevelFilter::Debug));

    log::info!(
        "[Log] {} logging to {}",
        component,
        collector.log_path().display()
    );
    Ok(collector)
}

impl std::fmt::Debug for LogCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogCollector")
            .field("log_path", &self.log_path)
            .field("echo_level", &self.echo_level)
            .finish()
    }
}
