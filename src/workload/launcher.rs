//! Workload launchers
//!
//! The controller only needs two capabilities from a workload: start it with a
//! mode hint, and stop it forcibly. Two launchers are provided:
//! - **ProcessLauncher**: runs an external executable under `nice -n <N>`
//! - **StressorLauncher**: in-process CPU burner threads that renice themselves

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::WorkloadConfig;
use crate::error::WorkloadError;
use crate::models::WorkloadMode;

/// A running workload that can be stopped
pub trait WorkloadHandle: Send {
    /// Forcibly stop the workload and release its resources
    fn stop(&mut self) -> Result<(), WorkloadError>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

/// Starts workloads with a mode hint
pub trait WorkloadLauncher: Send + Sync {
    fn launch(&self, mode: WorkloadMode) -> Result<Box<dyn WorkloadHandle>, WorkloadError>;
}

/// Niceness hint applied per mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NicenessPolicy {
    pub normal: i32,
    pub latency_biased: i32,
}

impl Default for NicenessPolicy {
    fn default() -> Self {
        NicenessPolicy {
            normal: 19,
            latency_biased: -10,
        }
    }
}

impl NicenessPolicy {
    pub fn for_mode(&self, mode: WorkloadMode) -> i32 {
        match mode {
            WorkloadMode::Normal => self.normal,
            WorkloadMode::LatencyBiased => self.latency_biased,
        }
    }
}

/// Build the launcher described by the workload config
pub fn launcher_from_config(config: &WorkloadConfig) -> Arc<dyn WorkloadLauncher> {
    let niceness = NicenessPolicy {
        normal: config.normal_nice,
        latency_biased: config.biased_nice,
    };
    match &config.executable {
        Some(program) => {
            log::info!("[Workload] Using external workload: {}", program.display());
            Arc::new(ProcessLauncher::new(program.clone(), config.args.clone(), niceness))
        }
        None => {
            let threads = if config.stressor_threads == 0 {
                num_cpus::get()
            } else {
                config.stressor_threads
            };
            log::info!("[Workload] Using in-process stressor ({} threads)", threads);
            Arc::new(StressorLauncher::new(threads, niceness))
        }
    }
}

// ============================================================================
// EXTERNAL PROCESS
// ============================================================================

/// Runs `nice -n <N> <program> <args...>`
pub struct ProcessLauncher {
    program: PathBuf,
    args: Vec<String>,
    niceness: NicenessPolicy,
}

impl ProcessLauncher {
    pub fn new(program: PathBuf, args: Vec<String>, niceness: NicenessPolicy) -> Self {
        Self {
            program,
            args,
            niceness,
        }
    }

    /// The command line that would be executed for `mode`
    pub fn command_line(&self, mode: WorkloadMode) -> Vec<String> {
        let mut line = vec![
            "nice".to_string(),
            "-n".to_string(),
            self.niceness.for_mode(mode).to_string(),
            self.program.to_string_lossy().to_string(),
        ];
        line.extend(self.args.iter().cloned());
        line
    }
}

impl WorkloadLauncher for ProcessLauncher {
    fn launch(&self, mode: WorkloadMode) -> Result<Box<dyn WorkloadHandle>, WorkloadError> {
        let line = self.command_line(mode);
        log::info!("[Workload] Executing: {}", line.join(" "));

        // Output is not interpreted; keep it off the dashboard's terminal
        let child = Command::new(&line[0])
            .args(&line[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| WorkloadError::LaunchFailed {
                program: self.program.display().to_string(),
                reason: e.to_string(),
            })?;

        let label = format!("pid {} ({})", child.id(), mode);
        Ok(Box::new(ProcessHandle {
            child: Some(child),
            label,
        }))
    }
}

struct ProcessHandle {
    child: Option<Child>,
    label: String,
}

impl WorkloadHandle for ProcessHandle {
    fn stop(&mut self) -> Result<(), WorkloadError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        // Already exited is fine; kill only reports errors for live processes we cannot signal
        if let Ok(Some(status)) = child.try_wait() {
            log::debug!("[Workload] {} already exited: {}", self.label, status);
            return Ok(());
        }
        child
            .kill()
            .map_err(|e| WorkloadError::StopFailed(format!("{}: {}", self.label, e)))?;
        let _ = child.wait();
        log::info!("[Workload] Stopped {}", self.label);
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if self.child.is_some() {
            if let Err(e) = self.stop() {
                log::warn!("[Workload] Drop cleanup failed: {}", e);
            }
        }
    }
}

// ============================================================================
// IN-PROCESS STRESSOR
// ============================================================================

/// Spawns CPU-bound worker threads that apply the mode's niceness to themselves
pub struct StressorLauncher {
    threads: usize,
    niceness: NicenessPolicy,
}

impl StressorLauncher {
    pub fn new(threads: usize, niceness: NicenessPolicy) -> Self {
        Self {
            threads: threads.max(1),
            niceness,
        }
    }
}

impl WorkloadLauncher for StressorLauncher {
    fn launch(&self, mode: WorkloadMode) -> Result<Box<dyn WorkloadHandle>, WorkloadError> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let iteration_count = Arc::new(AtomicUsize::new(0));
        let nice = self.niceness.for_mode(mode);
        let mut workers = Vec::with_capacity(self.threads);

        for worker_id in 0..self.threads {
            let worker_stop = Arc::clone(&stop_flag);
            let worker_count = Arc::clone(&iteration_count);
            let spawned = thread::Builder::new()
                .name(format!("stressor-{}", worker_id))
                .spawn(move || {
                    apply_thread_niceness(nice);
                    cpu_stressor_routine(&worker_stop, &worker_count);
                });
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    // Do not leave a partial workload behind
                    stop_flag.store(true, Ordering::Release);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(WorkloadError::LaunchFailed {
                        program: "stressor".to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "[Workload] Started {} stressor threads (mode={}, nice={})",
            self.threads,
            mode,
            nice
        );
        Ok(Box::new(StressorHandle {
            workers,
            stop_flag,
            iteration_count,
            mode,
        }))
    }
}

struct StressorHandle {
    workers: Vec<JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
    iteration_count: Arc<AtomicUsize>,
    mode: WorkloadMode,
}

impl WorkloadHandle for StressorHandle {
    fn stop(&mut self) -> Result<(), WorkloadError> {
        self.stop_flag.store(true, Ordering::Release);
        let mut panicked = 0;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                panicked += 1;
            }
        }
        log::info!(
            "[Workload] Stressor stopped after {}k iterations",
            self.iteration_count.load(Ordering::Relaxed) / 1000
        );
        if panicked > 0 {
            return Err(WorkloadError::StopFailed(format!(
                "{} stressor worker(s) panicked",
                panicked
            )));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("stressor x{} ({})", self.workers.len(), self.mode)
    }
}

impl Drop for StressorHandle {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            let _ = self.stop();
        }
    }
}

/// Set the calling thread's niceness (Linux applies PRIO_PROCESS/0 per thread).
/// Raising priority needs privileges; failure is logged and the worker keeps running.
fn apply_thread_niceness(nice: i32) {
    let ret = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, nice) };
    if ret < 0 {
        log::warn!(
            "[Workload] setpriority({}) failed: {}; continuing at default priority",
            nice,
            std::io::Error::last_os_error()
        );
    }
}

/// CPU Stressor: matrix math loop until the stop flag is raised
fn cpu_stressor_routine(stop_flag: &AtomicBool, iteration_count: &AtomicUsize) {
    const MATRIX_SIZE: usize = 48;
    let a: Vec<f64> = (0..MATRIX_SIZE * MATRIX_SIZE)
        .map(|k| ((k / MATRIX_SIZE) * (k % MATRIX_SIZE)) as f64 * 0.001)
        .collect();
    let b: Vec<f64> = (0..MATRIX_SIZE * MATRIX_SIZE)
        .map(|k| ((k / MATRIX_SIZE) + (k % MATRIX_SIZE)) as f64 * 0.001)
        .collect();
    let mut c = vec![0.0f64; MATRIX_SIZE * MATRIX_SIZE];

    while !stop_flag.load(Ordering::Relaxed) {
        for i in 0..MATRIX_SIZE {
            for j in 0..MATRIX_SIZE {
                let mut sum = 0.0;
                for k in 0..MATRIX_SIZE {
                    sum += a[i * MATRIX_SIZE + k] * b[k * MATRIX_SIZE + j];
                }
                c[i * MATRIX_SIZE + j] = sum;
            }
        }
        std::hint::black_box(&c);
        iteration_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_niceness_policy_defaults() {
        let policy = NicenessPolicy::default();
        assert_eq!(policy.for_mode(WorkloadMode::Normal), 19);
        assert_eq!(policy.for_mode(WorkloadMode::LatencyBiased), -10);
    }

    #[test]
    fn test_process_command_line_carries_mode_hint() {
        let launcher = ProcessLauncher::new(
            PathBuf::from("./tests/pseudocc"),
            vec!["1000000000".to_string()],
            NicenessPolicy::default(),
        );
        assert_eq!(
            launcher.command_line(WorkloadMode::LatencyBiased),
            vec!["nice", "-n", "-10", "./tests/pseudocc", "1000000000"]
        );
        assert_eq!(launcher.command_line(WorkloadMode::Normal)[2], "19");
    }

    #[test]
    fn test_missing_executable_fails_to_launch() {
        let launcher = ProcessLauncher::new(
            PathBuf::from("/nonexistent/bore-workload"),
            Vec::new(),
            NicenessPolicy::default(),
        );
        // `nice` itself starts, so a missing program surfaces as an early exit;
        // either way launch must not panic and stop must succeed
        if let Ok(mut handle) = launcher.launch(WorkloadMode::Normal) {
            std::thread::sleep(Duration::from_millis(50));
            assert!(handle.stop().is_ok());
        }
    }

    #[test]
    fn test_stressor_start_and_stop() {
        let launcher = StressorLauncher::new(1, NicenessPolicy { normal: 19, latency_biased: 19 });
        let mut handle = launcher.launch(WorkloadMode::Normal).unwrap();
        assert!(handle.describe().contains("normal"));
        std::thread::sleep(Duration::from_millis(50));
        assert!(handle.stop().is_ok());
        // Second stop is a no-op
        assert!(handle.stop().is_ok());
    }
}
