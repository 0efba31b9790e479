//! Authoritative workload session state
//!
//! The controller owns at most one [`WorkloadSession`]. Every command retires
//! the current session before anything new is installed, and the whole
//! "read, tear down, install" sequence runs under one mutex, so concurrent
//! commands are serialized and two sessions can never overlap.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::launcher::{WorkloadHandle, WorkloadLauncher};
use crate::error::WorkloadError;
use crate::models::{StatusSnapshot, WorkloadMode};

/// One simulated background task
pub struct WorkloadSession {
    pub id: u64,
    pub mode: WorkloadMode,
    pub started_at: DateTime<Local>,
    handle: Box<dyn WorkloadHandle>,
}

impl WorkloadSession {
    fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            mode: self.mode,
            started_at: self.started_at,
            description: self.handle.describe(),
        }
    }
}

/// Read-only view of the live session
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: u64,
    pub mode: WorkloadMode,
    pub started_at: DateTime<Local>,
    pub description: String,
}

/// Single-session store with an atomic tear-down-then-install operation
pub struct WorkloadController {
    launcher: Arc<dyn WorkloadLauncher>,
    session: Mutex<Option<WorkloadSession>>,
    next_id: AtomicU64,
}

impl WorkloadController {
    pub fn new(launcher: Arc<dyn WorkloadLauncher>) -> Self {
        Self {
            launcher,
            session: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    // The slot is a plain Option, so it is consistent even after a panic elsewhere
    fn lock_session(&self) -> MutexGuard<'_, Option<WorkloadSession>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current `{isStressing, boreEnabled}`. `boreEnabled` reflects the live
    /// session only and is false while idle.
    pub fn get_status(&self) -> StatusSnapshot {
        snapshot_of(&self.lock_session())
    }

    /// Retire any existing session, then start a new one only if `enabled`.
    ///
    /// If the launch fails the controller is left idle.
    pub fn set_command(&self, enabled: bool, mode: WorkloadMode) -> Result<StatusSnapshot, WorkloadError> {
        let mut slot = self.lock_session();

        if let Some(mut previous) = slot.take() {
            log::info!(
                "[Controller] Retiring session #{} ({})",
                previous.id,
                previous.handle.describe()
            );
            if let Err(e) = previous.handle.stop() {
                log::warn!("[Controller] Session #{} did not stop cleanly: {}", previous.id, e);
            }
        } else if !enabled {
            log::debug!("[Controller] Disable while idle: nothing to do");
        }

        if enabled {
            let handle = self.launcher.launch(mode)?;
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            log::info!("[Controller] Session #{} running in {} mode", id, mode);
            *slot = Some(WorkloadSession {
                id,
                mode,
                started_at: Local::now(),
                handle,
            });
        }

        Ok(snapshot_of(&slot))
    }

    /// Details of the live session, if any
    pub fn session_info(&self) -> Option<SessionInfo> {
        self.lock_session().as_ref().map(WorkloadSession::info)
    }

    /// Stop the live session, if any (used on server shutdown)
    pub fn shutdown(&self) {
        if let Err(e) = self.set_command(false, WorkloadMode::Normal) {
            log::warn!("[Controller] Shutdown failed: {}", e);
        }
    }
}

fn snapshot_of(slot: &Option<WorkloadSession>) -> StatusSnapshot {
    match slot {
        Some(session) => StatusSnapshot {
            is_stressing: true,
            bore_enabled: session.mode == WorkloadMode::LatencyBiased,
        },
        None => StatusSnapshot::offline(),
    }
}
