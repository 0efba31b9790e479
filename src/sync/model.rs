//! Dashboard-side state: optimistic toggles and poll reconciliation

use super::poller::BackendStatus;
use crate::models::{BiasMode, CommandRequest, RenderState};

/// Frame rate the visualizer aims for when not contended
pub const TARGET_FPS: u32 = 60;
/// Frame rate displayed as the target under fair contention
pub const CONTENDED_TARGET_FPS: u32 = 14;

/// The UI's copy of `{stress_active, bias_mode}` plus the last poll outcome
#[derive(Debug, Clone, Default)]
pub struct DashboardModel {
    render_state: RenderState,
    backend: BackendStatus,
}

impl DashboardModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    pub fn backend(&self) -> BackendStatus {
        self.backend
    }

    /// Flip stress locally and return the command to send.
    pub fn toggle_stress(&mut self) -> CommandRequest {
        self.render_state.stress_active = !self.render_state.stress_active;
        CommandRequest::new(
            self.render_state.stress_active,
            self.render_state.bias_mode.into(),
        )
    }

    /// Flip bias locally. A command is only needed while a workload runs;
    /// otherwise the choice is remembered for the next enable.
    pub fn toggle_bias(&mut self) -> Option<CommandRequest> {
        self.render_state.bias_mode = self.render_state.bias_mode.toggled();
        self.render_state
            .stress_active
            .then(|| CommandRequest::new(true, self.render_state.bias_mode.into()))
    }

    /// Reconcile with a poll result. Returns true if the render state changed.
    ///
    /// Stress always follows the backend. Bias follows it only while a session
    /// runs, since an idle backend reports no mode.
    pub fn apply_status(&mut self, status: BackendStatus) -> bool {
        let before = self.render_state;
        self.backend = status;
        self.render_state.stress_active = status.snapshot.is_stressing;
        if status.snapshot.is_stressing {
            self.render_state.bias_mode = if status.snapshot.bore_enabled {
                BiasMode::LatencyBiased
            } else {
                BiasMode::Fair
            };
        }
        self.render_state != before
    }

    /// Frame rate shown as the target for the current state
    pub fn target_fps(&self) -> u32 {
        if self.render_state.is_contended() {
            CONTENDED_TARGET_FPS
        } else {
            TARGET_FPS
        }
    }

    /// Share of CPU time the background workload is shown taking, in [0, 1]
    pub fn workload_cpu_share(&self) -> f32 {
        match (self.render_state.stress_active, self.render_state.bias_mode) {
            (false, _) => 0.05,
            (true, BiasMode::Fair) => 0.85,
            (true, BiasMode::LatencyBiased) => 0.12,
        }
    }
}
