//! Core data types for the BORE dashboard.
//!
//! Wire types (`StatusSnapshot`, `CommandRequest`, `CommandResponse`) are shared
//! by the axum backend, the HTTP transport and the terminal monitor.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Simulated scheduling regime used as a rendering input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiasMode {
    /// Interactive task competes equally with the background workload
    #[default]
    Fair,
    /// Interactive task is always preempted in
    LatencyBiased,
}

impl BiasMode {
    pub fn toggled(self) -> Self {
        match self {
            BiasMode::Fair => BiasMode::LatencyBiased,
            BiasMode::LatencyBiased => BiasMode::Fair,
        }
    }
}

/// Renderer-local copy of the workload state.
///
/// `bias_mode` does not imply `stress_active`: the bias toggle can be flipped
/// while no workload is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderState {
    pub stress_active: bool,
    pub bias_mode: BiasMode,
}

impl RenderState {
    pub fn new(stress_active: bool, bias_mode: BiasMode) -> Self {
        Self {
            stress_active,
            bias_mode,
        }
    }

    /// True when the fair-share contention effect applies
    pub fn is_contended(&self) -> bool {
        self.stress_active && self.bias_mode == BiasMode::Fair
    }
}

/// Mode tag of a workload session, as carried on the wire ("normal" / "bore").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WorkloadMode {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bore")]
    LatencyBiased,
}

impl WorkloadMode {
    /// Parse a wire value. Anything other than exactly "bore" is normalized
    /// to `Normal`.
    pub fn from_wire(value: &str) -> Self {
        if value == "bore" {
            WorkloadMode::LatencyBiased
        } else {
            WorkloadMode::Normal
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            WorkloadMode::Normal => "normal",
            WorkloadMode::LatencyBiased => "bore",
        }
    }
}

// Lenient: a missing, null, non-string or unknown mode is `Normal`, never an error.
impl<'de> Deserialize<'de> for WorkloadMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map(WorkloadMode::from_wire).unwrap_or_default())
    }
}

impl fmt::Display for WorkloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

impl From<BiasMode> for WorkloadMode {
    fn from(bias: BiasMode) -> Self {
        match bias {
            BiasMode::Fair => WorkloadMode::Normal,
            BiasMode::LatencyBiased => WorkloadMode::LatencyBiased,
        }
    }
}

impl From<WorkloadMode> for BiasMode {
    fn from(mode: WorkloadMode) -> Self {
        match mode {
            WorkloadMode::Normal => BiasMode::Fair,
            WorkloadMode::LatencyBiased => BiasMode::LatencyBiased,
        }
    }
}

/// Wire representation of the backend's session state (`GET /status`).
///
/// `Default` is the safe fallback shown when the backend is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub is_stressing: bool,
    pub bore_enabled: bool,
}

impl StatusSnapshot {
    pub fn offline() -> Self {
        Self::default()
    }
}

/// Body of `POST /command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub mode: WorkloadMode,
}

impl CommandRequest {
    pub fn new(enabled: bool, mode: WorkloadMode) -> Self {
        Self { enabled, mode }
    }
}

/// Acknowledgement of `POST /command`, echoing the normalized request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    pub enabled: bool,
    pub mode: WorkloadMode,
}

impl CommandResponse {
    pub fn ok(request: CommandRequest) -> Self {
        Self {
            status: "ok".to_string(),
            enabled: request.enabled,
            mode: request.mode,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Error body returned when a command could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_snapshot_wire_names() {
        let json = serde_json::to_value(StatusSnapshot {
            is_stressing: true,
            bore_enabled: false,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"isStressing": true, "boreEnabled": false}));
    }

    #[test]
    fn test_offline_snapshot_is_all_false() {
        let s = StatusSnapshot::offline();
        assert!(!s.is_stressing);
        assert!(!s.bore_enabled);
    }

    #[test]
    fn test_command_mode_normalization() {
        let cases = [
            (r#"{"enabled": true, "mode": "bore"}"#, WorkloadMode::LatencyBiased),
            (r#"{"enabled": true, "mode": "BORE"}"#, WorkloadMode::Normal),
            (r#"{"enabled": true, "mode": " bore "}"#, WorkloadMode::Normal),
            (r#"{"enabled": true, "mode": "normal"}"#, WorkloadMode::Normal),
            (r#"{"enabled": true, "mode": "turbo"}"#, WorkloadMode::Normal),
            (r#"{"enabled": true, "mode": 7}"#, WorkloadMode::Normal),
            (r#"{"enabled": true, "mode": null}"#, WorkloadMode::Normal),
            (r#"{"enabled": true}"#, WorkloadMode::Normal),
        ];
        for (body, expected) in cases {
            let req: CommandRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.mode, expected, "body: {}", body);
            assert!(req.enabled);
        }
    }

    #[test]
    fn test_command_enabled_defaults_false() {
        let req: CommandRequest = serde_json::from_str(r#"{"mode": "bore"}"#).unwrap();
        assert!(!req.enabled);
    }

    #[test]
    fn test_command_response_echoes_normalized_mode() {
        let resp = CommandResponse::ok(CommandRequest::new(true, WorkloadMode::from_wire("x")));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "enabled": true, "mode": "normal"}));
    }

    #[test]
    fn test_bias_mode_round_trip_through_workload_mode() {
        assert_eq!(BiasMode::from(WorkloadMode::from(BiasMode::LatencyBiased)), BiasMode::LatencyBiased);
        assert_eq!(BiasMode::Fair.toggled(), BiasMode::LatencyBiased);
    }

    #[test]
    fn test_render_state_contention() {
        assert!(RenderState::new(true, BiasMode::Fair).is_contended());
        assert!(!RenderState::new(true, BiasMode::LatencyBiased).is_contended());
        assert!(!RenderState::new(false, BiasMode::Fair).is_contended());
    }
}
