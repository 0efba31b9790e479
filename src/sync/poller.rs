//! Status polling and fire-and-forget commands

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::transport::BackendTransport;
use crate::models::{CommandRequest, StatusSnapshot};

/// Latest poll outcome as seen by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStatus {
    /// Backend truth, or the offline default when the poll failed
    pub snapshot: StatusSnapshot,
    pub reachable: bool,
}

impl BackendStatus {
    pub fn offline() -> Self {
        Self {
            snapshot: StatusSnapshot::offline(),
            reachable: false,
        }
    }
}

/// Fetch one status. Any failure, including exceeding `timeout`, yields the
/// offline default instead of the last known value.
pub async fn poll_once(transport: &dyn BackendTransport, timeout: Duration) -> BackendStatus {
    match tokio::time::timeout(timeout, transport.fetch_status()).await {
        Ok(Ok(snapshot)) => BackendStatus {
            snapshot,
            reachable: true,
        },
        Ok(Err(e)) => {
            log::debug!("[Sync] Status poll failed: {}", e);
            BackendStatus::offline()
        }
        Err(_) => {
            log::debug!("[Sync] Status poll timed out after {:?}", timeout);
            BackendStatus::offline()
        }
    }
}

/// Poll every `period` and publish each result, independent of user activity.
///
/// The task ends once every receiver is dropped.
pub fn spawn_status_poller(
    transport: Arc<dyn BackendTransport>,
    period: Duration,
) -> (watch::Receiver<BackendStatus>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(BackendStatus::offline());

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // A slow poll pushes the schedule back instead of bursting to catch up
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut was_reachable = false;

        loop {
            ticker.tick().await;
            let status = poll_once(transport.as_ref(), period).await;

            if status.reachable != was_reachable {
                if status.reachable {
                    log::info!("[Sync] Backend online: {:?}", status.snapshot);
                } else {
                    log::warn!("[Sync] Backend offline, showing idle state");
                }
                was_reachable = status.reachable;
            }

            if tx.send(status).is_err() {
                log::debug!("[Sync] No status subscribers left, poller exiting");
                break;
            }
        }
    });

    (rx, handle)
}

/// Sends commands without waiting for them; failures are logged only
#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn BackendTransport>,
    runtime: tokio::runtime::Handle,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn BackendTransport>, runtime: tokio::runtime::Handle) -> Self {
        Self { transport, runtime }
    }

    /// Fire `request`. There is no retry and no rollback; the next successful
    /// poll reconciles any divergence.
    pub fn dispatch(&self, request: CommandRequest) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        self.runtime.spawn(async move {
            match transport.send_command(request).await {
                Ok(response) => log::info!(
                    "[Sync] Command accepted: enabled={} mode={}",
                    response.enabled,
                    response.mode
                ),
                Err(e) => log::error!(
                    "[Sync] Command enabled={} mode={} failed: {}",
                    request.enabled,
                    request.mode,
                    e
                ),
            }
        })
    }
}
