//! Status and command transports

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportError;
use crate::models::{CommandRequest, CommandResponse, ErrorResponse, StatusSnapshot};
use crate::workload::WorkloadController;

/// Reaches a WorkloadController, remotely or in-process
pub trait BackendTransport: Send + Sync {
    fn fetch_status(&self) -> BoxFuture<'static, Result<StatusSnapshot, TransportError>>;
    fn send_command(
        &self,
        request: CommandRequest,
    ) -> BoxFuture<'static, Result<CommandResponse, TransportError>>;
}

/// JSON over HTTP to a `bore_backend`
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn status_url(&self) -> String {
        format!("{}/status", self.base_url)
    }

    pub fn command_url(&self) -> String {
        format!("{}/command", self.base_url)
    }
}

impl BackendTransport for HttpTransport {
    fn fetch_status(&self) -> BoxFuture<'static, Result<StatusSnapshot, TransportError>> {
        let client = self.client.clone();
        let url = self.status_url();
        async move {
            let response = client.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(TransportError::BadStatus(response.status().as_u16()));
            }
            Ok(response.json::<StatusSnapshot>().await?)
        }
        .boxed()
    }

    fn send_command(
        &self,
        request: CommandRequest,
    ) -> BoxFuture<'static, Result<CommandResponse, TransportError>> {
        let client = self.client.clone();
        let url = self.command_url();
        async move {
            let response = client.post(&url).json(&request).send().await?;
            let status = response.status();
            if !status.is_success() {
                // The backend explains launch failures in an error body
                return Err(match response.json::<ErrorResponse>().await {
                    Ok(body) => TransportError::Rejected(body.message),
                    Err(_) => TransportError::BadStatus(status.as_u16()),
                });
            }
            let body = response.json::<CommandResponse>().await?;
            if !body.is_ok() {
                return Err(TransportError::Rejected(body.status));
            }
            Ok(body)
        }
        .boxed()
    }
}

/// Drives a controller living in the same process (`--embedded`)
#[derive(Clone)]
pub struct LocalTransport {
    controller: Arc<WorkloadController>,
}

impl LocalTransport {
    pub fn new(controller: Arc<WorkloadController>) -> Self {
        Self { controller }
    }
}

impl BackendTransport for LocalTransport {
    fn fetch_status(&self) -> BoxFuture<'static, Result<StatusSnapshot, TransportError>> {
        futures::future::ready(Ok(self.controller.get_status())).boxed()
    }

    fn send_command(
        &self,
        request: CommandRequest,
    ) -> BoxFuture<'static, Result<CommandResponse, TransportError>> {
        let controller = Arc::clone(&self.controller);
        async move {
            tokio::task::spawn_blocking(move || controller.set_command(request.enabled, request.mode))
                .await
                .map_err(|e| TransportError::Rejected(e.to_string()))?
                .map_err(|e| TransportError::Rejected(e.to_string()))?;
            Ok(CommandResponse::ok(request))
        }
        .boxed()
    }
}
