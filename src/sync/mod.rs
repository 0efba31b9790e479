//! Client side of the status and command channels
//!
//! - **Transport**: how `GET /status` and `POST /command` reach a controller
//! - **Poller**: fixed-cadence status polling with the offline fallback
//! - **Model**: optimistic dashboard state reconciled by poll results

pub mod model;
pub mod poller;
pub mod transport;

pub use model::DashboardModel;
pub use poller::{poll_once, spawn_status_poller, BackendStatus, CommandDispatcher};
pub use transport::{BackendTransport, HttpTransport, LocalTransport};
