use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use bore_dashboard::config::{load_or_default, validate_config};
use bore_dashboard::init_logging;
use bore_dashboard::server;
use bore_dashboard::workload::{launcher_from_config, WorkloadController};

/// HTTP backend owning the simulated workload session
#[derive(Parser, Debug)]
#[command(name = "bore_backend", version, about)]
struct Args {
    /// Settings file (defaults to ~/.config/bore-dashboard/settings.json)
    #[arg(long, env = "BORE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:3001
    #[arg(long, env = "BORE_BIND")]
    bind: Option<String>,

    /// External workload executable, run under `nice -n <N>`
    #[arg(long)]
    workload: Option<PathBuf>,

    /// Argument passed to the workload executable (repeatable)
    #[arg(long = "workload-arg")]
    workload_args: Vec<String>,

    /// In-process stressor threads (0 = one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// stderr log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(program) = args.workload {
        config.workload.executable = Some(program);
        config.workload.args = args.workload_args;
    }
    if let Some(threads) = args.threads {
        config.workload.stressor_threads = threads;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    validate_config(&config)?;

    let log_collector =
        init_logging("backend", &config.logging, None).map_err(anyhow::Error::msg)?;

    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind_addr))?;
    let controller = Arc::new(WorkloadController::new(launcher_from_config(&config.workload)));

    let served = server::serve(addr, controller, shutdown_signal()).await;

    if let Err(e) = log_collector.wait_for_empty().await {
        eprintln!("[Backend] WARNING: Failed to flush logs: {}", e);
    }
    served.with_context(|| format!("server on {} failed", addr))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("[Backend] Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("[Backend] Ctrl-C received");
}
