use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use bore_dashboard::config::{load_or_default, validate_config};
use bore_dashboard::render::{FrameClock, PipelineSettings, SystemClock};
use bore_dashboard::sync::{
    spawn_status_poller, BackendTransport, CommandDispatcher, HttpTransport, LocalTransport,
};
use bore_dashboard::ui::{DashboardApp, DashboardChannels};
use bore_dashboard::workload::{launcher_from_config, WorkloadController};
use bore_dashboard::{init_logging, AppError, LogLine};

/// Frame-pacing visualizer for the BORE scheduler demo
#[derive(Parser, Debug)]
#[command(name = "bore_dashboard", version, about)]
struct Args {
    /// Settings file (defaults to ~/.config/bore-dashboard/settings.json)
    #[arg(long, env = "BORE_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "BORE_BACKEND_URL")]
    backend_url: Option<String>,

    /// Status poll interval in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Per-pixel noise probability on contended frames
    #[arg(long)]
    noise: Option<f64>,

    /// Fixed noise seed for reproducible frames
    #[arg(long)]
    seed: Option<u64>,

    /// Run the workload controller in-process instead of talking to a backend
    #[arg(long)]
    embedded: bool,

    /// stderr log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // =========================================================================
    // CONFIGURATION
    // =========================================================================
    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(url) = args.backend_url {
        config.client.backend_url = url;
    }
    if let Some(ms) = args.poll_interval_ms {
        config.client.poll_interval_ms = ms;
    }
    if let Some(noise) = args.noise {
        config.client.noise_probability = noise;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    validate_config(&config)?;

    // =========================================================================
    // LOGGING - activity lines are also mirrored into the side panel
    // =========================================================================
    let (log_ui_tx, log_ui_rx) = mpsc::channel::<LogLine>(1024);
    let log_collector =
        init_logging("dashboard", &config.logging, Some(log_ui_tx)).map_err(anyhow::Error::msg)?;

    // =========================================================================
    // STATUS AND COMMAND CHANNELS
    // =========================================================================
    let poll_interval = Duration::from_millis(config.client.poll_interval_ms);
    let mut embedded_controller = None;
    let (transport, backend_label): (Arc<dyn BackendTransport>, String) = if args.embedded {
        let controller = Arc::new(WorkloadController::new(launcher_from_config(&config.workload)));
        embedded_controller = Some(Arc::clone(&controller));
        (Arc::new(LocalTransport::new(controller)), "embedded".to_string())
    } else {
        let http = HttpTransport::new(&config.client.backend_url, poll_interval)
            .map_err(|e| report_startup_error(e.into()))?;
        (Arc::new(http), config.client.backend_url.clone())
    };
    log::info!("[Main] Backend: {}", backend_label);

    let (status_rx, poller) = spawn_status_poller(Arc::clone(&transport), poll_interval);
    let dispatcher = CommandDispatcher::new(transport, tokio::runtime::Handle::current());

    // =========================================================================
    // RENDERER
    // =========================================================================
    let settings = PipelineSettings {
        noise_probability: config.client.noise_probability,
        seed: args.seed,
        ..Default::default()
    };
    let frame_clock = FrameClock::with_settings(
        SystemClock::new(),
        config.client.canvas_width,
        config.client.canvas_height,
        settings,
    )
    .map_err(|e| report_startup_error(e.into()))?;

    let app = DashboardApp::new(
        frame_clock,
        DashboardChannels {
            status_rx,
            dispatcher,
            log_rx: Some(log_ui_rx),
        },
        backend_label,
    );

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_title("BORE Dashboard"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "BORE Dashboard",
        options,
        Box::new(move |_cc| Box::new(app)),
    );

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    poller.abort();
    if let Some(controller) = embedded_controller {
        tokio::task::spawn_blocking(move || controller.shutdown()).await?;
    }
    log::info!("[Main] Application shutting down");
    if let Err(e) = log_collector.wait_for_empty().await {
        eprintln!("[Main] WARNING: Failed to flush logs: {}", e);
    }

    result.map_err(|e| anyhow::anyhow!("eframe: {}", e))
}

/// Log a startup failure in user terms before bailing out
fn report_startup_error(err: AppError) -> AppError {
    log::error!("[Main] {}", err.user_message());
    err
}
