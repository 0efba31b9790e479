use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::time::MissedTickBehavior;

use bore_dashboard::config::{load_or_default, validate_config};
use bore_dashboard::init_logging;
use bore_dashboard::monitor;
use bore_dashboard::sync::{poll_once, HttpTransport};

/// htop-style terminal view of the backend's workload status
#[derive(Parser, Debug)]
#[command(name = "bore_monitor", version, about)]
struct Args {
    /// Settings file (defaults to ~/.config/bore-dashboard/settings.json)
    #[arg(long, env = "BORE_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "BORE_BACKEND_URL")]
    backend_url: Option<String>,

    /// Redraw interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print the table once and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(url) = args.backend_url {
        config.client.backend_url = url;
    }
    if let Some(ms) = args.interval_ms {
        config.client.poll_interval_ms = ms;
    }
    // The screen is the output; keep log echo off the terminal
    config.logging.level = "off".to_string();
    validate_config(&config)?;

    let log_collector =
        init_logging("monitor", &config.logging, None).map_err(anyhow::Error::msg)?;

    let interval = Duration::from_millis(config.client.poll_interval_ms);
    let transport = HttpTransport::new(&config.client.backend_url, interval)?;

    if args.once {
        let status = poll_once(&transport, interval).await;
        print!("{}", monitor::render_process_table(&status.snapshot));
        let _ = log_collector.wait_for_empty().await;
        return Ok(());
    }

    let mut stdout = io::stdout();
    let interactive = stdout.is_terminal();
    if interactive {
        execute!(stdout, EnterAlternateScreen, Hide)?;
    } else {
        log::info!("[Monitor] stdout is not a terminal, printing plain tables");
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome: io::Result<()> = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let status = poll_once(&transport, interval).await;
                let drawn = if interactive {
                    monitor::draw(&mut stdout, &status.snapshot)
                } else {
                    writeln!(stdout, "{}", monitor::render_process_table(&status.snapshot))
                };
                if let Err(e) = drawn {
                    break Err(e);
                }
            }
            _ = &mut ctrl_c => break Ok(()),
        }
    };

    if interactive {
        execute!(stdout, Show, LeaveAlternateScreen)?;
    }
    let _ = log_collector.wait_for_empty().await;
    Ok(outcome?)
}
