use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use bore_dashboard::config::LoggingConfig;
use bore_dashboard::init_logging;
use bore_dashboard::research::{
    default_scenarios, format_comparison_table, format_latex_table, run_policy, Policy,
    DEFAULT_STEPS,
};

/// Compare baseline EEVDF/CFS picking against the graph-burst variant
#[derive(Parser, Debug)]
#[command(name = "sched_sim", version, about)]
struct Args {
    /// Steps simulated per scenario
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Also print a LaTeX table
    #[arg(long)]
    latex: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let logging = LoggingConfig {
        level: "warn".to_string(),
        ..Default::default()
    };
    let log_collector = init_logging("sched_sim", &logging, None).map_err(anyhow::Error::msg)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::info!("[SchedSim] {} steps per scenario, seed={:?}", args.steps, args.seed);

    let scenarios = default_scenarios();
    let baseline = run_policy(&scenarios, Policy::Baseline, args.steps, &mut rng);
    let boosted = run_policy(&scenarios, Policy::GraphBurst, args.steps, &mut rng);

    print!("{}", format_comparison_table(&baseline, &boosted));
    if args.latex {
        println!();
        print!("{}", format_latex_table(&baseline, &boosted));
    }

    futures::executor::block_on(log_collector.wait_for_empty()).map_err(anyhow::Error::msg)?;
    Ok(())
}
