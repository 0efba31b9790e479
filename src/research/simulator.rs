//! Discrete-step scheduler comparison

use rand::Rng;
use std::fmt::Write;

/// Steps simulated per scenario
pub const DEFAULT_STEPS: usize = 2000;

/// Initial EWMA burst prediction (ms)
const INITIAL_BURST_PRED: f64 = 2.0;
const MIN_BOOST: f64 = 1.0;
const MAX_BOOST: f64 = 4.5;
/// Nice-0 load weight
const NICE_0_LOAD: f64 = 1024.0;

/// How long a task runs once picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstClass {
    Interactive,
    Gaming,
    Batch,
}

impl BurstClass {
    /// Execution length range in ms
    pub fn exec_range(self) -> (f64, f64) {
        match self {
            BurstClass::Interactive => (0.5, 3.0),
            BurstClass::Gaming => (1.0, 5.0),
            BurstClass::Batch => (10.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Always pick the minimum vruntime (EEVDF/CFS-like)
    Baseline,
    /// Minimum vruntime, with vruntime growth divided by a dependency/burst boost
    GraphBurst,
}

impl Policy {
    pub fn label(self) -> &'static str {
        match self {
            Policy::Baseline => "EEVDF(CFS)",
            Policy::GraphBurst => "GRAPH-BURST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub name: &'static str,
    /// 0-39, informational
    pub priority: u8,
    pub load: f64,
    pub class: BurstClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    pub tasks: Vec<TaskSpec>,
}

/// The three workloads used for the comparison
pub fn default_scenarios() -> Vec<Scenario> {
    let task = |name, priority, load, class| TaskSpec {
        name,
        priority,
        load,
        class,
    };
    vec![
        Scenario {
            name: "Interactive (Editor/Code)",
            tasks: vec![
                task("Editor", 20, 1024.0, BurstClass::Interactive),
                task("Background-Math", 30, 4096.0, BurstClass::Batch),
            ],
        },
        Scenario {
            name: "Gaming (Low-Latency)",
            tasks: vec![
                task("Game-Renderer", 15, 2048.0, BurstClass::Gaming),
                task("File-Indexer", 25, 1024.0, BurstClass::Batch),
            ],
        },
        Scenario {
            name: "Mixed (Media/Worker)",
            tasks: vec![
                task("Video-Stream", 10, 1024.0, BurstClass::Interactive),
                task("Worker-Pool", 35, 512.0, BurstClass::Batch),
                task("System-Daemon", 20, 1024.0, BurstClass::Interactive),
            ],
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub scenario: &'static str,
    pub policy: Policy,
    pub p99_ms: f64,
    pub throughput: f64,
    pub jain_index: f64,
}

struct SimTask<'a> {
    spec: &'a TaskSpec,
    vruntime: f64,
    burst_pred: f64,
    latencies: Vec<f64>,
    processed: f64,
}

/// `clamp(load·1024/(1+sibling_load)/512 · (1 + 1/max(0.1, pred)), 1, 4.5)`
pub fn graph_burst_boost(load: f64, sibling_load: f64, burst_pred: f64) -> f64 {
    let graph_factor = (load * NICE_0_LOAD) / (1.0 + sibling_load) / 512.0;
    let burst_factor = 1.0 + 1.0 / burst_pred.max(0.1);
    (graph_factor * burst_factor).clamp(MIN_BOOST, MAX_BOOST)
}

/// Jain's fairness index, 0 for no data
pub fn jain_index(shares: &[f64]) -> f64 {
    let sum: f64 = shares.iter().sum();
    let sum_sq: f64 = shares.iter().map(|s| s * s).sum();
    let bottom = shares.len() as f64 * sum_sq;
    if bottom == 0.0 {
        0.0
    } else {
        sum * sum / bottom
    }
}

fn p99(latencies: &mut [f64]) -> f64 {
    if latencies.is_empty() {
        return 0.0;
    }
    latencies.sort_by(f64::total_cmp);
    let idx = ((latencies.len() as f64 * 0.99) as usize).min(latencies.len() - 1);
    latencies[idx]
}

fn run_scenario<R: Rng>(scenario: &Scenario, policy: Policy, steps: usize, rng: &mut R) -> ScenarioResult {
    let mut tasks: Vec<SimTask> = scenario
        .tasks
        .iter()
        .map(|spec| SimTask {
            spec,
            vruntime: 0.0,
            burst_pred: INITIAL_BURST_PRED,
            latencies: Vec::with_capacity(steps),
            processed: 0.0,
        })
        .collect();
    let total_load: f64 = scenario.tasks.iter().map(|t| t.load).sum();

    for _ in 0..steps {
        // Ties go to the earliest task
        let Some(idx) = (0..tasks.len()).min_by(|&a, &b| tasks[a].vruntime.total_cmp(&tasks[b].vruntime)) else {
            break;
        };
        let curr = &mut tasks[idx];
        let (lo, hi) = curr.spec.class.exec_range();
        let exec = rng.gen_range(lo..=hi);

        let boost = match policy {
            Policy::Baseline => 1.0,
            Policy::GraphBurst => {
                curr.burst_pred = curr.burst_pred * 0.8 + exec * 0.2;
                graph_burst_boost(curr.spec.load, total_load - curr.spec.load, curr.burst_pred)
            }
        };

        curr.vruntime += exec * (NICE_0_LOAD / curr.spec.load) / boost;
        curr.processed += exec;
        curr.latencies.push(exec);
    }

    let mut all_latencies: Vec<f64> = tasks.iter().flat_map(|t| t.latencies.iter().copied()).collect();
    let shares: Vec<f64> = tasks.iter().map(|t| t.processed).collect();

    ScenarioResult {
        scenario: scenario.name,
        policy,
        p99_ms: p99(&mut all_latencies),
        throughput: shares.iter().sum(),
        jain_index: jain_index(&shares),
    }
}

/// Run every scenario under `policy`
pub fn run_policy<R: Rng>(
    scenarios: &[Scenario],
    policy: Policy,
    steps: usize,
    rng: &mut R,
) -> Vec<ScenarioResult> {
    scenarios
        .iter()
        .map(|scenario| {
            let result = run_scenario(scenario, policy, steps, rng);
            log::debug!(
                "[Research] {} / {}: p99={:.2} jain={:.4}",
                result.scenario,
                policy.label(),
                result.p99_ms,
                result.jain_index
            );
            result
        })
        .collect()
}

/// Side-by-side terminal table, one baseline/boosted pair per scenario
pub fn format_comparison_table(baseline: &[ScenarioResult], boosted: &[ScenarioResult]) -> String {
    let rule = "-".repeat(85);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<25} | {:<12} | {:<12} | {:<12} | Jain's Index",
        "Scenario", "Mode", "99p Latency", "Throughput"
    );
    let _ = writeln!(out, "{}", rule);

    for (b, g) in baseline.iter().zip(boosted) {
        let _ = writeln!(
            out,
            "{:<25} | {:<12} | {:<10.2}ms | {:<10.0}u | {:.4}",
            b.scenario,
            b.policy.label(),
            b.p99_ms,
            b.throughput,
            b.jain_index
        );
        let _ = writeln!(
            out,
            "{:<25} | {:<12} | {:<10.2}ms | {:<10.0}u | {:.4}",
            "",
            g.policy.label(),
            g.p99_ms,
            g.throughput,
            g.jain_index
        );
        let _ = writeln!(out, "{}", rule);
    }
    out
}

/// LaTeX table for write-ups
pub fn format_latex_table(baseline: &[ScenarioResult], boosted: &[ScenarioResult]) -> String {
    let mut out = String::new();
    out.push_str("\\begin{table}[h]\n");
    out.push_str("\\centering\n");
    out.push_str("\\caption{Comparison of Graph-Burst EEVDF vs. Baseline EEVDF/CFS}\n");
    out.push_str("\\begin{tabular}{|l|c|c|c|}\n");
    out.push_str("\\hline\n");
    out.push_str("Scenario & Mode & 99p Latency & Jain's Index \\\\\n");
    out.push_str("\\hline\n");
    for (b, g) in baseline.iter().zip(boosted) {
        let _ = writeln!(
            out,
            "{} & EEVDF & {:.2}ms & {:.4} \\\\",
            b.scenario, b.p99_ms, b.jain_index
        );
        let _ = writeln!(
            out,
            "{} & \\textbf{{Proposed}} & \\textbf{{{:.2}ms}} & {:.4} \\\\",
            g.scenario, g.p99_ms, g.jain_index
        );
        out.push_str("\\hline\n");
    }
    out.push_str("\\end{tabular}\n");
    out.push_str("\\end{table}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_jain_index_bounds() {
        assert!((jain_index(&[5.0, 5.0, 5.0]) - 1.0).abs() < 1e-12);
        assert!((jain_index(&[1.0, 0.0]) - 0.5).abs() < 1e-12);
        assert_eq!(jain_index(&[]), 0.0);
        assert_eq!(jain_index(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_boost_is_clamped() {
        // Light task among heavy siblings: no boost
        assert_eq!(graph_burst_boost(512.0, 8192.0, 10.0), MIN_BOOST);
        // Heavy task, tiny burst: capped
        assert_eq!(graph_burst_boost(4096.0, 1024.0, 0.01), MAX_BOOST);
        let mid = graph_burst_boost(1024.0, 1024.0, 2.0);
        assert!((MIN_BOOST..=MAX_BOOST).contains(&mid));
    }

    #[test]
    fn test_same_seed_same_results() {
        let scenarios = default_scenarios();
        let a = run_policy(&scenarios, Policy::GraphBurst, 500, &mut StdRng::seed_from_u64(7));
        let b = run_policy(&scenarios, Policy::GraphBurst, 500, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_results_within_exec_ranges() {
        let scenarios = default_scenarios();
        let mut rng = StdRng::seed_from_u64(42);
        for policy in [Policy::Baseline, Policy::GraphBurst] {
            let results = run_policy(&scenarios, policy, DEFAULT_STEPS, &mut rng);
            assert_eq!(results.len(), 3);
            for r in &results {
                assert!(r.p99_ms >= 0.5 && r.p99_ms <= 20.0, "{:?}", r);
                assert!(r.throughput > 0.0);
                assert!(r.jain_index > 0.0 && r.jain_index <= 1.0 + 1e-12);
            }
        }
    }

    #[test]
    fn test_tables_list_every_scenario() {
        let scenarios = default_scenarios();
        let mut rng = StdRng::seed_from_u64(1);
        let base = run_policy(&scenarios, Policy::Baseline, 100, &mut rng);
        let boosted = run_policy(&scenarios, Policy::GraphBurst, 100, &mut rng);

        let table = format_comparison_table(&base, &boosted);
        let latex = format_latex_table(&base, &boosted);
        for s in &scenarios {
            assert!(table.contains(s.name));
            assert!(latex.contains(s.name));
        }
        assert!(table.contains("GRAPH-BURST"));
        assert!(latex.starts_with("\\begin{table}[h]"));
        assert!(latex.contains("\\textbf{Proposed}"));
    }
}
