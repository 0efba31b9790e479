//! Offline scheduler experiments
//!
//! Compares a baseline min-vruntime pick against a "graph-burst" variant that
//! boosts tasks with heavy load relative to their siblings and short predicted
//! bursts. Numbers are synthetic; they motivate the dashboard's narrative and
//! are not measurements of a real kernel.

pub mod simulator;

pub use simulator::{
    default_scenarios, format_comparison_table, format_latex_table, graph_burst_boost, jain_index,
    run_policy, BurstClass, Policy, Scenario, ScenarioResult, TaskSpec, DEFAULT_STEPS,
};
