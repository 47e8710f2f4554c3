use crate::entity::{Robot, Task};
use serde::{Deserialize, Serialize};

/// Per-tick counters sampled during a headless run.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub tick: usize,
    pub robots_idle: usize,
    pub robots_moving: usize,
    pub tasks_pending: usize,
    pub tasks_assigned: usize,
    pub assignments_made: usize,
    pub tasks_completed: usize,
    pub tasks_spawned: usize,
}

fn default_schema_version() -> u32 {
    1
}

/// Aggregated result of a headless run, serialized by CLI callers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub ticks: usize,
    pub sample_every: usize,
    pub concluded: bool,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub tasks_completed_total: usize,
    pub score: Option<i64>,
    pub elapsed_seconds: Option<f64>,
}

pub fn collect_step_metrics(
    tick: usize,
    assignments_made: usize,
    tasks_completed: usize,
    tasks_spawned: usize,
    robots: &[Robot],
    tasks: &[Task],
) -> StepMetrics {
    let robots_moving = robots.iter().filter(|r| r.is_moving()).count();
    let tasks_assigned = tasks.iter().filter(|t| t.assigned).count();
    StepMetrics {
        tick,
        robots_idle: robots.iter().filter(|r| r.is_idle()).count(),
        robots_moving,
        tasks_pending: tasks.len() - tasks_assigned,
        tasks_assigned,
        assignments_made,
        tasks_completed,
        tasks_spawned,
    }
}
