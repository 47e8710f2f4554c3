use crate::grid::GridSize;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Each idle robot claims its closest reachable task.
    #[default]
    Nearest,
    /// Assignment turns rotate across idle robots via a fairness cursor.
    RoundRobin,
}

/// Cadence preset for the external tick driver.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TickSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl TickSpeed {
    /// Tick period in milliseconds. The engine itself never sleeps; callers
    /// schedule `World::step` at this period.
    pub fn period_ms(self) -> u64 {
        match self {
            TickSpeed::Slow => 1000,
            TickSpeed::Normal => 500,
            TickSpeed::Fast => 200,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Grid height in cells.
    pub rows: usize,
    /// Grid width in cells.
    pub cols: usize,
    /// Task-to-robot pairing policy.
    pub strategy: Strategy,
    /// Cadence preset handed to the external tick driver.
    pub tick_speed: TickSpeed,
    /// Whether ticks may spawn new tasks while running.
    pub dynamic_task_spawning: bool,
    /// Robot placement cap; also the baseline for the score bonus.
    pub max_robots: usize,
    /// Ceiling on simultaneously live tasks, placed or spawned.
    pub task_cap: usize,
    /// Per-tick chance that dynamic spawning attempts a placement.
    pub spawn_probability: f64,
    /// Random free-cell probes per spawn attempt before giving up that tick.
    pub spawn_max_attempts: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rows: 10,
            cols: 15,
            strategy: Strategy::default(),
            tick_speed: TickSpeed::default(),
            dynamic_task_spawning: false,
            max_robots: 10,
            task_cap: 20,
            spawn_probability: 0.25,
            spawn_max_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidGridSize,
    GridTooLarge { max: usize, actual: usize },
    InvalidMaxRobots,
    InvalidTaskCap,
    InvalidSpawnProbability,
    InvalidSpawnAttempts,
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::InvalidGridSize => write!(f, "rows and cols must both be positive"),
            SimConfigError::GridTooLarge { max, actual } => {
                write!(f, "grid cell count ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::InvalidMaxRobots => write!(f, "max_robots must be positive"),
            SimConfigError::InvalidTaskCap => write!(f, "task_cap must be positive"),
            SimConfigError::InvalidSpawnProbability => {
                write!(f, "spawn_probability must be a finite value in 0.0..=1.0")
            }
            SimConfigError::InvalidSpawnAttempts => write!(f, "spawn_max_attempts must be positive"),
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_GRID_CELLS: usize = 65_536;

    pub fn grid_size(&self) -> GridSize {
        GridSize(self.rows, self.cols)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimConfigError::InvalidGridSize);
        }
        let cells = self.rows.saturating_mul(self.cols);
        if cells > Self::MAX_GRID_CELLS {
            return Err(SimConfigError::GridTooLarge {
                max: Self::MAX_GRID_CELLS,
                actual: cells,
            });
        }
        if self.max_robots == 0 {
            return Err(SimConfigError::InvalidMaxRobots);
        }
        if self.task_cap == 0 {
            return Err(SimConfigError::InvalidTaskCap);
        }
        if !self.spawn_probability.is_finite() || !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(SimConfigError::InvalidSpawnProbability);
        }
        if self.spawn_max_attempts == 0 {
            return Err(SimConfigError::InvalidSpawnAttempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = SimConfig {
            rows: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimConfigError::InvalidGridSize)));
        let config = SimConfig {
            cols: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimConfigError::InvalidGridSize)));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let config = SimConfig {
            rows: 1_000,
            cols: 1_000,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn spawn_probability_outside_unit_interval_is_rejected() {
        for probability in [-0.1, 1.1, f64::NAN] {
            let config = SimConfig {
                spawn_probability: probability,
                ..SimConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(SimConfigError::InvalidSpawnProbability)
            ));
        }
    }

    #[test]
    fn zero_caps_are_rejected() {
        let config = SimConfig {
            max_robots: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimConfigError::InvalidMaxRobots)));
        let config = SimConfig {
            task_cap: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimConfigError::InvalidTaskCap)));
        let config = SimConfig {
            spawn_max_attempts: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::InvalidSpawnAttempts)
        ));
    }

    #[test]
    fn tick_speed_periods_match_presets() {
        assert_eq!(TickSpeed::Slow.period_ms(), 1000);
        assert_eq!(TickSpeed::Normal.period_ms(), 500);
        assert_eq!(TickSpeed::Fast.period_ms(), 200);
    }

    #[test]
    fn partial_config_json_deserializes_with_defaults() {
        let partial = r#"{
            "seed": 7,
            "rows": 5,
            "cols": 5,
            "strategy": "round_robin"
        }"#;
        let config: SimConfig = serde_json::from_str(partial).expect("partial config should parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.strategy, Strategy::RoundRobin);
        assert_eq!(config.tick_speed, TickSpeed::Normal);
        assert_eq!(config.max_robots, 10);
        assert_eq!(config.task_cap, 20);
    }
}
