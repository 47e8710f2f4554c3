use crate::config::{SimConfig, SimConfigError, Strategy, TickSpeed};
use crate::entity::{Obstacle, Robot, Task};
use crate::grid::{GridSize, Position};
use crate::layout::{Layout, LayoutError};
use crate::metrics::{collect_step_metrics, RunSummary};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use std::{error::Error, fmt};

/// Where a run sits in its lifecycle.
///
/// `Paused` marks a manual stop (resumable); `Concluded` marks natural
/// termination with every task cleared. `reset` returns any state to `Idle`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Concluded,
}

/// Per-tick accounting returned by [`World::step`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StepReport {
    pub tick: usize,
    pub tasks_spawned: usize,
    pub assignments_made: usize,
    pub robots_moved: usize,
    pub tasks_completed: usize,
    pub concluded: bool,
}

/// Read-only view handed to rendering and score-recording collaborators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub grid_size: GridSize,
    pub run_state: RunState,
    pub strategy: Strategy,
    pub tick_speed: TickSpeed,
    pub tick: usize,
    pub robots: Vec<Robot>,
    pub tasks: Vec<Task>,
    pub obstacles: Vec<Obstacle>,
    pub dynamic_task_spawning: bool,
    pub max_robots: usize,
    pub challenge: Option<String>,
    pub score: Option<i64>,
    pub elapsed_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    InvalidSampleEvery,
    TooManyTicks { max: usize, actual: usize },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            RunError::TooManyTicks { max, actual } => {
                write!(f, "max_ticks ({actual}) exceeds supported maximum ({max})")
            }
        }
    }
}

impl Error for RunError {}

/// The authoritative simulation state.
///
/// The world is the only owner of mutable state; assignment policies and the
/// pathfinder see read-only snapshots. Placement and control intents arriving
/// from external callers apply between ticks, never mid-tick, and invalid
/// intents degrade to no-ops observable only through unchanged state.
pub struct World {
    config: SimConfig,
    pub robots: Vec<Robot>,
    pub tasks: Vec<Task>,
    pub obstacles: Vec<Obstacle>,
    run_state: RunState,
    /// Round-robin fairness cursor; -1 until the first assignment lands.
    last_assigned_robot_index: isize,
    rng: ChaCha12Rng,
    next_entity_id: u32,
    tick_index: usize,
    started_at: Option<Instant>,
    elapsed: Option<Duration>,
    score: Option<i64>,
    challenge_mode: bool,
    current_challenge: Option<String>,
    tasks_completed_total: usize,
}

impl World {
    pub const MAX_RUN_TICKS: usize = 1_000_000;

    pub fn new(config: SimConfig) -> Result<Self, SimConfigError> {
        config.validate()?;
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            robots: Vec::new(),
            tasks: Vec::new(),
            obstacles: Vec::new(),
            run_state: RunState::Idle,
            last_assigned_robot_index: -1,
            rng,
            next_entity_id: 0,
            tick_index: 0,
            started_at: None,
            elapsed: None,
            score: None,
            challenge_mode: false,
            current_challenge: None,
            tasks_completed_total: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid_size(&self) -> GridSize {
        self.config.grid_size()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn tick_index(&self) -> usize {
        self.tick_index
    }

    pub fn score(&self) -> Option<i64> {
        self.score
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn challenge_mode(&self) -> bool {
        self.challenge_mode
    }

    pub fn current_challenge(&self) -> Option<&str> {
        self.current_challenge.as_deref()
    }

    pub fn last_assigned_robot_index(&self) -> isize {
        self.last_assigned_robot_index
    }

    pub fn tasks_completed_total(&self) -> usize {
        self.tasks_completed_total
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.robots.iter().any(|r| r.position == position)
            || self.tasks.iter().any(|t| t.position == position)
            || self.obstacles.iter().any(|o| o.position == position)
    }

    fn accepts_placement(&self, position: Position) -> bool {
        self.run_state != RunState::Running
            && self.grid_size().in_bounds(position)
            && !self.is_occupied(position)
    }

    // ---- placement intents -------------------------------------------------

    pub fn add_robot(&mut self, position: Position) {
        if self.robots.len() >= self.config.max_robots || !self.accepts_placement(position) {
            return;
        }
        let id = self.next_id();
        self.robots.push(Robot::new(id, position));
    }

    pub fn add_task(&mut self, position: Position) {
        if self.tasks.len() >= self.config.task_cap || !self.accepts_placement(position) {
            return;
        }
        let id = self.next_id();
        self.tasks.push(Task::new(id, position));
    }

    pub fn add_obstacle(&mut self, position: Position) {
        if !self.accepts_placement(position) {
            return;
        }
        let id = self.next_id();
        self.obstacles.push(Obstacle::new(id, position));
    }

    /// Remove whatever entity occupies `position`. Removing an obstacle drops
    /// challenge framing, since it rewrites a named board.
    pub fn remove_at(&mut self, position: Position) {
        if self.run_state == RunState::Running {
            return;
        }
        let removed_obstacle = self.obstacles.iter().any(|o| o.position == position);
        self.robots.retain(|r| r.position != position);
        self.tasks.retain(|t| t.position != position);
        self.obstacles.retain(|o| o.position != position);
        if removed_obstacle && self.challenge_mode {
            self.challenge_mode = false;
        }
    }

    /// Remove every entity and reset run meta-state.
    pub fn clear(&mut self) {
        if self.run_state == RunState::Running {
            return;
        }
        self.robots.clear();
        self.tasks.clear();
        self.obstacles.clear();
        self.challenge_mode = false;
        self.current_challenge = None;
        self.reset_run_meta();
    }

    /// Scatter a bounded count of tasks and robots on distinct free cells,
    /// replacing the current robots and tasks. Obstacles stay where they are.
    pub fn randomize_layout(&mut self) {
        if self.run_state == RunState::Running {
            return;
        }
        let dims = self.grid_size();
        let total = self.config.task_cap.min(dims.cell_count() / 20);

        let obstacle_cells: Vec<Position> = self.obstacles.iter().map(|o| o.position).collect();
        let mut free: Vec<Position> = (0..dims.rows())
            .flat_map(|row| (0..dims.cols()).map(move |col| Position(row, col)))
            .filter(|p| !obstacle_cells.contains(p))
            .collect();
        free.shuffle(&mut self.rng);

        self.robots.clear();
        self.tasks.clear();
        let mut cells = free.into_iter();
        for _ in 0..total {
            let Some(position) = cells.next() else { break };
            let id = self.next_id();
            self.tasks.push(Task::new(id, position));
        }
        for _ in 0..total.min(self.config.max_robots) {
            let Some(position) = cells.next() else { break };
            let id = self.next_id();
            self.robots.push(Robot::new(id, position));
        }
    }

    /// Atomically replace the board from a named layout: entities, grid
    /// dimensions, and robot cap, with run meta-state fully reset. Missing
    /// optional fields default here (no robots; the stock robot cap).
    pub fn load_layout(&mut self, layout: &Layout) -> Result<(), LayoutError> {
        layout.validate()?;
        self.robots.clear();
        self.tasks.clear();
        self.obstacles.clear();
        self.reset_run_meta();

        self.config.rows = layout.grid_size.rows();
        self.config.cols = layout.grid_size.cols();
        self.config.max_robots = layout.max_robots.unwrap_or(SimConfig::default().max_robots);

        for &position in layout.robots.iter().flatten() {
            let id = self.next_id();
            self.robots.push(Robot::new(id, position));
        }
        for &position in &layout.tasks {
            let id = self.next_id();
            self.tasks.push(Task::new(id, position));
        }
        for &position in &layout.obstacles {
            let id = self.next_id();
            self.obstacles.push(Obstacle::new(id, position));
        }

        self.challenge_mode = true;
        self.current_challenge = Some(layout.id.clone());
        Ok(())
    }

    // ---- control intents ---------------------------------------------------

    /// `Idle`/`Paused` → `Running`, recording a fresh wall-clock start.
    pub fn start(&mut self) {
        match self.run_state {
            RunState::Idle | RunState::Paused => {
                self.run_state = RunState::Running;
                self.started_at = Some(Instant::now());
                self.elapsed = None;
                self.score = None;
            }
            RunState::Running | RunState::Concluded => {}
        }
    }

    /// Manual stop: `Running` → `Paused` with the score banked for this run.
    pub fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.finish_run(RunState::Paused);
        }
    }

    /// Any state → `Idle`: entities cleared, policy and cadence back to stock.
    pub fn reset(&mut self) {
        self.robots.clear();
        self.tasks.clear();
        self.obstacles.clear();
        let stock = SimConfig::default();
        self.config.strategy = stock.strategy;
        self.config.tick_speed = stock.tick_speed;
        self.config.dynamic_task_spawning = stock.dynamic_task_spawning;
        self.challenge_mode = false;
        self.current_challenge = None;
        self.reset_run_meta();
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        if self.run_state == RunState::Running {
            return;
        }
        self.config.strategy = strategy;
    }

    /// Takes effect on the caller's next scheduled tick; in-flight state is
    /// untouched.
    pub fn set_tick_speed(&mut self, tick_speed: TickSpeed) {
        self.config.tick_speed = tick_speed;
    }

    pub fn toggle_dynamic_task_spawning(&mut self) {
        self.config.dynamic_task_spawning = !self.config.dynamic_task_spawning;
    }

    /// Changing the cap rewrites a named challenge's rules, so challenge
    /// framing is dropped.
    pub fn set_max_robots(&mut self, max_robots: usize) {
        if self.run_state == RunState::Running || max_robots == 0 {
            return;
        }
        self.config.max_robots = max_robots;
        self.challenge_mode = false;
    }

    fn reset_run_meta(&mut self) {
        self.run_state = RunState::Idle;
        self.last_assigned_robot_index = -1;
        self.tick_index = 0;
        self.started_at = None;
        self.elapsed = None;
        self.score = None;
        self.tasks_completed_total = 0;
    }

    fn finish_run(&mut self, state: RunState) {
        let elapsed = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
        self.elapsed = Some(elapsed);
        self.score = Some(compute_score(
            elapsed,
            self.config.max_robots,
            self.robots.len(),
        ));
        self.run_state = state;
    }

    // ---- tick --------------------------------------------------------------

    /// Advance the simulation by one tick: spawn, assign, move, complete,
    /// check termination. The sequence always runs to the end; pause and
    /// reset intents only apply between ticks.
    pub fn step(&mut self) -> StepReport {
        self.tick_index = self.tick_index.saturating_add(1);

        let tasks_spawned = self.step_spawn_phase();
        let assignments_made = self.step_assignment_phase();
        let (robots_moved, arrived) = self.step_movement_phase();
        let tasks_completed = self.step_completion_phase(&arrived);

        let mut concluded = false;
        if self.run_state == RunState::Running
            && self.tasks.is_empty()
            && !self.config.dynamic_task_spawning
        {
            self.finish_run(RunState::Concluded);
            concluded = true;
        }

        StepReport {
            tick: self.tick_index,
            tasks_spawned,
            assignments_made,
            robots_moved,
            tasks_completed,
            concluded,
        }
    }

    /// Step until natural conclusion or `max_ticks`, sampling metrics every
    /// `sample_every` ticks. Starts the run if it is not already running.
    pub fn run_to_completion(
        &mut self,
        max_ticks: usize,
        sample_every: usize,
    ) -> Result<RunSummary, RunError> {
        if sample_every == 0 {
            return Err(RunError::InvalidSampleEvery);
        }
        if max_ticks > Self::MAX_RUN_TICKS {
            return Err(RunError::TooManyTicks {
                max: Self::MAX_RUN_TICKS,
                actual: max_ticks,
            });
        }

        if self.run_state != RunState::Running {
            self.start();
        }
        let mut samples = Vec::new();
        let mut ticks = 0;
        for tick in 1..=max_ticks {
            let report = self.step();
            ticks = tick;
            if tick % sample_every == 0 || report.concluded || tick == max_ticks {
                samples.push(collect_step_metrics(
                    self.tick_index,
                    report.assignments_made,
                    report.tasks_completed,
                    report.tasks_spawned,
                    &self.robots,
                    &self.tasks,
                ));
            }
            if report.concluded {
                break;
            }
        }

        Ok(RunSummary {
            schema_version: 1,
            ticks,
            sample_every,
            concluded: self.run_state == RunState::Concluded,
            samples,
            tasks_completed_total: self.tasks_completed_total,
            score: self.score,
            elapsed_seconds: self.elapsed.map(|d| d.as_secs_f64()),
        })
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            grid_size: self.grid_size(),
            run_state: self.run_state,
            strategy: self.config.strategy,
            tick_speed: self.config.tick_speed,
            tick: self.tick_index,
            robots: self.robots.clone(),
            tasks: self.tasks.clone(),
            obstacles: self.obstacles.clone(),
            dynamic_task_spawning: self.config.dynamic_task_spawning,
            max_robots: self.config.max_robots,
            challenge: self.current_challenge.clone(),
            score: self.score,
            elapsed_seconds: self.elapsed.map(|d| d.as_secs_f64()),
        }
    }
}

/// `max(0, 1000 - round(10 * elapsed_seconds)) + 100 * (max_robots - robots)`:
/// faster runs and smaller fleets score higher.
fn compute_score(elapsed: Duration, max_robots: usize, robot_count: usize) -> i64 {
    let penalty = (elapsed.as_secs_f64() * 10.0).round() as i64;
    let base = (1000 - penalty).max(0);
    let bonus = 100 * (max_robots as i64 - robot_count as i64);
    base + bonus
}

mod phases;
