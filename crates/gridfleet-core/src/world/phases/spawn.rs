use crate::entity::Task;
use crate::grid::Position;
use crate::world::World;
use rand::Rng;

impl World {
    /// Tick phase 1: dynamic task spawning.
    ///
    /// With spawning enabled and headroom under the task cap, a coin flip at
    /// `spawn_probability` decides whether to probe for a free cell this tick.
    /// Probes are bounded; a tick that finds no free cell simply skips.
    /// Returns the number of tasks spawned (0 or 1).
    pub(in crate::world) fn step_spawn_phase(&mut self) -> usize {
        if !self.config.dynamic_task_spawning || self.tasks.len() >= self.config.task_cap {
            return 0;
        }
        if !self.rng.random_bool(self.config.spawn_probability) {
            return 0;
        }

        let dims = self.grid_size();
        for _ in 0..self.config.spawn_max_attempts {
            let position = Position(
                self.rng.random_range(0..dims.rows()),
                self.rng.random_range(0..dims.cols()),
            );
            if !self.is_occupied(position) {
                let id = self.next_id();
                self.tasks.push(Task::new(id, position));
                return 1;
            }
        }
        0
    }
}
