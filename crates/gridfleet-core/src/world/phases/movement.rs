use crate::world::World;

impl World {
    /// Tick phase 3: advance every pathed robot one cell.
    ///
    /// All moves resolve against the same pre-move snapshot, so two robots
    /// may legally cross the same cell in one tick. Assignment-time path
    /// blocking is the only overlap avoidance; committed paths are never
    /// re-validated.
    ///
    /// Returns the move count and the ids of robots whose path emptied this
    /// tick, in robot-list order, for the completion phase.
    pub(in crate::world) fn step_movement_phase(&mut self) -> (usize, Vec<u32>) {
        let mut moved = 0;
        let mut arrived = Vec::new();
        for robot in &mut self.robots {
            let Some(next) = robot.path.pop_front() else {
                continue;
            };
            robot.position = next;
            moved += 1;
            if robot.path.is_empty() {
                arrived.push(robot.id);
            }
        }
        (moved, arrived)
    }
}
