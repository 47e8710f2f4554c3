use crate::world::World;

impl World {
    /// Tick phase 4: resolve arrivals.
    ///
    /// Each robot whose path emptied this tick and which still holds a target
    /// completes that task: the task leaves the world and the robot's link and
    /// path are cleared, returning it to the idle pool. Returns the number of
    /// tasks completed.
    pub(in crate::world) fn step_completion_phase(&mut self, arrived: &[u32]) -> usize {
        let mut completed = 0;
        for &robot_id in arrived {
            let Some(robot) = self.robots.iter_mut().find(|r| r.id == robot_id) else {
                continue;
            };
            let Some(task_id) = robot.target_task_id.take() else {
                continue;
            };
            robot.path.clear();
            self.tasks.retain(|t| t.id != task_id);
            self.tasks_completed_total += 1;
            completed += 1;
        }
        completed
    }
}
