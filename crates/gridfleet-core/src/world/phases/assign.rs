use crate::assignment::{self, Assignment};
use crate::config::Strategy;
use crate::world::World;

impl World {
    /// Tick phase 2: run the configured policy once over the current state
    /// and apply every proposed pairing. Returns the number applied.
    pub(in crate::world) fn step_assignment_phase(&mut self) -> usize {
        let dims = self.grid_size();
        let proposals = match self.config.strategy {
            Strategy::Nearest => assignment::assign_nearest_first(
                &self.robots,
                &self.tasks,
                &self.obstacles,
                dims,
            ),
            Strategy::RoundRobin => {
                let outcome = assignment::assign_round_robin(
                    &self.robots,
                    &self.tasks,
                    &self.obstacles,
                    dims,
                    self.last_assigned_robot_index,
                );
                self.last_assigned_robot_index = outcome.next_robot_index;
                outcome.assignments
            }
        };

        let applied = proposals.len();
        for proposal in proposals {
            self.apply_assignment(proposal);
        }
        applied
    }

    fn apply_assignment(&mut self, assignment: Assignment) {
        if let Some(robot) = self.robots.iter_mut().find(|r| r.id == assignment.robot_id) {
            robot.target_task_id = Some(assignment.task_id);
            robot.path = assignment.path.into();
        }
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == assignment.task_id) {
            task.assigned = true;
        }
    }
}
