use crate::grid::Position;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// An impassable cell. Fixed once placed; removable only by a placement intent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub position: Position,
}

impl Obstacle {
    pub fn new(id: u32, position: Position) -> Self {
        Self { id, position }
    }
}

/// A unit of work sitting on a cell until a robot reaches it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub position: Position,
    /// Set exactly when an assignment pass pairs this task with a robot;
    /// the pairing is exclusive until completion removes the task.
    pub assigned: bool,
}

impl Task {
    pub fn new(id: u32, position: Position) -> Self {
        Self {
            id,
            position,
            assigned: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Robot {
    pub id: u32,
    pub position: Position,
    pub target_task_id: Option<u32>,
    /// Remaining steps toward the target; the front is the next cell to occupy.
    pub path: VecDeque<Position>,
}

impl Robot {
    pub fn new(id: u32, position: Position) -> Self {
        Self {
            id,
            position,
            target_task_id: None,
            path: VecDeque::new(),
        }
    }

    /// A robot with no target task is eligible for assignment.
    pub fn is_idle(&self) -> bool {
        self.target_task_id.is_none()
    }

    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_robot_is_idle_and_stationary() {
        let robot = Robot::new(0, Position(2, 3));
        assert!(robot.is_idle());
        assert!(!robot.is_moving());
        assert_eq!(robot.position, Position(2, 3));
    }

    #[test]
    fn new_task_starts_unassigned() {
        assert!(!Task::new(0, Position(0, 0)).assigned);
    }
}
