//! Task-to-robot pairing policies.
//!
//! Both policies are pure functions over read-only snapshots: they propose
//! `(robot, task, path)` triples and leave applying them to the engine. Within
//! one call no robot and no task appears in more than one triple.

use crate::entity::{Obstacle, Robot, Task};
use crate::grid::{GridSize, Position};
use crate::path::find_path;
use std::collections::HashSet;

/// One proposed pairing produced by an assignment pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub robot_id: u32,
    pub task_id: u32,
    pub path: Vec<Position>,
}

/// Result of a round-robin pass: the pairings plus the advanced fairness cursor.
#[derive(Clone, Debug)]
pub struct RoundRobinOutcome {
    pub assignments: Vec<Assignment>,
    pub next_robot_index: isize,
}

/// Cells that block a candidate pairing's path: every obstacle plus every
/// robot and task position except the pair under evaluation.
fn blocking_positions(
    robots: &[Robot],
    tasks: &[Task],
    obstacles: &[Obstacle],
    candidate_robot: u32,
    candidate_task: u32,
) -> HashSet<Position> {
    let mut blocked: HashSet<Position> = obstacles.iter().map(|o| o.position).collect();
    blocked.extend(
        robots
            .iter()
            .filter(|r| r.id != candidate_robot)
            .map(|r| r.position),
    );
    blocked.extend(
        tasks
            .iter()
            .filter(|t| t.id != candidate_task)
            .map(|t| t.position),
    );
    blocked
}

/// Nearest reachable task for `robot` among `available`, ties broken by scan
/// order: only a strictly smaller distance displaces the current best.
fn nearest_reachable(
    robot: &Robot,
    available: &[&Task],
    robots: &[Robot],
    tasks: &[Task],
    obstacles: &[Obstacle],
    dims: GridSize,
) -> Option<(u32, Vec<Position>)> {
    let mut best: Option<(usize, u32, Vec<Position>)> = None;
    for task in available {
        let distance = robot.position.manhattan(task.position);
        if best.as_ref().is_some_and(|(d, _, _)| distance >= *d) {
            continue;
        }
        let blocked = blocking_positions(robots, tasks, obstacles, robot.id, task.id);
        let path = find_path(robot.position, task.position, dims, &blocked);
        if !path.is_empty() {
            best = Some((distance, task.id, path));
        }
    }
    best.map(|(_, task_id, path)| (task_id, path))
}

/// Nearest-first policy: idle robots, in robot-list order, each claim their
/// nearest reachable unassigned task. Claimed tasks leave the pool
/// immediately, so a later robot cannot steal an earlier robot's pick.
pub fn assign_nearest_first(
    robots: &[Robot],
    tasks: &[Task],
    obstacles: &[Obstacle],
    dims: GridSize,
) -> Vec<Assignment> {
    let idle: Vec<&Robot> = robots.iter().filter(|r| r.is_idle()).collect();
    let mut available: Vec<&Task> = tasks.iter().filter(|t| !t.assigned).collect();
    let mut assignments = Vec::new();
    if idle.is_empty() || available.is_empty() {
        return assignments;
    }

    for robot in idle {
        if available.is_empty() {
            break;
        }
        if let Some((task_id, path)) =
            nearest_reachable(robot, &available, robots, tasks, obstacles, dims)
        {
            available.retain(|t| t.id != task_id);
            assignments.push(Assignment {
                robot_id: robot.id,
                task_id,
                path,
            });
        }
    }
    assignments
}

/// Round-robin policy: turns rotate over the current idle-robot list starting
/// after `last_assigned_robot_index` (-1 = none yet), one offered turn per
/// idle robot per call; each offered robot receives its nearest reachable
/// available task.
///
/// The cursor travels as an explicit input/output pair rather than hidden
/// module state. The returned cursor is the index of the last robot that
/// successfully received an assignment, or the input value unchanged when no
/// assignment succeeded. The index space is recomputed from the idle list on
/// every call, so the cursor is only meaningful across calls as a rotation
/// offset, not as a stable robot identity.
pub fn assign_round_robin(
    robots: &[Robot],
    tasks: &[Task],
    obstacles: &[Obstacle],
    dims: GridSize,
    last_assigned_robot_index: isize,
) -> RoundRobinOutcome {
    let idle: Vec<&Robot> = robots.iter().filter(|r| r.is_idle()).collect();
    let mut available: Vec<&Task> = tasks.iter().filter(|t| !t.assigned).collect();
    let mut assignments = Vec::new();
    let mut cursor = last_assigned_robot_index;
    if idle.is_empty() || available.is_empty() {
        return RoundRobinOutcome {
            assignments,
            next_robot_index: cursor,
        };
    }

    let idle_count = idle.len() as isize;
    let start = (last_assigned_robot_index + 1).rem_euclid(idle_count);
    for offset in 0..idle_count {
        if available.is_empty() {
            break;
        }
        let index = (start + offset).rem_euclid(idle_count);
        let robot = idle[index as usize];
        if let Some((task_id, path)) =
            nearest_reachable(robot, &available, robots, tasks, obstacles, dims)
        {
            available.retain(|t| t.id != task_id);
            assignments.push(Assignment {
                robot_id: robot.id,
                task_id,
                path,
            });
            cursor = index;
        }
    }

    RoundRobinOutcome {
        assignments,
        next_robot_index: cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot(id: u32, row: usize, col: usize) -> Robot {
        Robot::new(id, Position(row, col))
    }

    fn task(id: u32, row: usize, col: usize) -> Task {
        Task::new(id, Position(row, col))
    }

    fn dims() -> GridSize {
        GridSize(10, 10)
    }

    #[test]
    fn nearest_first_pairs_each_robot_with_its_closest_task() {
        let robots = vec![robot(0, 0, 0), robot(1, 5, 5)];
        let tasks = vec![task(10, 0, 2), task(11, 5, 7), task(12, 9, 9)];
        let assignments = assign_nearest_first(&robots, &tasks, &[], dims());
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].robot_id, 0);
        assert_eq!(assignments[0].task_id, 10);
        assert_eq!(assignments[1].robot_id, 1);
        assert_eq!(assignments[1].task_id, 11);
        assert!(assignments.iter().all(|a| !a.path.is_empty()));
    }

    #[test]
    fn nearest_first_skips_busy_robots_and_assigned_tasks() {
        let mut busy = robot(0, 0, 0);
        busy.target_task_id = Some(99);
        let robots = vec![busy, robot(1, 5, 5)];
        let mut claimed = task(10, 0, 2);
        claimed.assigned = true;
        let tasks = vec![claimed, task(11, 5, 7)];
        let assignments = assign_nearest_first(&robots, &tasks, &[], dims());
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].robot_id, 1);
        assert_eq!(assignments[0].task_id, 11);
    }

    #[test]
    fn nearest_first_short_circuits_on_empty_inputs() {
        let robots = vec![robot(0, 0, 0)];
        let tasks = vec![task(10, 5, 5)];
        assert!(assign_nearest_first(&[], &tasks, &[], dims()).is_empty());
        assert!(assign_nearest_first(&robots, &[], &[], dims()).is_empty());
    }

    #[test]
    fn distance_ties_break_to_earlier_task_in_scan_order() {
        let robots = vec![robot(0, 4, 4)];
        // Both tasks sit two steps away.
        let tasks = vec![task(10, 4, 6), task(11, 6, 4)];
        let assignments = assign_nearest_first(&robots, &tasks, &[], dims());
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].task_id, 10);
    }

    #[test]
    fn unreachable_nearer_task_loses_to_reachable_farther_task() {
        // Task 10 is closer but walled in; task 11 is reachable.
        let robots = vec![robot(0, 0, 0)];
        let tasks = vec![task(10, 0, 2), task(11, 4, 0)];
        let obstacles = vec![
            Obstacle::new(20, Position(0, 1)),
            Obstacle::new(21, Position(1, 2)),
            Obstacle::new(22, Position(0, 3)),
        ];
        let assignments = assign_nearest_first(&robots, &tasks, &obstacles, dims());
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].task_id, 11);
    }

    #[test]
    fn enclosed_robot_receives_no_assignment() {
        // 3x3 board, robot boxed into the corner.
        let robots = vec![robot(0, 0, 0)];
        let tasks = vec![task(10, 2, 2)];
        let obstacles = vec![
            Obstacle::new(20, Position(0, 1)),
            Obstacle::new(21, Position(1, 1)),
            Obstacle::new(22, Position(1, 0)),
        ];
        let assignments = assign_nearest_first(&robots, &tasks, &obstacles, GridSize(3, 3));
        assert!(assignments.is_empty());
    }

    #[test]
    fn other_robots_and_tasks_block_candidate_paths() {
        // The only corridor to the task runs through another (busy) robot.
        let mut parked = robot(1, 0, 1);
        parked.target_task_id = Some(99);
        let robots = vec![robot(0, 0, 0), parked];
        let tasks = vec![task(10, 0, 2)];
        let obstacles = vec![
            Obstacle::new(20, Position(1, 0)),
            Obstacle::new(21, Position(1, 1)),
            Obstacle::new(22, Position(1, 2)),
        ];
        let assignments = assign_nearest_first(&robots, &tasks, &obstacles, GridSize(2, 3));
        assert!(assignments.is_empty());
    }

    #[test]
    fn no_robot_or_task_is_assigned_twice_per_call() {
        let robots = vec![robot(0, 0, 0), robot(1, 0, 9), robot(2, 9, 0)];
        let tasks = vec![task(10, 4, 4), task(11, 4, 5), task(12, 5, 4)];
        let assignments = assign_nearest_first(&robots, &tasks, &[], dims());
        assert_eq!(assignments.len(), 3);
        let robot_ids: HashSet<u32> = assignments.iter().map(|a| a.robot_id).collect();
        let task_ids: HashSet<u32> = assignments.iter().map(|a| a.task_id).collect();
        assert_eq!(robot_ids.len(), 3);
        assert_eq!(task_ids.len(), 3);
    }

    #[test]
    fn earlier_robot_keeps_its_claim_against_a_closer_later_robot() {
        // Task 10 is nearest to both robots; robot 0 scans first and claims it.
        let robots = vec![robot(0, 0, 3), robot(1, 0, 1)];
        let tasks = vec![task(10, 0, 2), task(11, 5, 5)];
        let assignments = assign_nearest_first(&robots, &tasks, &[], dims());
        let first = assignments.iter().find(|a| a.robot_id == 0).unwrap();
        assert_eq!(first.task_id, 10);
        let second = assignments.iter().find(|a| a.robot_id == 1).unwrap();
        assert_eq!(second.task_id, 11);
    }

    #[test]
    fn round_robin_gives_every_robot_one_turn() {
        let robots = vec![robot(0, 0, 0), robot(1, 1, 0), robot(2, 2, 0)];
        let tasks = vec![task(10, 0, 2), task(11, 1, 2), task(12, 2, 2)];
        let outcome = assign_round_robin(&robots, &tasks, &[], dims(), -1);
        assert_eq!(outcome.assignments.len(), 3);
        assert_eq!(outcome.next_robot_index, 2);
        let robot_ids: HashSet<u32> = outcome.assignments.iter().map(|a| a.robot_id).collect();
        let task_ids: HashSet<u32> = outcome.assignments.iter().map(|a| a.task_id).collect();
        assert_eq!(robot_ids.len(), 3);
        assert_eq!(task_ids.len(), 3);
    }

    #[test]
    fn round_robin_starts_after_the_cursor() {
        let robots = vec![robot(0, 0, 0), robot(1, 5, 5), robot(2, 9, 9)];
        // Single task closest to robot 2, but robot 1 holds the next turn.
        let tasks = vec![task(10, 8, 8)];
        let outcome = assign_round_robin(&robots, &tasks, &[], dims(), 0);
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].robot_id, 1);
        assert_eq!(outcome.next_robot_index, 1);
    }

    #[test]
    fn round_robin_wraps_past_the_end_of_the_idle_list() {
        let robots = vec![robot(0, 0, 0), robot(1, 5, 5)];
        let tasks = vec![task(10, 0, 2), task(11, 5, 7), task(12, 1, 1)];
        let outcome = assign_round_robin(&robots, &tasks, &[], dims(), 1);
        // One turn each: robot 0 first (wrapped), then robot 1.
        assert_eq!(outcome.assignments.len(), 2);
        assert_eq!(outcome.assignments[0].robot_id, 0);
        assert_eq!(outcome.assignments[1].robot_id, 1);
        assert_eq!(outcome.next_robot_index, 1);
    }

    #[test]
    fn round_robin_assigns_nearest_reachable_task_per_turn() {
        let robots = vec![robot(0, 0, 0), robot(1, 5, 5)];
        let tasks = vec![task(10, 0, 1), task(11, 5, 6)];
        let outcome = assign_round_robin(&robots, &tasks, &[], dims(), -1);
        let first = outcome.assignments.iter().find(|a| a.robot_id == 0).unwrap();
        assert_eq!(first.task_id, 10);
        let second = outcome.assignments.iter().find(|a| a.robot_id == 1).unwrap();
        assert_eq!(second.task_id, 11);
    }

    #[test]
    fn round_robin_preserves_cursor_when_nothing_assigns() {
        let robots = vec![robot(0, 0, 0)];
        let mut claimed = task(10, 0, 2);
        claimed.assigned = true;
        let outcome = assign_round_robin(&robots, &[claimed], &[], dims(), 4);
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.next_robot_index, 4);

        let outcome = assign_round_robin(&[], &[task(11, 1, 1)], &[], dims(), -1);
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.next_robot_index, -1);
    }

    #[test]
    fn round_robin_rotates_turns_across_consecutive_calls() {
        let robots = vec![robot(0, 0, 0), robot(1, 9, 9)];
        let mut cursor = -1;
        let mut first_turns = Vec::new();
        // One fresh task per call; the robot holding the turn takes it even
        // when the other robot is closer.
        for _ in 0..4 {
            let tasks = vec![task(50, 4, 4)];
            let outcome = assign_round_robin(&robots, &tasks, &[], dims(), cursor);
            assert_eq!(outcome.assignments.len(), 1);
            first_turns.push(outcome.assignments[0].robot_id);
            cursor = outcome.next_robot_index;
        }
        assert_eq!(first_turns, vec![0, 1, 0, 1]);
    }

    #[test]
    fn round_robin_with_more_tasks_than_robots_stops_after_one_round() {
        let robots = vec![robot(0, 0, 0), robot(1, 5, 5)];
        let tasks = vec![
            task(10, 0, 2),
            task(11, 5, 7),
            task(12, 8, 8),
            task(13, 9, 9),
        ];
        let outcome = assign_round_robin(&robots, &tasks, &[], dims(), -1);
        assert_eq!(outcome.assignments.len(), 2);
    }

    #[test]
    fn stale_cursor_beyond_idle_count_still_rotates() {
        let robots = vec![robot(0, 0, 0), robot(1, 5, 5)];
        let tasks = vec![task(10, 4, 4)];
        let outcome = assign_round_robin(&robots, &tasks, &[], dims(), 7);
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].robot_id, 0);
    }
}
