use crate::grid::{GridSize, Position};
use std::collections::{HashMap, HashSet, VecDeque};

/// Shortest path from `start` to `goal` via breadth-first search over
/// 4-connected cells, avoiding `blocked`.
///
/// The returned path excludes `start` and ends at `goal`. An empty result
/// means "no path exists" or `start == goal` (the already-arrived case);
/// callers distinguish the two. Returns immediately, without searching, when
/// either endpoint is out of bounds or itself blocked.
pub fn find_path(
    start: Position,
    goal: Position,
    dims: GridSize,
    blocked: &HashSet<Position>,
) -> Vec<Position> {
    if !dims.in_bounds(start)
        || !dims.in_bounds(goal)
        || blocked.contains(&start)
        || blocked.contains(&goal)
    {
        return Vec::new();
    }
    if start == goal {
        return Vec::new();
    }

    let mut frontier = VecDeque::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut visited: HashSet<Position> = HashSet::new();
    visited.insert(start);
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            return reconstruct(start, goal, &came_from);
        }
        // Fixed expansion order keeps the pick among equal-length paths stable.
        for next in current.step_neighbors() {
            if dims.in_bounds(next) && !blocked.contains(&next) && visited.insert(next) {
                came_from.insert(next, current);
                frontier.push_back(next);
            }
        }
    }

    Vec::new()
}

fn reconstruct(
    start: Position,
    goal: Position,
    came_from: &HashMap<Position, Position>,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        if previous == start {
            break;
        }
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
