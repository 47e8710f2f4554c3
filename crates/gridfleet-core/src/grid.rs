use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A grid cell as `(row, col)`. Serializes as a two-element array.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(pub usize, pub usize);

impl Position {
    pub fn row(self) -> usize {
        self.0
    }

    pub fn col(self) -> usize {
        self.1
    }

    /// Sum of absolute row and column differences.
    pub fn manhattan(self, other: Position) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    /// Orthogonal neighbors in the fixed order up, down, left, right.
    ///
    /// Candidates that would underflow the coordinate space are dropped;
    /// the upper bound is the caller's concern (see [`GridSize::in_bounds`]).
    pub fn step_neighbors(self) -> impl Iterator<Item = Position> {
        let Position(row, col) = self;
        [
            row.checked_sub(1).map(|r| Position(r, col)),
            Some(Position(row + 1, col)),
            col.checked_sub(1).map(|c| Position(row, c)),
            Some(Position(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Board dimensions as `(rows, cols)`. Serializes as a two-element array.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridSize(pub usize, pub usize);

impl GridSize {
    pub fn rows(self) -> usize {
        self.0
    }

    pub fn cols(self) -> usize {
        self.1
    }

    pub fn cell_count(self) -> usize {
        self.0.saturating_mul(self.1)
    }

    pub fn in_bounds(self, position: Position) -> bool {
        position.0 < self.0 && position.1 < self.1
    }
}

/// Occupancy predicate over a prepared obstacle set.
pub fn is_blocked(position: Position, blocked: &HashSet<Position>) -> bool {
    blocked.contains(&position)
}
