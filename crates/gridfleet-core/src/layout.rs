//! Named boards loaded from external storage or shipped with the engine.
//!
//! A layout is pure intake data: the engine instantiates entities from it and
//! never writes back. Optional fields (`robots`, `max_robots`) model older
//! stored records; defaulting happens at load time, not here.

use crate::grid::{GridSize, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{error::Error, fmt};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    pub grid_size: GridSize,
    /// Starting robots. Absent on records that leave placement to the user.
    #[serde(default)]
    pub robots: Option<Vec<Position>>,
    pub tasks: Vec<Position>,
    #[serde(default)]
    pub obstacles: Vec<Position>,
    /// Robot cap for scoring. Absent on older records; the loader defaults it.
    #[serde(default)]
    pub max_robots: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    InvalidGridSize,
    NoTasks,
    OutOfBounds { position: Position },
    OverlappingCell { position: Position },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::InvalidGridSize => write!(f, "layout grid must have positive dimensions"),
            LayoutError::NoTasks => write!(f, "layout must contain at least one task"),
            LayoutError::OutOfBounds { position } => {
                write!(f, "position ({}, {}) is outside the grid", position.row(), position.col())
            }
            LayoutError::OverlappingCell { position } => {
                write!(f, "cell ({}, {}) is used more than once", position.row(), position.col())
            }
        }
    }
}

impl Error for LayoutError {}

impl Layout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.grid_size.rows() == 0 || self.grid_size.cols() == 0 {
            return Err(LayoutError::InvalidGridSize);
        }
        if self.tasks.is_empty() {
            return Err(LayoutError::NoTasks);
        }
        let mut seen = HashSet::new();
        let all = self
            .robots
            .iter()
            .flatten()
            .chain(&self.tasks)
            .chain(&self.obstacles);
        for &position in all {
            if !self.grid_size.in_bounds(position) {
                return Err(LayoutError::OutOfBounds { position });
            }
            if !seen.insert(position) {
                return Err(LayoutError::OverlappingCell { position });
            }
        }
        Ok(())
    }
}

/// Boards shipped with the engine, easiest first.
pub fn builtin_layouts() -> Vec<Layout> {
    vec![
        Layout {
            id: "training-yard".into(),
            name: "Training Yard".into(),
            description: "A handful of scattered pickups behind thin walls. Room to learn.".into(),
            difficulty: Difficulty::Easy,
            grid_size: GridSize(10, 15),
            robots: None,
            tasks: vec![
                Position(0, 14),
                Position(9, 14),
                Position(5, 7),
                Position(2, 10),
            ],
            obstacles: vec![
                Position(2, 2),
                Position(2, 3),
                Position(2, 4),
                Position(7, 2),
                Position(7, 3),
                Position(7, 4),
                Position(4, 6),
                Position(5, 6),
                Position(6, 6),
                Position(4, 8),
                Position(5, 8),
                Position(6, 8),
            ],
            max_robots: Some(4),
        },
        Layout {
            id: "warehouse-crossing".into(),
            name: "Warehouse Crossing".into(),
            description: "Storage blocks and loading docks force traffic through a few aisles."
                .into(),
            difficulty: Difficulty::Medium,
            grid_size: GridSize(12, 18),
            robots: None,
            tasks: vec![
                Position(6, 4),
                Position(6, 13),
                Position(2, 8),
                Position(9, 8),
                Position(5, 2),
                Position(5, 15),
                Position(7, 6),
                Position(7, 11),
                Position(1, 5),
                Position(10, 12),
            ],
            obstacles: vec![
                // Left storage blocks
                Position(2, 2),
                Position(2, 3),
                Position(3, 2),
                Position(3, 3),
                Position(2, 6),
                Position(2, 7),
                Position(3, 6),
                Position(3, 7),
                // Right storage blocks
                Position(8, 2),
                Position(8, 3),
                Position(9, 2),
                Position(9, 3),
                Position(8, 6),
                Position(8, 7),
                Position(9, 6),
                Position(9, 7),
                // Center barriers
                Position(5, 9),
                Position(6, 9),
                Position(7, 9),
                Position(5, 10),
                Position(6, 10),
                Position(7, 10),
                // Loading dock walls
                Position(1, 14),
                Position(1, 15),
                Position(2, 14),
                Position(2, 15),
                Position(9, 14),
                Position(9, 15),
                Position(10, 14),
                Position(10, 15),
            ],
            max_robots: Some(6),
        },
        Layout {
            id: "assembly-lines".into(),
            name: "Assembly Lines".into(),
            description: "Two production lines and central machinery leave narrow corridors."
                .into(),
            difficulty: Difficulty::Hard,
            grid_size: GridSize(15, 20),
            robots: None,
            tasks: vec![
                Position(2, 5),
                Position(2, 14),
                Position(12, 5),
                Position(12, 14),
                Position(4, 2),
                Position(4, 17),
                Position(10, 2),
                Position(10, 17),
                Position(6, 8),
                Position(6, 11),
                Position(8, 8),
                Position(8, 11),
                Position(1, 9),
                Position(13, 9),
                Position(7, 4),
                Position(7, 15),
            ],
            obstacles: vec![
                // Line one
                Position(3, 3),
                Position(3, 4),
                Position(3, 5),
                Position(3, 6),
                Position(3, 7),
                Position(4, 3),
                Position(5, 3),
                Position(6, 3),
                Position(7, 3),
                Position(8, 3),
                Position(11, 3),
                Position(11, 4),
                Position(11, 5),
                Position(11, 6),
                Position(11, 7),
                // Line two
                Position(3, 12),
                Position(3, 13),
                Position(3, 14),
                Position(3, 15),
                Position(3, 16),
                Position(4, 16),
                Position(5, 16),
                Position(6, 16),
                Position(7, 16),
                Position(8, 16),
                Position(11, 12),
                Position(11, 13),
                Position(11, 14),
                Position(11, 15),
                Position(11, 16),
                // Central machinery
                Position(6, 9),
                Position(7, 9),
                Position(8, 9),
                Position(6, 10),
                Position(7, 10),
                Position(8, 10),
                // Side barriers
                Position(1, 2),
                Position(1, 3),
                Position(1, 16),
                Position(1, 17),
                Position(13, 2),
                Position(13, 3),
                Position(13, 16),
                Position(13, 17),
                // Pinch points
                Position(5, 5),
                Position(5, 6),
                Position(9, 5),
                Position(9, 6),
                Position(5, 13),
                Position(5, 14),
                Position(9, 13),
                Position(9, 14),
                Position(2, 8),
                Position(2, 11),
                Position(12, 8),
                Position(12, 11),
            ],
            max_robots: Some(8),
        },
    ]
}
