pub mod assignment;
pub mod config;
pub mod entity;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod path;
pub mod world;

pub use config::{SimConfig, SimConfigError, Strategy, TickSpeed};
pub use grid::{GridSize, Position};
pub use layout::{builtin_layouts, Difficulty, Layout, LayoutError};
pub use metrics::{RunSummary, StepMetrics};
pub use world::{RunError, RunState, StepReport, World, WorldSnapshot};
