//! Compiles circular basket-weaving patterns into per-round instructions.
//!
//! Rows are weaving rounds, columns are stakes (axes) arranged in a circle.
//! For each round the compiler extracts the colored ranges, picks the strip
//! entry/exit rule relative to the center axis, and walks outward from the
//! center to produce cover/skip steps for each side.

pub mod center_axis;
pub mod config;
pub mod direction;
pub mod grid;
pub mod model;
pub mod pattern_text;
pub mod range_extract;
pub mod strip_init;

pub use config::{ConfigError, WeaveConfig};
pub use grid::{GridError, PatternGrid, RowWeavingInstructions, WeavingRow, WeavingSession};
pub use model::{
    AxisConfig, Cell, CellState, ColoredRange, Direction, InstructionStep, RowStatus, StepKind,
    StripInitializationRule, StripRuleKind, WeavingInstruction,
};
