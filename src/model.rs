//! Plain data types shared by the pattern compiler and the grid container.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of one (row, axis) cell.
///
/// A color only exists on colored cells, so "uncolored with a color" cannot
/// be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Cell {
    #[default]
    Empty,
    Colored { color: String },
}

impl Cell {
    pub fn colored(color: impl Into<String>) -> Self {
        Cell::Colored {
            color: color.into(),
        }
    }

    pub fn is_colored(&self) -> bool {
        matches!(self, Cell::Colored { .. })
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            Cell::Empty => None,
            Cell::Colored { color } => Some(color.as_str()),
        }
    }
}

/// A cell together with its grid coordinates, as handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellState {
    #[serde(flatten)]
    pub cell: Cell,
    pub axis_index: usize,
    pub row_index: usize,
}

/// Vertical axis (stake) layout. Axes are circular: `count - 1` neighbours `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    pub count: usize,
    pub center_axis_index: usize,
    pub evenly_spaced: bool,
}

/// A maximal run of adjacent cells sharing state (and color, when colored).
///
/// `start_index > end_index` marks a run that wraps across the row boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoredRange {
    pub start_index: usize,
    pub end_index: usize,
    pub is_colored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub length: usize,
}

impl ColoredRange {
    /// Builds a colored range, computing `length` with wrap-around.
    pub fn colored(
        start_index: usize,
        end_index: usize,
        color: impl Into<String>,
        total_axes: usize,
    ) -> Self {
        let length = if start_index > end_index {
            (total_axes - start_index) + (end_index + 1)
        } else {
            end_index - start_index + 1
        };
        Self {
            start_index,
            end_index,
            is_colored: true,
            color: Some(color.into()),
            length,
        }
    }

    pub fn wraps(&self) -> bool {
        self.start_index > self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        if self.wraps() {
            index >= self.start_index || index <= self.end_index
        } else {
            self.start_index <= index && index <= self.end_index
        }
    }

    /// Axis indices covered by the range, in walking order.
    pub fn indices(&self, total_axes: usize) -> impl Iterator<Item = usize> + '_ {
        let (head, tail) = if self.wraps() {
            (self.start_index..total_axes, 0..self.end_index + 1)
        } else {
            (self.start_index..self.end_index + 1, 0..0)
        };
        head.chain(tail)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Reworked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("Left"),
            Direction::Right => f.write_str("Right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// Strip passes in front of the axis.
    Cover,
    /// Strip passes behind the axis.
    Skip,
}

impl StepKind {
    pub fn of(cell: &Cell) -> Self {
        if cell.is_colored() { StepKind::Cover } else { StepKind::Skip }
    }
}

/// Run-length encoded unit of a direction instruction. `count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub count: usize,
}

impl InstructionStep {
    pub fn cover(count: usize) -> Self {
        Self {
            kind: StepKind::Cover,
            count,
        }
    }

    pub fn skip(count: usize) -> Self {
        Self {
            kind: StepKind::Skip,
            count,
        }
    }
}

impl fmt::Display for InstructionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.kind {
            StepKind::Cover => "Cover",
            StepKind::Skip => "Skip",
        };
        let noun = if self.count == 1 { "axis" } else { "axes" };
        write!(f, "{action} {} {noun}", self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeavingInstruction {
    pub direction: Direction,
    pub steps: Vec<InstructionStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StripRuleKind {
    IncludesCenter,
    ExcludesCenter,
}

/// Where the strip enters and leaves the basket for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripInitializationRule {
    #[serde(rename = "type")]
    pub kind: StripRuleKind,
    pub insert_index: usize,
    pub exit_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub re_enter_index: Option<usize>,
    pub description: String,
}
