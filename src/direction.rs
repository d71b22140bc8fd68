//! Cover/skip instructions walking outward from the center axis.
//!
//! Each side is read straight off the row's cells and stops at the physical
//! end of the row; unlike range extraction there is no wrap-around.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::center_axis::{left_direction_cells, right_direction_cells};
use crate::model::{
    AxisConfig, Cell, Direction, InstructionStep, StepKind, StripInitializationRule,
    WeavingInstruction,
};

pub fn generate_direction_instruction(
    cells: &[Cell],
    center_axis_index: usize,
    direction: Direction,
) -> WeavingInstruction {
    let steps = match direction {
        Direction::Left => run_length(left_direction_cells(cells, center_axis_index)),
        Direction::Right => run_length(right_direction_cells(cells, center_axis_index)),
    };
    let formatted_text = Some(format_instruction_steps(&steps));
    WeavingInstruction {
        direction,
        steps,
        formatted_text,
    }
}

fn run_length<'a>(cells: impl Iterator<Item = &'a Cell>) -> Vec<InstructionStep> {
    let mut steps: Vec<InstructionStep> = Vec::new();
    for cell in cells {
        let kind = StepKind::of(cell);
        match steps.last_mut() {
            Some(step) if step.kind == kind => step.count += 1,
            _ => steps.push(InstructionStep { kind, count: 1 }),
        }
    }
    steps
}

pub fn generate_left_direction_instruction(
    cells: &[Cell],
    center_axis_index: usize,
) -> WeavingInstruction {
    generate_direction_instruction(cells, center_axis_index, Direction::Left)
}

pub fn generate_right_direction_instruction(
    cells: &[Cell],
    center_axis_index: usize,
) -> WeavingInstruction {
    generate_direction_instruction(cells, center_axis_index, Direction::Right)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionInstructions {
    pub left_instruction: WeavingInstruction,
    pub right_instruction: WeavingInstruction,
}

pub fn generate_both_direction_instructions(
    cells: &[Cell],
    center_axis_index: usize,
) -> DirectionInstructions {
    DirectionInstructions {
        left_instruction: generate_left_direction_instruction(cells, center_axis_index),
        right_instruction: generate_right_direction_instruction(cells, center_axis_index),
    }
}

/// `"Cover 3 axes, Skip 1 axis"`, or `"none"` for an empty side.
pub fn format_instruction_steps(steps: &[InstructionStep]) -> String {
    if steps.is_empty() {
        return "none".to_owned();
    }
    steps.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// `"Cover 3, Skip 1"`.
pub fn format_instruction_steps_compact(steps: &[InstructionStep]) -> String {
    if steps.is_empty() {
        return "none".to_owned();
    }
    steps
        .iter()
        .map(|s| match s.kind {
            StepKind::Cover => format!("Cover {}", s.count),
            StepKind::Skip => format!("Skip {}", s.count),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn is_valid_instruction_steps(steps: &[InstructionStep]) -> bool {
    steps.iter().all(|s| s.count > 0)
}

impl WeavingInstruction {
    pub fn covered_axes(&self) -> usize {
        self.count_of(StepKind::Cover)
    }

    pub fn skipped_axes(&self) -> usize {
        self.count_of(StepKind::Skip)
    }

    /// Number of axes walked on this side.
    pub fn len(&self) -> usize {
        self.steps.iter().map(|s| s.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn count_of(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind == kind).map(|s| s.count).sum()
    }

    pub fn text(&self) -> String {
        match &self.formatted_text {
            Some(text) => text.clone(),
            None => format_instruction_steps(&self.steps),
        }
    }
}

impl fmt::Display for WeavingInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.direction, self.text())
    }
}

/// Strip rule plus both sides, assembled into one printable block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRowInstructions {
    pub initialization: String,
    pub left_instruction: WeavingInstruction,
    pub right_instruction: WeavingInstruction,
    pub full_text: String,
}

pub fn generate_complete_row_instructions(
    cells: &[Cell],
    center_axis_index: usize,
    strip_rule: &StripInitializationRule,
) -> CompleteRowInstructions {
    let DirectionInstructions {
        left_instruction,
        right_instruction,
    } = generate_both_direction_instructions(cells, center_axis_index);

    let full_text = format!(
        "Initialization: {}\n{}\n{}",
        strip_rule.description, left_instruction, right_instruction
    );

    CompleteRowInstructions {
        initialization: strip_rule.description.clone(),
        left_instruction,
        right_instruction,
        full_text,
    }
}

pub fn generate_row_instructions_from_config(
    cells: &[Cell],
    axis_config: &AxisConfig,
    strip_rule: &StripInitializationRule,
) -> CompleteRowInstructions {
    generate_complete_row_instructions(cells, axis_config.center_axis_index, strip_rule)
}
