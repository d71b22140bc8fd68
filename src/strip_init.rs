//! Picks where the weaving strip enters and leaves the basket each round.
//!
//! When a colored range holds the center axis, the strip goes in before the
//! first axis of that range and comes out after its last axis. Otherwise the
//! strip starts inside the basket, exits after the nearest colored axis on
//! the left and re-enters before the nearest colored axis on the right.

use serde::{Deserialize, Serialize};

use crate::center_axis::{
    colored_ranges_include_center, find_center_colored_range, get_leftmost_colored_range,
    get_rightmost_colored_range,
};
use crate::model::{AxisConfig, ColoredRange, StripInitializationRule, StripRuleKind};
use crate::range_extract::ExtractedRowRanges;

const NO_COLORED_CELLS: &str = "No colored cells in this row. No strip initialization needed.";
const NO_VALID_RANGES: &str = "Unable to determine strip initialization (no valid ranges).";

/// One rule per row. Never fails: degenerate input yields a placeholder rule.
pub fn generate_strip_initialization_rule(
    colored_ranges: &[ColoredRange],
    center_axis_index: usize,
    total_axes: usize,
) -> StripInitializationRule {
    if colored_ranges.is_empty() {
        return placeholder(NO_COLORED_CELLS);
    }

    let rule = if colored_ranges_include_center(colored_ranges, center_axis_index, total_axes) {
        includes_center_rule(colored_ranges, center_axis_index, total_axes)
    } else {
        excludes_center_rule(colored_ranges, center_axis_index)
    };
    tracing::trace!(kind = ?rule.kind, exit = rule.exit_index, "strip rule");
    rule
}

fn includes_center_rule(
    colored_ranges: &[ColoredRange],
    center_axis_index: usize,
    total_axes: usize,
) -> StripInitializationRule {
    let Some(center_range) =
        find_center_colored_range(colored_ranges, center_axis_index, total_axes)
    else {
        return excludes_center_rule(colored_ranges, center_axis_index);
    };

    let insert_index = center_range.start_index;
    let exit_index = center_range.end_index;
    StripInitializationRule {
        kind: StripRuleKind::IncludesCenter,
        insert_index,
        exit_index,
        re_enter_index: None,
        description: format!(
            "Insert strip before axis {}, exit after axis {}",
            insert_index + 1,
            exit_index + 1
        ),
    }
}

// Left/right partitioning compares raw start/end indices. A wrapping range
// that misses the center usually lands in neither side and the row then
// uses the whole-row leftmost/rightmost fallback.
fn excludes_center_rule(
    colored_ranges: &[ColoredRange],
    center_axis_index: usize,
) -> StripInitializationRule {
    let nearest_left = colored_ranges
        .iter()
        .filter(|r| r.end_index < center_axis_index)
        .reduce(|best, r| if r.end_index > best.end_index { r } else { best });
    let nearest_right = colored_ranges
        .iter()
        .filter(|r| r.start_index > center_axis_index)
        .reduce(|best, r| if r.start_index < best.start_index { r } else { best });

    let (left, right) = match (nearest_left, nearest_right) {
        (Some(l), Some(r)) => (l, r),
        _ => match (
            get_leftmost_colored_range(colored_ranges),
            get_rightmost_colored_range(colored_ranges),
        ) {
            (Some(l), Some(r)) => (l, r),
            _ => return placeholder(NO_VALID_RANGES),
        },
    };

    let exit_index = left.end_index;
    let re_enter_index = right.start_index;
    StripInitializationRule {
        kind: StripRuleKind::ExcludesCenter,
        insert_index: exit_index,
        exit_index,
        re_enter_index: Some(re_enter_index),
        description: format!(
            "Start from inside basket. Exit after axis {}, re-enter before axis {}",
            exit_index + 1,
            re_enter_index + 1
        ),
    }
}

fn placeholder(description: &str) -> StripInitializationRule {
    StripInitializationRule {
        kind: StripRuleKind::ExcludesCenter,
        insert_index: 0,
        exit_index: 0,
        re_enter_index: None,
        description: description.to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowStripRule {
    pub row_index: usize,
    pub rule: StripInitializationRule,
}

pub fn generate_all_strip_initialization_rules(
    rows: &[ExtractedRowRanges],
    center_axis_index: usize,
    total_axes: usize,
) -> Vec<RowStripRule> {
    rows.iter()
        .map(|row| RowStripRule {
            row_index: row.row_index,
            rule: generate_strip_initialization_rule(
                &row.colored_ranges,
                center_axis_index,
                total_axes,
            ),
        })
        .collect()
}

pub fn strip_rule_from_config(
    colored_ranges: &[ColoredRange],
    axis_config: &AxisConfig,
) -> StripInitializationRule {
    generate_strip_initialization_rule(
        colored_ranges,
        axis_config.center_axis_index,
        axis_config.count,
    )
}

/// Multi-line summary with 1-based axis numbers.
pub fn format_strip_initialization_rule(rule: &StripInitializationRule) -> String {
    match rule.kind {
        StripRuleKind::IncludesCenter => format!(
            "Type: Includes Center\nInsert before axis {}\nExit after axis {}",
            rule.insert_index + 1,
            rule.exit_index + 1
        ),
        StripRuleKind::ExcludesCenter => {
            let re_enter = rule
                .re_enter_index
                .map_or_else(|| "none".to_owned(), |i| format!("axis {}", i + 1));
            format!(
                "Type: Excludes Center (Starts from inside)\nExit after axis {}\nRe-enter before {}",
                rule.exit_index + 1,
                re_enter
            )
        }
    }
}

impl StripInitializationRule {
    /// Indices are in bounds and an excludes-center rule carries a re-entry axis.
    pub fn is_valid(&self, total_axes: usize) -> bool {
        if self.insert_index >= total_axes || self.exit_index >= total_axes {
            return false;
        }
        match (self.kind, self.re_enter_index) {
            (StripRuleKind::IncludesCenter, _) => true,
            (StripRuleKind::ExcludesCenter, Some(i)) => i < total_axes,
            (StripRuleKind::ExcludesCenter, None) => false,
        }
    }
}
