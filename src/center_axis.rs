//! Center axis helpers.
//!
//! The center axis is only a reference used to split the round into a left
//! and a right half and to pick the strip rule. The strip never physically
//! starts or ends there.

use serde::{Deserialize, Serialize};

use crate::model::{AxisConfig, ColoredRange};

/// Default center: `floor(total / 2)`, or 0 when there are no axes.
pub fn calculate_center_axis_index(total_axes: usize) -> usize {
    total_axes / 2
}

pub fn is_valid_center_axis_index(center_axis_index: usize, total_axes: usize) -> bool {
    center_axis_index < total_axes
}

impl AxisConfig {
    /// Keeps `center_axis_index` when it is valid for `count`, otherwise
    /// falls back to the calculated center.
    pub fn new(count: usize, center_axis_index: Option<usize>) -> Self {
        let center_axis_index = center_axis_index
            .filter(|&c| is_valid_center_axis_index(c, count))
            .unwrap_or_else(|| calculate_center_axis_index(count));
        Self {
            count,
            center_axis_index,
            evenly_spaced: true,
        }
    }
}

pub fn range_includes_center_axis(
    range: &ColoredRange,
    center_axis_index: usize,
    total_axes: usize,
) -> bool {
    center_axis_index < total_axes && range.contains(center_axis_index)
}

pub fn colored_ranges_include_center(
    ranges: &[ColoredRange],
    center_axis_index: usize,
    total_axes: usize,
) -> bool {
    ranges
        .iter()
        .any(|r| range_includes_center_axis(r, center_axis_index, total_axes))
}

pub fn find_center_colored_range(
    ranges: &[ColoredRange],
    center_axis_index: usize,
    total_axes: usize,
) -> Option<&ColoredRange> {
    ranges
        .iter()
        .find(|r| range_includes_center_axis(r, center_axis_index, total_axes))
}

/// Axis indices on either side of the center, nearest to the center first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionSplit {
    pub left_indices: Vec<usize>,
    pub right_indices: Vec<usize>,
    pub center_index: usize,
}

pub fn split_left_right_directions(center_axis_index: usize, total_axes: usize) -> DirectionSplit {
    DirectionSplit {
        left_indices: (0..center_axis_index.min(total_axes)).rev().collect(),
        right_indices: (center_axis_index + 1..total_axes).collect(),
        center_index: center_axis_index,
    }
}

/// Cells from `center - 1` down to 0.
pub fn left_direction_cells<T>(cells: &[T], center_axis_index: usize) -> impl Iterator<Item = &T> {
    cells[..center_axis_index.min(cells.len())].iter().rev()
}

/// Cells from `center + 1` up to the end of the row.
pub fn right_direction_cells<T>(cells: &[T], center_axis_index: usize) -> impl Iterator<Item = &T> {
    cells.iter().skip(center_axis_index.saturating_add(1))
}

// Neither helper special-cases wrapping ranges: a wrap range is compared by
// its raw start/end like any other.

/// Range with the lowest `start_index`.
pub fn get_leftmost_colored_range(ranges: &[ColoredRange]) -> Option<&ColoredRange> {
    ranges.iter().reduce(|best, r| if r.start_index < best.start_index { r } else { best })
}

/// Range with the highest `end_index`.
pub fn get_rightmost_colored_range(ranges: &[ColoredRange]) -> Option<&ColoredRange> {
    ranges.iter().reduce(|best, r| if r.end_index > best.end_index { r } else { best })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisSide {
    Left,
    Center,
    Right,
}

pub fn axis_position_relative_to_center(axis_index: usize, center_axis_index: usize) -> AxisSide {
    match axis_index.cmp(&center_axis_index) {
        std::cmp::Ordering::Less => AxisSide::Left,
        std::cmp::Ordering::Equal => AxisSide::Center,
        std::cmp::Ordering::Greater => AxisSide::Right,
    }
}
