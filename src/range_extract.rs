//! Turns one round's cells into continuous colored ranges.
//!
//! Axes form a circle, so a run touching both the last and the first axis is
//! reported once, as a wrapping range (`start_index > end_index`).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::grid::WeavingRow;
use crate::model::{Cell, ColoredRange};

/// Colored ranges of a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRowRanges {
    pub row_index: usize,
    pub colored_ranges: Vec<ColoredRange>,
}

#[derive(Debug, Clone)]
struct Run<'a> {
    start: usize,
    end: usize,
    color: &'a str,
}

/// Extract the colored ranges of a row, merging runs across the wrap point.
///
/// Only the first `min(cells.len(), total_axes)` cells are considered.
/// A row colored entirely in one color yields a single non-wrapping range
/// `0..=total_axes-1` of length `total_axes`.
pub fn extract_colored_ranges(cells: &[Cell], total_axes: usize) -> Vec<ColoredRange> {
    if cells.is_empty() || total_axes == 0 {
        return Vec::new();
    }

    let colored: Vec<(usize, &str)> = cells
        .iter()
        .take(total_axes)
        .enumerate()
        .filter_map(|(i, c)| c.color().map(|color| (i, color)))
        .collect();

    let Some(&(first_index, first_color)) = colored.first() else {
        return Vec::new();
    };

    let mut runs: Vec<Run<'_>> = Vec::new();
    if colored.len() == 1 {
        runs.push(Run {
            start: first_index,
            end: first_index,
            color: first_color,
        });
    } else {
        let mut current = Run {
            start: first_index,
            end: first_index,
            color: first_color,
        };
        for &(index, color) in &colored[1..] {
            let adjacent = index == (current.end + 1) % total_axes;
            if adjacent && color == current.color {
                current.end = index;
            } else {
                runs.push(current);
                current = Run {
                    start: index,
                    end: index,
                    color,
                };
            }
        }
        runs.push(current);

        merge_wrap_around(&mut runs, total_axes);
    }

    let mut ranges: Vec<ColoredRange> = runs
        .into_iter()
        .map(|r| ColoredRange::colored(r.start, r.end, r.color, total_axes))
        .collect();
    ranges.sort_by(|a, b| center_biased_order(a, b, total_axes));

    tracing::trace!(total_axes, ranges = ranges.len(), "extracted colored ranges");
    ranges
}

/// Folds the last run into the first when they meet across the boundary.
fn merge_wrap_around(runs: &mut Vec<Run<'_>>, total_axes: usize) {
    if runs.len() < 2 {
        return;
    }
    let first = &runs[0];
    let last = &runs[runs.len() - 1];

    let touches = (last.end == total_axes - 1 && first.start == 0) || last.end + 1 == first.start;
    if !touches || first.color != last.color {
        return;
    }

    if let Some(last) = runs.pop() {
        runs[0].start = last.start;
    }
}

/// Ranges starting past the midpoint sort after ranges starting before it;
/// otherwise ascending by start.
fn center_biased_order(a: &ColoredRange, b: &ColoredRange, total_axes: usize) -> Ordering {
    let upper = |r: &ColoredRange| 2 * r.start_index > total_axes;
    let lower = |r: &ColoredRange| 2 * r.start_index < total_axes;
    if upper(a) && lower(b) {
        return Ordering::Greater;
    }
    if lower(a) && upper(b) {
        return Ordering::Less;
    }
    a.start_index.cmp(&b.start_index)
}

pub fn extract_row_ranges(row: &WeavingRow, total_axes: usize) -> ExtractedRowRanges {
    ExtractedRowRanges {
        row_index: row.index,
        colored_ranges: extract_colored_ranges(&row.cells, total_axes),
    }
}

pub fn extract_all_row_ranges(rows: &[WeavingRow], total_axes: usize) -> Vec<ExtractedRowRanges> {
    rows.iter().map(|row| extract_row_ranges(row, total_axes)).collect()
}

/// Linear runs of both colored and uncolored cells, no wrap-around.
///
/// Colored runs are split whenever the color changes.
pub fn cells_to_ranges(cells: &[Cell]) -> Vec<ColoredRange> {
    let mut ranges = Vec::new();
    let Some(first) = cells.first() else {
        return ranges;
    };

    let mut start = 0;
    let mut current = first;
    for (i, cell) in cells.iter().enumerate().skip(1) {
        if cell != current {
            ranges.push(linear_range(start, i - 1, current));
            start = i;
            current = cell;
        }
    }
    ranges.push(linear_range(start, cells.len() - 1, current));
    ranges
}

fn linear_range(start: usize, end: usize, cell: &Cell) -> ColoredRange {
    ColoredRange {
        start_index: start,
        end_index: end,
        is_colored: cell.is_colored(),
        color: cell.color().map(str::to_owned),
        length: end - start + 1,
    }
}

/// Colored-only linear runs; the boundary is never crossed.
pub fn extract_colored_ranges_linear(cells: &[Cell]) -> Vec<ColoredRange> {
    cells_to_ranges(cells).into_iter().filter(|r| r.is_colored).collect()
}

pub fn find_range_for_index(ranges: &[ColoredRange], index: usize) -> Option<&ColoredRange> {
    ranges.iter().find(|r| r.contains(index))
}

pub fn ranges_overlap(a: &ColoredRange, b: &ColoredRange, total_axes: usize) -> bool {
    a.indices(total_axes).any(|i| b.contains(i))
}
