//! Pattern grid state and the weaving session that walks it round by round.
//!
//! The compiler modules are stateless; this is the one place that owns a
//! pattern and mutates it. Every action bounds-checks its coordinates.

use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::center_axis::{calculate_center_axis_index, is_valid_center_axis_index};
use crate::config::WeaveConfig;
use crate::direction::{
    generate_complete_row_instructions, generate_left_direction_instruction,
    generate_right_direction_instruction,
};
use crate::model::{
    AxisConfig, Cell, CellState, ColoredRange, RowStatus, StripInitializationRule,
    WeavingInstruction,
};
use crate::range_extract::{
    ExtractedRowRanges, cells_to_ranges, extract_all_row_ranges, extract_row_ranges,
};
use crate::strip_init::{
    RowStripRule, generate_all_strip_initialization_rules, strip_rule_from_config,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("row {row} out of range (pattern has {total} rows)")]
    RowOutOfRange { row: usize, total: usize },

    #[error("axis {axis} out of range (pattern has {total} axes)")]
    AxisOutOfRange { axis: usize, total: usize },

    #[error("axis count must be at least 1")]
    NoAxes,

    #[error("invalid color {0:?}: expected a hex code like #8B4513")]
    InvalidColor(String),

    #[error("no colors available")]
    NoColors,
}

/// One round of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeavingRow {
    pub index: usize,
    pub cells: Vec<Cell>,
    pub status: RowStatus,
    /// Linear colored and uncolored runs, refreshed after every cell edit.
    pub ranges: Vec<ColoredRange>,
}

impl WeavingRow {
    pub fn empty(index: usize, axis_count: usize) -> Self {
        let cells = vec![Cell::Empty; axis_count];
        let ranges = cells_to_ranges(&cells);
        Self {
            index,
            cells,
            status: RowStatus::NotStarted,
            ranges,
        }
    }

    pub fn from_cells(index: usize, cells: Vec<Cell>) -> Self {
        let ranges = cells_to_ranges(&cells);
        Self {
            index,
            cells,
            status: RowStatus::NotStarted,
            ranges,
        }
    }

    pub fn cell_states(&self) -> impl Iterator<Item = CellState> + '_ {
        self.cells.iter().enumerate().map(|(axis_index, cell)| CellState {
            cell: cell.clone(),
            axis_index,
            row_index: self.index,
        })
    }

    fn refresh_ranges(&mut self) {
        self.ranges = cells_to_ranges(&self.cells);
    }
}

/// Full instruction set for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWeavingInstructions {
    pub row_index: usize,
    pub initialization: StripInitializationRule,
    pub left_instruction: WeavingInstruction,
    pub right_instruction: WeavingInstruction,
    pub full_instruction_text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub reworked: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternGrid {
    pub axis_config: AxisConfig,
    pub total_rows: usize,
    pub rows: Vec<WeavingRow>,
    pub available_colors: Vec<String>,
    /// Advisory only; edits after confirmation are still accepted.
    pub is_confirmed: bool,
    #[serde(default)]
    center_pinned: bool,
}

impl Default for PatternGrid {
    fn default() -> Self {
        Self::new(&WeaveConfig::default())
    }
}

impl PatternGrid {
    pub fn new(config: &WeaveConfig) -> Self {
        let axis_config = config.axis_config();
        let rows = (0..config.total_rows)
            .map(|i| WeavingRow::empty(i, axis_config.count))
            .collect();
        Self {
            axis_config,
            total_rows: config.total_rows,
            rows,
            available_colors: config.available_colors.clone(),
            is_confirmed: false,
            center_pinned: config.center_axis_index.is_some(),
        }
    }

    pub fn axis_count(&self) -> usize {
        self.axis_config.count
    }

    pub fn center_axis_index(&self) -> usize {
        self.axis_config.center_axis_index
    }

    pub fn row(&self, row: usize) -> Result<&WeavingRow, GridError> {
        self.rows.get(row).ok_or(GridError::RowOutOfRange {
            row,
            total: self.rows.len(),
        })
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut WeavingRow, GridError> {
        let total = self.rows.len();
        self.rows.get_mut(row).ok_or(GridError::RowOutOfRange { row, total })
    }

    fn check_axis(&self, axis: usize) -> Result<(), GridError> {
        if axis < self.axis_config.count {
            Ok(())
        } else {
            Err(GridError::AxisOutOfRange {
                axis,
                total: self.axis_config.count,
            })
        }
    }

    /// `color` if given, otherwise the first available color.
    fn fill_color(&self, color: Option<&str>) -> Result<String, GridError> {
        match color {
            Some(c) => Ok(c.to_owned()),
            None => self.available_colors.first().cloned().ok_or(GridError::NoColors),
        }
    }

    /// Resizes every row, truncating or padding with empty cells.
    ///
    /// A manually chosen center survives while it stays in range; otherwise
    /// the center moves to `floor(count / 2)`.
    pub fn set_axis_count(&mut self, count: usize) -> Result<(), GridError> {
        if count == 0 {
            return Err(GridError::NoAxes);
        }
        let keep = self.center_pinned
            && is_valid_center_axis_index(self.axis_config.center_axis_index, count);
        self.axis_config = AxisConfig {
            count,
            center_axis_index: if keep {
                self.axis_config.center_axis_index
            } else {
                calculate_center_axis_index(count)
            },
            evenly_spaced: self.axis_config.evenly_spaced,
        };
        self.center_pinned = keep;

        for row in &mut self.rows {
            row.cells.resize(count, Cell::Empty);
            row.refresh_ranges();
        }
        tracing::debug!(count, center = self.axis_config.center_axis_index, "axis count changed");
        Ok(())
    }

    pub fn set_center_axis_index(&mut self, index: usize) -> Result<(), GridError> {
        self.check_axis(index)?;
        self.axis_config.center_axis_index = index;
        self.center_pinned = true;
        tracing::debug!(center = index, "center axis set");
        Ok(())
    }

    pub fn set_total_rows(&mut self, total_rows: usize) {
        let count = self.axis_config.count;
        self.rows.truncate(total_rows);
        let existing = self.rows.len();
        self.rows.extend((existing..total_rows).map(|i| WeavingRow::empty(i, count)));
        self.total_rows = total_rows;
        tracing::debug!(total_rows, "row count changed");
    }

    pub fn set_available_colors(&mut self, colors: Vec<String>) -> Result<(), GridError> {
        for color in &colors {
            validate_color(color)?;
        }
        self.available_colors = colors;
        Ok(())
    }

    /// Clears a colored cell, or colors an empty one with `color` (first
    /// available color when `None`).
    pub fn toggle_cell(
        &mut self,
        row: usize,
        axis: usize,
        color: Option<&str>,
    ) -> Result<(), GridError> {
        self.check_axis(axis)?;
        if let Some(c) = color {
            validate_color(c)?;
        }
        let colored = self
            .row(row)?
            .cells
            .get(axis)
            .is_some_and(Cell::is_colored);
        let next = if colored {
            Cell::Empty
        } else {
            Cell::Colored {
                color: self.fill_color(color)?,
            }
        };
        let total = self.axis_config.count;
        let r = self.row_mut(row)?;
        let cell = r.cells.get_mut(axis).ok_or(GridError::AxisOutOfRange { axis, total })?;
        *cell = next;
        r.refresh_ranges();
        tracing::trace!(row, axis, "cell toggled");
        Ok(())
    }

    /// Recolors a colored cell. Empty cells are left untouched.
    pub fn set_cell_color(
        &mut self,
        row: usize,
        axis: usize,
        color: &str,
    ) -> Result<(), GridError> {
        self.check_axis(axis)?;
        validate_color(color)?;
        let total = self.axis_config.count;
        let r = self.row_mut(row)?;
        let cell = r.cells.get_mut(axis).ok_or(GridError::AxisOutOfRange { axis, total })?;
        if let Cell::Colored { color: current } = cell {
            *current = color.to_owned();
            r.refresh_ranges();
        }
        Ok(())
    }

    /// Toggles every cell between the two axes, inclusive, in either order.
    /// Axes past the end of the row are skipped.
    pub fn toggle_cells_in_range(
        &mut self,
        row: usize,
        start_axis: usize,
        end_axis: usize,
        color: Option<&str>,
    ) -> Result<(), GridError> {
        if let Some(c) = color {
            validate_color(c)?;
        }
        let (lo, hi) = (start_axis.min(end_axis), start_axis.max(end_axis));
        let span = hi.saturating_add(1);
        let needs_fill = self
            .row(row)?
            .cells
            .iter()
            .take(span)
            .skip(lo)
            .any(|c| !c.is_colored());
        let fill = if needs_fill {
            Some(self.fill_color(color)?)
        } else {
            None
        };

        let r = self.row_mut(row)?;
        for cell in r.cells.iter_mut().take(span).skip(lo) {
            *cell = match (cell.is_colored(), &fill) {
                (false, Some(fill)) => Cell::Colored { color: fill.clone() },
                _ => Cell::Empty,
            };
        }
        r.refresh_ranges();
        Ok(())
    }

    pub fn update_row_status(&mut self, row: usize, status: RowStatus) -> Result<(), GridError> {
        self.row_mut(row)?.status = status;
        tracing::debug!(row, ?status, "row status");
        Ok(())
    }

    /// Clears every cell and status, keeping axes, row count and colors.
    pub fn reset(&mut self) {
        let count = self.axis_config.count;
        self.rows = (0..self.total_rows).map(|i| WeavingRow::empty(i, count)).collect();
        self.is_confirmed = false;
    }

    pub fn confirm(&mut self) {
        self.is_confirmed = true;
    }

    pub fn row_ranges(&self, row: usize) -> Result<ExtractedRowRanges, GridError> {
        Ok(extract_row_ranges(self.row(row)?, self.axis_config.count))
    }

    pub fn all_row_ranges(&self) -> Vec<ExtractedRowRanges> {
        extract_all_row_ranges(&self.rows, self.axis_config.count)
    }

    pub fn strip_rule(&self, row: usize) -> Result<StripInitializationRule, GridError> {
        let extracted = self.row_ranges(row)?;
        Ok(strip_rule_from_config(&extracted.colored_ranges, &self.axis_config))
    }

    pub fn all_strip_rules(&self) -> Vec<RowStripRule> {
        generate_all_strip_initialization_rules(
            &self.all_row_ranges(),
            self.axis_config.center_axis_index,
            self.axis_config.count,
        )
    }

    pub fn left_instruction(&self, row: usize) -> Result<WeavingInstruction, GridError> {
        Ok(generate_left_direction_instruction(
            &self.row(row)?.cells,
            self.axis_config.center_axis_index,
        ))
    }

    pub fn right_instruction(&self, row: usize) -> Result<WeavingInstruction, GridError> {
        Ok(generate_right_direction_instruction(
            &self.row(row)?.cells,
            self.axis_config.center_axis_index,
        ))
    }

    pub fn row_instructions(&self, row: usize) -> Result<RowWeavingInstructions, GridError> {
        let initialization = self.strip_rule(row)?;
        let cells = &self.row(row)?.cells;
        let complete = generate_complete_row_instructions(
            cells,
            self.axis_config.center_axis_index,
            &initialization,
        );
        Ok(RowWeavingInstructions {
            row_index: row,
            initialization,
            left_instruction: complete.left_instruction,
            right_instruction: complete.right_instruction,
            full_instruction_text: complete.full_text,
        })
    }

    pub fn all_row_instructions(&self) -> Vec<RowWeavingInstructions> {
        (0..self.rows.len())
            .filter_map(|i| self.row_instructions(i).ok())
            .collect()
    }

    pub fn progress(&self) -> Progress {
        self.rows.iter().fold(Progress::default(), |mut p, row| {
            match row.status {
                RowStatus::NotStarted => p.not_started += 1,
                RowStatus::InProgress => p.in_progress += 1,
                RowStatus::Completed => p.completed += 1,
                RowStatus::Reworked => p.reworked += 1,
            }
            p
        })
    }
}

pub(crate) fn validate_color(color: &str) -> Result<(), GridError> {
    Srgb::<u8>::from_str(color)
        .map(|_| ())
        .map_err(|_| GridError::InvalidColor(color.to_owned()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppMode {
    #[default]
    Design,
    Confirm,
    Weave,
}

/// A pattern plus the round currently being woven.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeavingSession {
    pub grid: PatternGrid,
    pub mode: AppMode,
    pub current_row: Option<usize>,
}

impl WeavingSession {
    pub fn new(grid: PatternGrid) -> Self {
        Self {
            grid,
            mode: AppMode::Design,
            current_row: None,
        }
    }

    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    pub fn set_current_row(&mut self, row: Option<usize>) -> Result<(), GridError> {
        if let Some(r) = row {
            self.grid.row(r)?;
        }
        self.current_row = row;
        Ok(())
    }

    /// Confirms the pattern and moves to the lowest round not yet completed.
    pub fn start_weaving(&mut self) -> Result<Option<usize>, GridError> {
        self.grid.confirm();
        self.mode = AppMode::Weave;
        self.current_row = None;
        self.select_next_from(0)
    }

    /// Marks the current round completed and selects the next open one.
    /// Returns the newly selected round, `None` once every round is done.
    pub fn complete_current_row(&mut self) -> Result<Option<usize>, GridError> {
        let Some(row) = self.current_row else {
            return Ok(None);
        };
        self.grid.update_row_status(row, RowStatus::Completed)?;
        self.select_next_from(row + 1)
    }

    /// Sends a round back for rework and makes it current.
    pub fn rework_row(&mut self, row: usize) -> Result<(), GridError> {
        self.grid.update_row_status(row, RowStatus::Reworked)?;
        self.current_row = Some(row);
        Ok(())
    }

    pub fn current_instructions(&self) -> Option<RowWeavingInstructions> {
        self.current_row.and_then(|r| self.grid.row_instructions(r).ok())
    }

    fn select_next_from(&mut self, from: usize) -> Result<Option<usize>, GridError> {
        let total = self.grid.rows.len();
        let next = (from..total)
            .chain(0..from.min(total))
            .find(|&i| self.grid.rows[i].status != RowStatus::Completed);
        self.current_row = next;
        if let Some(i) = next {
            self.grid.update_row_status(i, RowStatus::InProgress)?;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> PatternGrid {
        PatternGrid::new(&WeaveConfig {
            axis_count: 8,
            center_axis_index: None,
            total_rows: 3,
            ..WeaveConfig::default()
        })
    }

    #[test]
    fn new_grid_is_empty_with_auto_center() {
        let grid = small_grid();
        assert_eq!(grid.center_axis_index(), 4);
        assert_eq!(grid.rows.len(), 3);
        assert!(grid.rows.iter().all(|r| r.cells.len() == 8));
        assert_eq!(grid.rows[0].ranges.len(), 1);
        assert!(!grid.rows[0].ranges[0].is_colored);
    }

    #[test]
    fn toggle_uses_first_color_and_refreshes_ranges() {
        let mut grid = small_grid();
        grid.toggle_cell(0, 2, None).expect("toggle");
        let first = grid.available_colors[0].clone();
        assert_eq!(grid.rows[0].cells[2].color(), Some(first.as_str()));
        assert_eq!(grid.rows[0].ranges.len(), 3);

        grid.toggle_cell(0, 2, None).expect("toggle back");
        assert_eq!(grid.rows[0].cells[2], Cell::Empty);
        assert_eq!(grid.rows[0].ranges.len(), 1);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut grid = small_grid();
        assert_eq!(
            grid.toggle_cell(5, 0, None),
            Err(GridError::RowOutOfRange { row: 5, total: 3 })
        );
        assert_eq!(
            grid.toggle_cell(0, 8, None),
            Err(GridError::AxisOutOfRange { axis: 8, total: 8 })
        );
        assert_eq!(grid.set_axis_count(0), Err(GridError::NoAxes));
    }

    #[test]
    fn set_cell_color_ignores_empty_cells() {
        let mut grid = small_grid();
        grid.set_cell_color(0, 1, "#CD853F").expect("recolor empty");
        assert_eq!(grid.rows[0].cells[1], Cell::Empty);

        grid.toggle_cell(0, 1, Some("#8B4513")).expect("toggle");
        grid.set_cell_color(0, 1, "#CD853F").expect("recolor");
        assert_eq!(grid.rows[0].cells[1].color(), Some("#CD853F"));
    }

    #[test]
    fn range_toggle_accepts_reversed_bounds() {
        let mut grid = small_grid();
        grid.toggle_cells_in_range(1, 5, 2, Some("#A0522D")).expect("range");
        let colored: Vec<bool> = grid.rows[1].cells.iter().map(Cell::is_colored).collect();
        assert_eq!(colored, vec![false, false, true, true, true, true, false, false]);
    }

    #[test]
    fn resizing_keeps_cells_and_recenters() {
        let mut grid = small_grid();
        grid.toggle_cell(0, 1, None).expect("toggle");
        grid.toggle_cell(0, 7, None).expect("toggle");

        grid.set_axis_count(6).expect("shrink");
        assert_eq!(grid.center_axis_index(), 3);
        assert_eq!(grid.rows[0].cells.len(), 6);
        assert!(grid.rows[0].cells[1].is_colored());

        grid.set_axis_count(10).expect("grow");
        assert_eq!(grid.center_axis_index(), 5);
        assert!(!grid.rows[0].cells[7].is_colored());
    }

    #[test]
    fn manual_center_survives_resize_while_valid() {
        let mut grid = small_grid();
        grid.set_center_axis_index(2).expect("center");
        grid.set_axis_count(12).expect("grow");
        assert_eq!(grid.center_axis_index(), 2);
        grid.set_axis_count(2).expect("shrink");
        assert_eq!(grid.center_axis_index(), 1);
        grid.set_axis_count(12).expect("grow again");
        assert_eq!(grid.center_axis_index(), 6);
    }

    #[test]
    fn row_count_changes_keep_existing_rows() {
        let mut grid = small_grid();
        grid.toggle_cell(1, 0, None).expect("toggle");
        grid.set_total_rows(5);
        assert_eq!(grid.rows.len(), 5);
        assert_eq!(grid.rows[4].index, 4);
        assert!(grid.rows[1].cells[0].is_colored());
        grid.set_total_rows(1);
        assert_eq!(grid.total_rows, 1);
        assert_eq!(grid.rows.len(), 1);
    }

    #[test]
    fn colors_must_be_hex() {
        let mut grid = small_grid();
        assert!(grid.set_available_colors(vec!["#112233".into(), "abc".into()]).is_ok());
        assert_eq!(
            grid.set_available_colors(vec!["brown".into()]),
            Err(GridError::InvalidColor("brown".into()))
        );
        assert_eq!(grid.available_colors.len(), 2);
    }

    #[test]
    fn empty_palette_cannot_fill_cells() {
        let mut grid = small_grid();
        grid.set_available_colors(Vec::new()).expect("clear");
        assert_eq!(grid.toggle_cell(0, 0, None), Err(GridError::NoColors));
        assert!(grid.toggle_cell(0, 0, Some("#000000")).is_ok());
    }

    #[test]
    fn empty_palette_still_clears_colored_cells() {
        let mut grid = small_grid();
        grid.toggle_cell(0, 1, None).expect("color");
        grid.toggle_cells_in_range(0, 3, 4, None).expect("color range");
        grid.set_available_colors(Vec::new()).expect("clear");

        grid.toggle_cell(0, 1, None).expect("clear cell");
        assert_eq!(grid.rows[0].cells[1], Cell::Empty);

        grid.toggle_cells_in_range(0, 3, 4, None).expect("clear range");
        assert!(grid.rows[0].cells.iter().all(|c| !c.is_colored()));

        assert_eq!(
            grid.toggle_cells_in_range(0, 3, 4, None),
            Err(GridError::NoColors)
        );
        assert!(grid.rows[0].cells.iter().all(|c| !c.is_colored()));
    }

    #[test]
    fn cell_edits_reject_non_hex_colors() {
        let mut grid = small_grid();
        let bad = || GridError::InvalidColor("not a color".into());
        assert_eq!(grid.toggle_cell(0, 1, Some("not a color")), Err(bad()));
        assert_eq!(
            grid.toggle_cells_in_range(0, 0, 2, Some("not a color")),
            Err(bad())
        );
        assert!(grid.rows[0].cells.iter().all(|c| !c.is_colored()));

        grid.toggle_cell(0, 1, None).expect("toggle");
        assert_eq!(grid.set_cell_color(0, 1, "not a color"), Err(bad()));
        assert_eq!(
            grid.rows[0].cells[1].color(),
            Some(grid.available_colors[0].as_str())
        );
    }

    #[test]
    fn cell_states_carry_coordinates() {
        let mut grid = small_grid();
        grid.toggle_cell(2, 5, None).expect("toggle");
        let states: Vec<CellState> = grid.rows[2].cell_states().collect();
        assert_eq!(states.len(), 8);
        assert!(states.iter().all(|s| s.row_index == 2));
        assert_eq!(states[5].axis_index, 5);
        assert!(states[5].cell.is_colored());
        assert!(!states[4].cell.is_colored());
    }

    #[test]
    fn reset_clears_cells_but_keeps_shape() {
        let mut grid = small_grid();
        grid.toggle_cell(0, 3, None).expect("toggle");
        grid.update_row_status(0, RowStatus::Completed).expect("status");
        grid.confirm();
        grid.reset();
        assert!(!grid.is_confirmed);
        assert_eq!(grid.rows.len(), 3);
        assert_eq!(grid.progress().not_started, 3);
        assert!(!grid.rows[0].cells[3].is_colored());
    }

    #[test]
    fn session_walks_rounds_in_order() {
        let mut session = WeavingSession::new(small_grid());
        assert_eq!(session.start_weaving(), Ok(Some(0)));
        assert!(session.grid.is_confirmed);
        assert_eq!(session.mode, AppMode::Weave);
        assert_eq!(session.grid.rows[0].status, RowStatus::InProgress);

        assert_eq!(session.complete_current_row(), Ok(Some(1)));
        assert_eq!(session.complete_current_row(), Ok(Some(2)));
        assert_eq!(session.complete_current_row(), Ok(None));
        assert_eq!(session.grid.progress().completed, 3);

        session.rework_row(1).expect("rework");
        assert_eq!(session.current_row, Some(1));
        assert_eq!(session.grid.rows[1].status, RowStatus::Reworked);
        assert!(session.current_instructions().is_some());
    }

    #[test]
    fn session_rejects_unknown_row() {
        let mut session = WeavingSession::new(small_grid());
        assert!(session.set_current_row(Some(9)).is_err());
        assert!(session.set_current_row(Some(2)).is_ok());
        assert!(session.set_current_row(None).is_ok());
    }
}
