//! Plain-text patterns: one line per round, one character per axis.
//!
//! Line 0 is round 0 (the bottom of the basket). `.`, `-` and space are
//! empty cells; `1`..`9` pick `available_colors[d - 1]`.

use crate::config::WeaveConfig;
use crate::grid::{PatternGrid, WeavingRow};
use crate::model::Cell;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternTextError {
    #[error("line {line}, column {column}: unexpected character {ch:?}")]
    InvalidCell { line: usize, column: usize, ch: char },

    #[error("line {line}, column {column}: no color number {digit} in the palette")]
    UnknownColor { line: usize, column: usize, digit: u32 },

    #[error("line {line} has {width} cells but the pattern has {axes} axes")]
    TooWide { line: usize, width: usize, axes: usize },
}

/// Parses a text pattern into a fresh grid shaped by `config`.
///
/// Short lines are padded with empty cells. The row count is the number of
/// lines after trailing blank lines are dropped.
pub fn parse_pattern_text(
    text: &str,
    config: &WeaveConfig,
) -> Result<PatternGrid, PatternTextError> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let axes = config.axis_count;
    let mut rows = Vec::with_capacity(lines.len());
    for (li, line) in lines.iter().enumerate() {
        let mut cells = line
            .chars()
            .enumerate()
            .map(|(ci, ch)| cell_from_char(ch, &config.available_colors, li + 1, ci + 1))
            .collect::<Result<Vec<Cell>, _>>()?;
        if cells.len() > axes {
            return Err(PatternTextError::TooWide {
                line: li + 1,
                width: cells.len(),
                axes,
            });
        }
        cells.resize(axes, Cell::Empty);
        rows.push(WeavingRow::from_cells(li, cells));
    }

    let mut grid = PatternGrid::new(&WeaveConfig {
        total_rows: 0,
        ..config.clone()
    });
    grid.total_rows = rows.len();
    grid.rows = rows;
    tracing::debug!(rows = grid.total_rows, axes, "parsed text pattern");
    Ok(grid)
}

fn cell_from_char(
    ch: char,
    colors: &[String],
    line: usize,
    column: usize,
) -> Result<Cell, PatternTextError> {
    match ch {
        '.' | '-' | ' ' => Ok(Cell::Empty),
        '1'..='9' => {
            let digit = ch as u32 - '0' as u32;
            colors
                .get(digit as usize - 1)
                .map(|c| Cell::colored(c.clone()))
                .ok_or(PatternTextError::UnknownColor { line, column, digit })
        }
        _ => Err(PatternTextError::InvalidCell { line, column, ch }),
    }
}

/// Writes a grid back out in the same format.
///
/// Colors missing from the palette are written as `?`, so the output only
/// parses back when every cell uses a palette color.
pub fn render_pattern_text(grid: &PatternGrid) -> String {
    let mut out = String::new();
    for (ri, row) in grid.rows.iter().enumerate() {
        for cell in &row.cells {
            out.push(match cell.color() {
                None => '.',
                Some(color) => grid
                    .available_colors
                    .iter()
                    .position(|c| c == color)
                    .filter(|&i| i < 9)
                    .and_then(|i| char::from_digit(i as u32 + 1, 10))
                    .unwrap_or('?'),
            });
        }
        if ri + 1 < grid.rows.len() {
            out.push('\n');
        }
    }
    out
}
