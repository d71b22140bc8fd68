//! Invariants of the pattern compiler over arbitrary rows.
//!
//! 1. Extraction is deterministic.
//! 2. Ranges cover exactly the colored cells, each once.
//! 3. No two ranges could have been merged.
//! 4. Direction steps alternate kinds and walk every axis on their side.
//! 5. An uncolored row skips everything; center 0 leaves the left side empty.
//! 6. The strip rule never points outside the row.

use std::collections::BTreeSet;

use basket_weave::center_axis::{range_includes_center_axis, split_left_right_directions};
use basket_weave::direction::{
    generate_both_direction_instructions, generate_left_direction_instruction,
};
use basket_weave::range_extract::extract_colored_ranges;
use basket_weave::strip_init::generate_strip_initialization_rule;
use basket_weave::{Cell, ColoredRange, InstructionStep, StripRuleKind};
use proptest::prelude::*;

const PALETTE: [&str; 3] = ["#8B4513", "#D2691E", "#CD853F"];

// ── Helpers ─────────────────────────────────────────────────────────────

fn cells(max_len: usize) -> impl Strategy<Value = Vec<Cell>> {
    proptest::collection::vec(
        prop_oneof![
            2 => Just(Cell::Empty),
            1 => (0..PALETTE.len()).prop_map(|i| Cell::colored(PALETTE[i])),
        ],
        1..=max_len,
    )
}

fn row_and_center(max_len: usize) -> impl Strategy<Value = (Vec<Cell>, usize)> {
    cells(max_len).prop_flat_map(|row| {
        let n = row.len();
        (Just(row), 0..n)
    })
}

fn adjacent(a: &ColoredRange, b: &ColoredRange, n: usize) -> bool {
    (a.end_index + 1) % n == b.start_index || (b.end_index + 1) % n == a.start_index
}

// ── Known cases ─────────────────────────────────────────────────────────

fn range(start: usize, end: usize, total: usize) -> ColoredRange {
    ColoredRange::colored(start, end, PALETTE[0], total)
}

#[test]
fn center_inclusion_examples() {
    let r = range(2, 5, 10);
    assert!(range_includes_center_axis(&r, 3, 10));
    assert!(!range_includes_center_axis(&r, 7, 10));

    let wrap = range(8, 1, 10);
    assert!(range_includes_center_axis(&wrap, 9, 10));
    assert!(!range_includes_center_axis(&wrap, 5, 10));
}

#[test]
fn strip_rule_examples() {
    let inc = generate_strip_initialization_rule(&[range(2, 6, 8)], 4, 8);
    assert_eq!(inc.kind, StripRuleKind::IncludesCenter);
    assert_eq!((inc.insert_index, inc.exit_index), (2, 6));

    let exc = generate_strip_initialization_rule(&[range(1, 2, 10), range(7, 8, 10)], 5, 10);
    assert_eq!(exc.kind, StripRuleKind::ExcludesCenter);
    assert_eq!(exc.exit_index, 2);
    assert_eq!(exc.re_enter_index, Some(7));
}

#[test]
fn right_side_run_lengths() {
    let c = Cell::colored(PALETTE[0]);
    let row = vec![Cell::Empty, c.clone(), c.clone(), Cell::Empty, c];
    let both = generate_both_direction_instructions(&row, 0);
    assert_eq!(
        both.right_instruction.steps,
        vec![InstructionStep::cover(2), InstructionStep::skip(1), InstructionStep::cover(1)]
    );
}

#[test]
fn uncolored_row_has_no_ranges_and_a_noop_rule() {
    let row = vec![Cell::Empty; 7];
    let ranges = extract_colored_ranges(&row, 7);
    assert!(ranges.is_empty());
    let rule = generate_strip_initialization_rule(&ranges, 3, 7);
    assert_eq!(rule.kind, StripRuleKind::ExcludesCenter);
    assert_eq!(rule.re_enter_index, None);
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn extraction_is_deterministic(row in cells(40)) {
        let n = row.len();
        prop_assert_eq!(extract_colored_ranges(&row, n), extract_colored_ranges(&row, n));
    }

    #[test]
    fn ranges_cover_exactly_the_colored_cells(row in cells(40)) {
        let n = row.len();
        let ranges = extract_colored_ranges(&row, n);

        let mut seen = BTreeSet::new();
        for r in &ranges {
            let indices: Vec<usize> = r.indices(n).collect();
            prop_assert_eq!(indices.len(), r.length);
            for i in indices {
                prop_assert!(seen.insert(i), "index {} covered twice", i);
                prop_assert_eq!(row[i].color(), r.color.as_deref());
            }
        }

        let colored: BTreeSet<usize> = (0..n).filter(|&i| row[i].is_colored()).collect();
        prop_assert_eq!(seen, colored);
    }

    #[test]
    fn ranges_are_maximal(row in cells(40)) {
        let n = row.len();
        let ranges = extract_colored_ranges(&row, n);
        for (i, a) in ranges.iter().enumerate() {
            for b in ranges.iter().skip(i + 1) {
                prop_assert!(
                    !(adjacent(a, b, n) && a.color == b.color),
                    "mergeable ranges {:?} and {:?}", a, b
                );
            }
        }
    }

    #[test]
    fn steps_alternate_and_cover_each_side((row, center) in row_and_center(40)) {
        let split = split_left_right_directions(center, row.len());
        let both = generate_both_direction_instructions(&row, center);

        for (instruction, side) in [
            (&both.left_instruction, &split.left_indices),
            (&both.right_instruction, &split.right_indices),
        ] {
            prop_assert_eq!(instruction.len(), side.len());
            prop_assert!(instruction.steps.iter().all(|s| s.count >= 1));
            prop_assert!(instruction.steps.windows(2).all(|w| w[0].kind != w[1].kind));
            let colored_on_side = side.iter().filter(|&&i| row[i].is_colored()).count();
            prop_assert_eq!(instruction.covered_axes(), colored_on_side);
        }
    }

    #[test]
    fn uncolored_rows_skip_everything(
        (n, center) in (1usize..40).prop_flat_map(|n| (Just(n), 0..n))
    ) {
        let row = vec![Cell::Empty; n];
        let both = generate_both_direction_instructions(&row, center);
        let expect = |count: usize| {
            if count == 0 { vec![] } else { vec![InstructionStep::skip(count)] }
        };
        prop_assert_eq!(both.left_instruction.steps, expect(center));
        prop_assert_eq!(both.right_instruction.steps, expect(n - center - 1));
    }

    #[test]
    fn center_zero_has_empty_left_side(row in cells(40)) {
        let left = generate_left_direction_instruction(&row, 0);
        prop_assert!(left.steps.is_empty());
        prop_assert_eq!(left.formatted_text.as_deref(), Some("none"));
    }

    #[test]
    fn strip_rule_stays_inside_the_row((row, center) in row_and_center(40)) {
        let n = row.len();
        let ranges = extract_colored_ranges(&row, n);
        let rule = generate_strip_initialization_rule(&ranges, center, n);
        if ranges.is_empty() {
            prop_assert_eq!(rule.kind, StripRuleKind::ExcludesCenter);
        } else {
            prop_assert!(rule.is_valid(n), "invalid rule {:?}", rule);
            let holds_center = row[center].is_colored();
            prop_assert_eq!(rule.kind == StripRuleKind::IncludesCenter, holds_center);
        }
    }
}
