//! Transition Rule
//!
//! Conway's rule on a bounded grid. Neighbors outside the board are excluded
//! from the count, never wrapped.
//!
//! Two forms live here:
//! - [`next_state`], the reference evolution used to generate witnesses,
//! - [`check_transition`], the constrained form every proof runs.

use crate::core::board::{Board, Cells, BOARD_SIZE};
use crate::error::ValidationError;

/// Offsets of the eight grid-adjacent cells.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// In-bounds neighbors of (row, col).
fn neighbors(row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < BOARD_SIZE && c < BOARD_SIZE).then_some((r, c))
    })
}

/// Sum of raw neighbor values around (row, col), saturating at `u32::MAX`.
///
/// On a valid board this is the live neighbor count.
pub fn neighbor_sum(board: &Board, row: usize, col: usize) -> u32 {
    neighbors(row, col).fold(0u32, |sum, (r, c)| sum.saturating_add(board.cell(r, c)))
}

/// Number of neighbors holding exactly 1.
fn live_neighbors(board: &Board, row: usize, col: usize) -> u32 {
    neighbors(row, col)
        .filter(|&(r, c)| board.cell(r, c) == 1)
        .count() as u32
}

/// Reference evolution: the board one step later.
///
/// Dead cells with exactly 3 live neighbors are born, live cells with 2 or 3
/// survive, everything else is dead.
pub fn next_state(board: &Board) -> Board {
    let mut next: Cells = [[0; BOARD_SIZE]; BOARD_SIZE];

    for (row, cells) in next.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            let alive = live_neighbors(board, row, col);
            *cell = match (board.cell(row, col), alive) {
                (0, 3) => 1,
                (1, 2) | (1, 3) => 1,
                _ => 0,
            };
        }
    }

    Board::from_cells(next)
}

/// Value the constrained rule prescribes for every cell of the successor.
///
/// A cell counts as dead iff its value is 0. Neighbor sums are compared
/// exactly against 2 and 3.
fn prescribed(from: &Board) -> Cells {
    let mut out: Cells = [[0; BOARD_SIZE]; BOARD_SIZE];

    for (row, cells) in out.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            let sum = neighbor_sum(from, row, col);
            let born_or_kept = if from.cell(row, col) == 0 {
                sum == 3
            } else {
                sum == 2 || sum == 3
            };
            *cell = born_or_kept as u32;
        }
    }

    out
}

/// Assert that `to` is exactly the successor of `from`.
///
/// The whole board is constrained before any comparison is made; the first
/// mismatch in row-major order is reported.
pub fn check_transition(from: &Board, to: &Board) -> Result<(), ValidationError> {
    let expected = prescribed(from);

    for (row, cells) in expected.iter().enumerate() {
        for (col, &value) in cells.iter().enumerate() {
            if to.cell(row, col) != value {
                return Err(ValidationError::IncorrectTransition { row, col });
            }
        }
    }

    Ok(())
}
