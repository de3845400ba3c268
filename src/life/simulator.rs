//! Evolution Simulator
//!
//! Off-circuit witness generation. Nothing here is verified; it only produces
//! the boards a prover feeds to the rollup.

use crate::core::board::Board;
use crate::life::rule::next_state;

/// Lazy, deterministic sequence of successive boards.
///
/// The first item is the board after one step. The sequence is infinite;
/// callers bound it with `take`. Clone or [`Evolution::restart`] to replay.
#[derive(Clone, Debug)]
pub struct Evolution {
    seed: Board,
    current: Board,
    steps: u32,
}

impl Evolution {
    /// Start evolving from `board`.
    pub fn new(board: Board) -> Self {
        Self {
            seed: board,
            current: board,
            steps: 0,
        }
    }

    /// Rewind to the starting board.
    pub fn restart(&mut self) {
        self.current = self.seed;
        self.steps = 0;
    }

    /// Board the sequence started from.
    pub fn seed(&self) -> &Board {
        &self.seed
    }

    /// Steps yielded so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }
}

impl Iterator for Evolution {
    type Item = Board;

    fn next(&mut self) -> Option<Board> {
        self.current = next_state(&self.current);
        self.steps += 1;
        Some(self.current)
    }
}

/// Board after `steps` evolutions.
pub fn evolve(board: &Board, steps: u32) -> Board {
    Evolution::new(*board)
        .take(steps as usize)
        .last()
        .unwrap_or(*board)
}

/// The `steps + 1` boards a chain of `steps` evolutions needs, starting with
/// `board` itself.
pub fn witness_chain(board: &Board, steps: u32) -> Vec<Board> {
    std::iter::once(*board)
        .chain(Evolution::new(*board).take(steps as usize))
        .collect()
}

/// Is `board` a fixed point of the rule?
pub fn is_still_life(board: &Board) -> bool {
    next_state(board) == *board
}

/// Smallest `k` in `1..=max_steps` with `evolve(board, k) == board`.
///
/// Returns `None` when the evolution settles into a still life other than
/// `board`, or when `max_steps` runs out first.
pub fn find_period(board: &Board, max_steps: u32) -> Option<u32> {
    let mut previous = *board;
    for (current, k) in Evolution::new(*board).zip(1..=max_steps) {
        if current == *board {
            return Some(k);
        }
        if current == previous {
            return None;
        }
        previous = current;
    }
    None
}
