//! Rollup State
//!
//! The public claim a rollup proof attests: "after `step` evolutions from
//! `initial_state`, the board is `state`".

use serde::{Deserialize, Serialize};

use crate::core::board::Board;
use crate::core::hash::{StateHash, StateHasher};

/// Public input of every rollup proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupState {
    /// Anchor board, immutable along a chain.
    pub initial_state: Board,
    /// Board after `step` evolutions.
    pub state: Board,
    /// Evolutions applied so far.
    pub step: u32,
}

impl RollupState {
    /// Base state for a chain anchored at `board`.
    pub fn genesis(board: Board) -> Self {
        Self {
            initial_state: board,
            state: board,
            step: 0,
        }
    }

    /// The claim one step after this one, ending on `board`.
    pub fn advance(&self, board: Board) -> Self {
        Self {
            initial_state: self.initial_state,
            state: board,
            step: self.step.saturating_add(1),
        }
    }

    /// Does the chain end on its anchor?
    pub fn is_cycle(&self) -> bool {
        self.initial_state == self.state
    }

    /// Digest binding all three fields; the statement a proof seals.
    pub fn statement_digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_statement();
        self.initial_state.hash_into(&mut hasher);
        self.state.hash_into(&mut hasher);
        hasher.update_u32(self.step);
        hasher.finalize()
    }
}
