//! Core board primitives.
//!
//! The board value type and the deterministic digests that bind proofs to
//! boards. Everything downstream (rule, rollup, gate) builds on these.

pub mod board;
pub mod hash;

// Re-export core types
pub use board::{Board, Cells, BOARD_SIZE};
pub use hash::{hash_chain, short_hex, StateHash, StateHasher, ZERO_HASH};
