//! Game of Life evolution.
//!
//! `rule` holds the transition predicate checked inside every proof;
//! `simulator` produces witness boards outside of it.

pub mod rule;
pub mod simulator;

pub use rule::{check_transition, neighbor_sum, next_state};
pub use simulator::{evolve, find_period, is_still_life, witness_chain, Evolution};
