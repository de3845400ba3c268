//! # Life Rollup
//!
//! Verifiable Game of Life evolution on an 8×8 board, with a gate that
//! accepts still lifes and proved repeaters.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        LIFE ROLLUP                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── board.rs    - 8×8 board codec and validation            │
//! │  └── hash.rs     - Domain-separated SHA-256 digests          │
//! │                                                              │
//! │  life/           - Conway rules (deterministic)              │
//! │  ├── rule.rs     - Neighbor sums, transition check           │
//! │  └── simulator.rs- Witness generation, period search         │
//! │                                                              │
//! │  proof/          - Recursive rollup                          │
//! │  ├── state.rs    - Public rollup state                       │
//! │  ├── backend.rs  - Proving backend seam                      │
//! │  └── rollup.rs   - init / step / verify                      │
//! │                                                              │
//! │  gate/           - Acceptance                                │
//! │  ├── record.rs   - Versioned acceptance record               │
//! │  ├── submission.rs- Still and repeater paths                 │
//! │  └── ledger.rs   - Single-writer record owner                │
//! │                                                              │
//! │  worker/         - Background proving (non-deterministic)    │
//! │  ├── protocol.rs - Request/response messages                 │
//! │  └── prover.rs   - Worker task and handle                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! `core/`, `life/` and `proof/` are pure: the same board and program seed
//! always yield the same successors, digests and proofs. Wall-clock time
//! only appears in gate receipts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod gate;
pub mod life;
pub mod proof;
pub mod worker;

// Re-export commonly used types
pub use crate::core::board::{Board, BOARD_SIZE};
pub use crate::core::hash::StateHash;
pub use config::LifeConfig;
pub use error::{FormatError, LifeError, ProofError, Result, ValidationError};
pub use gate::{AcceptanceRecord, Ledger, Submission, SubmissionGate};
pub use proof::{Rollup, RollupProof, RollupState};
pub use worker::{ProverHandle, WorkerError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
