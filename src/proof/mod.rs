//! Rollup Proof System
//!
//! Composes per-step transition checks into one certificate whose
//! verification cost does not grow with the number of steps.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  state.rs    - Public claim (anchor, board, step)           │
//! │  backend.rs  - Seal/check seam, accumulator folding         │
//! │  rollup.rs   - Base/Step constructors, verifier, chains     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod rollup;
pub mod state;

// Re-export key types
pub use backend::{Claim, DigestBackend, ProvingBackend, Seal};
pub use rollup::{ProofKind, Rollup, RollupProof};
pub use state::RollupState;
