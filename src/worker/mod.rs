//! Prover Worker
//!
//! Runs chain construction in the background so callers never block on it.
//!
//! - `protocol.rs` - Request/response messages
//! - `prover.rs`   - Worker task, handle and job tracking

pub mod protocol;
pub mod prover;

pub use protocol::{JobId, ProverRequest, ProverResponse};
pub use prover::{Job, ProverHandle, WorkerError};
