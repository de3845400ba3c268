//! Submission Gate
//!
//! Acceptance of still and repeater solutions over a versioned record.
//!
//! - `record.rs`     - Versioned acceptance commitment
//! - `submission.rs` - The two acceptance paths (pure, record threaded through)
//! - `ledger.rs`     - Single-writer owner of the record, persistence

pub mod ledger;
pub mod record;
pub mod submission;

pub use ledger::{FileStore, GateError, Ledger, MemoryStore, RecordStore};
pub use record::{AcceptanceRecord, SolutionKind};
pub use submission::{Acceptance, Receipt, Submission, SubmissionGate, MIN_REPEATER_STEPS};
