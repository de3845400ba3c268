//! Submission Gate
//!
//! The two acceptance paths. The gate holds no record of its own: callers
//! thread the current [`AcceptanceRecord`] through and receive the next one
//! on success. Every call re-runs every check; nothing is deduplicated.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::board::Board;
use crate::core::hash::{short_hex, StateHash};
use crate::error::{LifeError, Result, ValidationError};
use crate::gate::record::{AcceptanceRecord, SolutionKind};
use crate::life::rule::check_transition;
use crate::proof::backend::{DigestBackend, ProvingBackend};
use crate::proof::rollup::{Rollup, RollupProof};
use crate::proof::state::RollupState;

/// Shortest cycle accepted as a repeater. A one-step return is a still life.
pub const MIN_REPEATER_STEPS: u32 = 2;

/// A solution ready to be submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    /// Board claimed to be a fixed point.
    Still(Board),
    /// Chain proof claimed to return to its anchor.
    Repeater(RollupProof),
}

impl Submission {
    /// Solution class this submission targets.
    pub fn kind(&self) -> SolutionKind {
        match self {
            Self::Still(_) => SolutionKind::Still,
            Self::Repeater(_) => SolutionKind::Repeater,
        }
    }
}

/// Proof of acceptance handed back to the submitter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Accepted solution class.
    pub kind: SolutionKind,
    /// Digest of what was accepted (board digest or rollup statement).
    pub statement: StateHash,
    /// Record version this acceptance produced.
    pub version: u64,
    /// Wall-clock time of acceptance.
    pub accepted_at: DateTime<Utc>,
}

/// Outcome of a successful submission.
#[derive(Clone, Debug)]
pub struct Acceptance {
    /// Record to persist in place of the one passed in.
    pub record: AcceptanceRecord,
    /// Receipt for the submitter.
    pub receipt: Receipt,
}

/// Stateless gate over one rollup verifier.
#[derive(Debug)]
pub struct SubmissionGate<B: ProvingBackend = DigestBackend> {
    rollup: Arc<Rollup<B>>,
}

impl<B: ProvingBackend> Clone for SubmissionGate<B> {
    fn clone(&self) -> Self {
        Self {
            rollup: Arc::clone(&self.rollup),
        }
    }
}

impl<B: ProvingBackend> SubmissionGate<B> {
    /// Gate verifying repeater proofs with `rollup`.
    pub fn new(rollup: Arc<Rollup<B>>) -> Self {
        Self { rollup }
    }

    /// The verifier in use.
    pub fn rollup(&self) -> &Arc<Rollup<B>> {
        &self.rollup
    }

    /// Run the still-life checks; returns the board digest on success.
    pub fn check_still_solution(&self, board: &Board) -> Result<StateHash> {
        board.validate()?;
        check_transition(board, board)?;
        Ok(board.digest())
    }

    /// Run the repeater checks; returns the verified rollup state.
    pub fn check_repeater_solution(&self, proof: &RollupProof) -> Result<RollupState> {
        let state = self.rollup.verify(proof)?;
        if !state.is_cycle() {
            return Err(ValidationError::BoardsDiffer.into());
        }
        if state.step < MIN_REPEATER_STEPS {
            return Err(ValidationError::InsufficientSteps { steps: state.step }.into());
        }
        Ok(state)
    }

    /// Accept `board` as a still life.
    pub fn submit_still_solution(
        &self,
        record: &AcceptanceRecord,
        board: &Board,
    ) -> Result<Acceptance> {
        let statement = self
            .check_still_solution(board)
            .map_err(|e| rejected(SolutionKind::Still, e))?;
        Ok(accept(record, SolutionKind::Still, statement))
    }

    /// Accept the chain proved by `proof` as a repeater.
    pub fn submit_repeater_solution(
        &self,
        record: &AcceptanceRecord,
        proof: &RollupProof,
    ) -> Result<Acceptance> {
        let state = self
            .check_repeater_solution(proof)
            .map_err(|e| rejected(SolutionKind::Repeater, e))?;
        Ok(accept(record, SolutionKind::Repeater, state.statement_digest()))
    }

    /// Dispatch on the submission kind.
    pub fn submit(&self, record: &AcceptanceRecord, submission: &Submission) -> Result<Acceptance> {
        match submission {
            Submission::Still(board) => self.submit_still_solution(record, board),
            Submission::Repeater(proof) => self.submit_repeater_solution(record, proof),
        }
    }
}

fn rejected(kind: SolutionKind, err: LifeError) -> LifeError {
    warn!("{:?} submission rejected: {}", kind, err);
    err
}

fn accept(record: &AcceptanceRecord, kind: SolutionKind, statement: StateHash) -> Acceptance {
    let next = record.accept(kind, &statement);
    info!(
        "{:?} solution accepted, record v{} -> v{}, statement {}",
        kind,
        record.version,
        next.version,
        short_hex(&statement)
    );

    Acceptance {
        record: next,
        receipt: Receipt {
            kind,
            statement,
            version: next.version,
            accepted_at: Utc::now(),
        },
    }
}
