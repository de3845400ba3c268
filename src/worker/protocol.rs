//! Prover Worker Messages
//!
//! Wire format between a caller and the background prover. Messages are
//! tagged JSON so they can cross a process or thread boundary unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::board::Board;
use crate::gate::submission::Submission;
use crate::proof::rollup::RollupProof;

/// Identifier of one proving job.
pub type JobId = Uuid;

/// Messages sent from caller to prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProverRequest {
    /// Liveness check.
    Syn,

    /// Prove `steps` evolutions of `board`.
    ProveChain {
        /// Job identifier chosen by the caller.
        job_id: JobId,
        /// Chain anchor.
        board: Board,
        /// Evolutions to prove.
        steps: u32,
    },

    /// Build a ready-to-submit payload: a still board when `steps == 1`,
    /// otherwise a repeater chain proof.
    PrepareSubmission {
        /// Job identifier chosen by the caller.
        job_id: JobId,
        /// Candidate solution.
        board: Board,
        /// Claimed period.
        steps: u32,
    },

    /// Stop a running job at its next step boundary.
    Cancel {
        /// Job to stop.
        job_id: JobId,
    },
}

/// Messages sent from prover to caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProverResponse {
    /// Reply to `Syn` and `Cancel`.
    Ack,

    /// Finished chain proof.
    Proof {
        /// Job this answers.
        job_id: JobId,
        /// The proof.
        proof: RollupProof,
    },

    /// Finished submission payload.
    Submission {
        /// Job this answers.
        job_id: JobId,
        /// Payload for the gate.
        payload: Submission,
    },

    /// Job aborted on a failed assertion or backend error.
    Failed {
        /// Job this answers.
        job_id: JobId,
        /// Error message, verbatim.
        reason: String,
    },

    /// Job stopped by `Cancel` or shutdown.
    Cancelled {
        /// Job this answers.
        job_id: JobId,
    },
}

impl ProverRequest {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Job this request refers to, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Self::Syn => None,
            Self::ProveChain { job_id, .. }
            | Self::PrepareSubmission { job_id, .. }
            | Self::Cancel { job_id } => Some(*job_id),
        }
    }
}

impl ProverResponse {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
