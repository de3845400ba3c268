//! Rollup Protocol
//!
//! Inductive proofs over step counts:
//! - `init` proves step 0 (the anchor board is valid),
//! - `step` proves step n+1 from a verified proof of step n.
//!
//! A step proof carries only its predecessor's folded accumulator, never the
//! predecessor itself, so proofs have constant size and [`Rollup::verify`] does
//! constant work however long the chain is.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::board::Board;
use crate::core::hash::{short_hex, StateHash};
use crate::error::{ProofError, Result, ValidationError};
use crate::life::rule::check_transition;
use crate::life::simulator::Evolution;
use crate::proof::backend::{fold_base, fold_step, Claim, DigestBackend, ProvingBackend, Seal};
use crate::proof::state::RollupState;

/// Which constructor produced a proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofKind {
    /// Produced by `init`.
    Base,
    /// Produced by `step`; carries the predecessor's accumulator.
    Step {
        /// Accumulator of the proof this one extends.
        prior: StateHash,
    },
}

/// Certificate bound to exactly one [`RollupState`].
///
/// Opaque to consumers: the bound state is only trustworthy once returned by
/// [`Rollup::verify`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupProof {
    state: RollupState,
    kind: ProofKind,
    accumulator: StateHash,
    seal: Seal,
}

impl RollupProof {
    /// The state this proof claims, unverified.
    pub fn claimed_state(&self) -> &RollupState {
        &self.state
    }

    /// Step count this proof claims, unverified.
    pub fn claimed_step(&self) -> u32 {
        self.state.step
    }

    /// Constructor tag.
    pub fn kind(&self) -> ProofKind {
        self.kind
    }

    /// Fold of every statement in the chain.
    pub fn accumulator(&self) -> StateHash {
        self.accumulator
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, ProofError> {
        bincode::serialize(self).map_err(|e| ProofError::Encoding(e.to_string()))
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> std::result::Result<Self, ProofError> {
        bincode::deserialize(data).map_err(|e| ProofError::Encoding(e.to_string()))
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> std::result::Result<String, ProofError> {
        serde_json::to_string(self).map_err(|e| ProofError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> std::result::Result<Self, ProofError> {
        serde_json::from_str(s).map_err(|e| ProofError::Encoding(e.to_string()))
    }
}

/// The proof system: constructors and verifier over one backend key.
#[derive(Debug)]
pub struct Rollup<B: ProvingBackend = DigestBackend> {
    backend: B,
}

impl Rollup<DigestBackend> {
    /// Rollup over a freshly compiled digest backend.
    pub fn compile(program_seed: &[u8]) -> Self {
        Self::new(DigestBackend::compile(program_seed))
    }
}

impl<B: ProvingBackend> Rollup<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend proofs are sealed with.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Prove the base case: step 0 on a valid anchor board.
    pub fn init(&self, state: RollupState) -> Result<RollupProof> {
        if state.initial_state != state.state {
            return Err(ValidationError::InvalidInitialState.into());
        }
        if state.step != 0 {
            return Err(ValidationError::StepNotZero { got: state.step }.into());
        }
        state.state.validate()?;

        let statement = state.statement_digest();
        let accumulator = fold_base(&statement);
        let seal = self.backend.seal(&Claim { statement, accumulator })?;

        debug!("init proof sealed, statement {}", short_hex(&statement));

        Ok(RollupProof {
            state,
            kind: ProofKind::Base,
            accumulator,
            seal,
        })
    }

    /// Prove one more evolution on top of `prior`.
    pub fn step(&self, state: RollupState, prior: &RollupProof) -> Result<RollupProof> {
        let prior_state = self.verify(prior)?;

        let expected = prior_state.step.checked_add(1).ok_or(ValidationError::StepMismatch {
            expected: u32::MAX,
            got: state.step,
        })?;
        if state.step != expected {
            return Err(ValidationError::StepMismatch {
                expected,
                got: state.step,
            }
            .into());
        }
        if state.initial_state != prior_state.initial_state {
            return Err(ValidationError::InitialStatesDiffer.into());
        }
        state.state.validate()?;
        check_transition(&prior_state.state, &state.state)?;

        let statement = state.statement_digest();
        let accumulator = fold_step(&prior.accumulator, &statement);
        let seal = self.backend.seal(&Claim { statement, accumulator })?;

        debug!(
            "step {} proof sealed, statement {}",
            state.step,
            short_hex(&statement)
        );
        #[cfg(feature = "debug-tracing")]
        tracing::trace!("step {} board:\n{}", state.step, state.state);

        Ok(RollupProof {
            state,
            kind: ProofKind::Step {
                prior: prior.accumulator,
            },
            accumulator,
            seal,
        })
    }

    /// Check a proof and return the state it is bound to.
    ///
    /// Constant work: one statement digest, one fold, one seal check.
    pub fn verify(&self, proof: &RollupProof) -> Result<RollupState> {
        let statement = proof.state.statement_digest();

        let accumulator = match (proof.kind, proof.state.step) {
            (ProofKind::Base, 0) => fold_base(&statement),
            (ProofKind::Step { prior }, step) if step > 0 => fold_step(&prior, &statement),
            (_, step) => return Err(ProofError::TagMismatch { step }.into()),
        };
        if accumulator != proof.accumulator {
            return Err(ProofError::AccumulatorMismatch.into());
        }

        self.backend.check(&Claim { statement, accumulator }, &proof.seal)?;
        Ok(proof.state)
    }

    /// Prove `steps` evolutions of `board`: `init` followed by `steps` calls
    /// to `step`, with witnesses from the simulator.
    pub fn prove_chain(&self, board: &Board, steps: u32) -> Result<RollupProof> {
        self.prove_chain_cancellable(board, steps, || false)
    }

    /// [`Rollup::prove_chain`] that polls `cancelled` before every step.
    pub fn prove_chain_cancellable<F>(
        &self,
        board: &Board,
        steps: u32,
        cancelled: F,
    ) -> Result<RollupProof>
    where
        F: Fn() -> bool,
    {
        let mut state = RollupState::genesis(*board);
        let mut proof = self.init(state)?;

        for next in Evolution::new(*board).take(steps as usize) {
            if cancelled() {
                info!("chain construction cancelled at step {}", state.step);
                return Err(ProofError::Cancelled.into());
            }
            state = state.advance(next);
            proof = self.step(state, &proof)?;
        }

        info!(
            "proved {} step chain, accumulator {}",
            steps,
            short_hex(&proof.accumulator)
        );
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;
    use crate::life::rule::next_state;
    use std::cell::Cell;

    fn rollup() -> Rollup {
        Rollup::compile(b"rollup-tests")
    }

    fn block() -> Board {
        Board::with_live_cells(&[(3, 2), (3, 3), (4, 2), (4, 3)])
    }

    fn beacon() -> Board {
        Board::with_live_cells(&[
            (1, 4), (1, 5), (2, 4), (2, 5),
            (3, 2), (3, 3), (4, 2), (4, 3),
        ])
    }

    fn validation(err: LifeError) -> ValidationError {
        err.as_validation().cloned().expect("validation error")
    }

    #[test]
    fn test_init_binds_state() {
        let rollup = rollup();
        let state = RollupState::genesis(beacon());
        let proof = rollup.init(state).unwrap();

        assert_eq!(proof.kind(), ProofKind::Base);
        assert_eq!(rollup.verify(&proof).unwrap(), state);
    }

    #[test]
    fn test_init_rejects_mismatched_boards() {
        let state = RollupState {
            initial_state: beacon(),
            state: block(),
            step: 0,
        };
        let err = validation(rollup().init(state).unwrap_err());
        assert_eq!(err.to_string(), "invalid initial state");
    }

    #[test]
    fn test_init_rejects_nonzero_step() {
        let state = RollupState { step: 3, ..RollupState::genesis(block()) };
        let err = validation(rollup().init(state).unwrap_err());
        assert_eq!(err, ValidationError::StepNotZero { got: 3 });
    }

    #[test]
    fn test_init_rejects_invalid_cell() {
        let state = RollupState::genesis(block().with_cell(4, 3, 2));
        let err = validation(rollup().init(state).unwrap_err());
        assert_eq!(err.to_string(), "4,3 has invalid value");
    }

    #[test]
    fn test_step_extends_chain() {
        let rollup = rollup();
        let base = RollupState::genesis(beacon());
        let p0 = rollup.init(base).unwrap();

        let s1 = base.advance(next_state(&beacon()));
        let p1 = rollup.step(s1, &p0).unwrap();
        assert_eq!(p1.kind(), ProofKind::Step { prior: p0.accumulator() });
        assert_eq!(rollup.verify(&p1).unwrap(), s1);

        let s2 = s1.advance(beacon());
        let p2 = rollup.step(s2, &p1).unwrap();
        let verified = rollup.verify(&p2).unwrap();
        assert_eq!(verified, s2);
        assert!(verified.is_cycle());
    }

    #[test]
    fn test_step_rejects_skipped_step() {
        let rollup = rollup();
        let base = RollupState::genesis(block());
        let p0 = rollup.init(base).unwrap();

        let skipped = RollupState { step: 2, ..base };
        let err = validation(rollup.step(skipped, &p0).unwrap_err());
        assert_eq!(err, ValidationError::StepMismatch { expected: 1, got: 2 });
    }

    #[test]
    fn test_step_rejects_changed_anchor() {
        let rollup = rollup();
        let base = RollupState::genesis(block());
        let p0 = rollup.init(base).unwrap();

        let moved = RollupState {
            initial_state: Board::empty(),
            state: block(),
            step: 1,
        };
        let err = validation(rollup.step(moved, &p0).unwrap_err());
        assert_eq!(err.to_string(), "initial states not same");
    }

    #[test]
    fn test_step_rejects_invalid_cell_before_transition() {
        let rollup = rollup();
        let base = RollupState::genesis(block());
        let p0 = rollup.init(base).unwrap();

        let bad = base.advance(block().with_cell(0, 6, 9));
        let err = validation(rollup.step(bad, &p0).unwrap_err());
        assert_eq!(err, ValidationError::InvalidCell { row: 0, col: 6, value: 9 });
    }

    #[test]
    fn test_step_rejects_wrong_successor() {
        let rollup = rollup();
        let base = RollupState::genesis(beacon());
        let p0 = rollup.init(base).unwrap();

        // Claim the beacon is still.
        let err = validation(rollup.step(base.advance(beacon()), &p0).unwrap_err());
        assert_eq!(err.to_string(), "transition is not correct for 2,4");
    }

    #[test]
    fn test_step_requires_verifiable_prior() {
        let ours = rollup();
        let theirs = Rollup::compile(b"someone-else");
        let base = RollupState::genesis(block());
        let foreign = theirs.init(base).unwrap();

        let err = ours.step(base.advance(block()), &foreign).unwrap_err();
        assert_eq!(err, LifeError::Proof(ProofError::SealMismatch));
    }

    #[test]
    fn test_verify_detects_tampered_state() {
        let rollup = rollup();
        let mut proof = rollup.prove_chain(&block(), 1).unwrap();
        proof.state.step = 5;

        assert_eq!(
            rollup.verify(&proof).unwrap_err(),
            LifeError::Proof(ProofError::AccumulatorMismatch)
        );
    }

    #[test]
    fn test_verify_detects_forged_accumulator() {
        let rollup = rollup();
        let mut proof = rollup.prove_chain(&block(), 1).unwrap();

        // Refold consistently; only the seal can catch this.
        proof.state.step = 5;
        let statement = proof.state.statement_digest();
        if let ProofKind::Step { prior } = proof.kind {
            proof.accumulator = fold_step(&prior, &statement);
        }

        assert_eq!(
            rollup.verify(&proof).unwrap_err(),
            LifeError::Proof(ProofError::SealMismatch)
        );
    }

    #[test]
    fn test_verify_detects_tag_mismatch() {
        let rollup = rollup();
        let mut proof = rollup.prove_chain(&block(), 1).unwrap();
        proof.kind = ProofKind::Base;

        assert_eq!(
            rollup.verify(&proof).unwrap_err(),
            LifeError::Proof(ProofError::TagMismatch { step: 1 })
        );
    }

    #[test]
    fn test_prove_chain_binds_final_state() {
        let rollup = rollup();
        let proof = rollup.prove_chain(&beacon(), 4).unwrap();
        let state = rollup.verify(&proof).unwrap();

        assert_eq!(state.step, 4);
        assert_eq!(state.initial_state, beacon());
        assert_eq!(state.state, beacon());
    }

    #[test]
    fn test_prove_chain_rejects_invalid_anchor() {
        let err = rollup().prove_chain(&block().with_cell(7, 7, 4), 2).unwrap_err();
        assert_eq!(validation(err).to_string(), "7,7 has invalid value");
    }

    #[test]
    fn test_proof_size_independent_of_chain_length() {
        let rollup = rollup();
        let short = rollup.prove_chain(&beacon(), 2).unwrap();
        let long = rollup.prove_chain(&beacon(), 20).unwrap();

        assert_eq!(short.to_bytes().unwrap().len(), long.to_bytes().unwrap().len());
    }

    #[test]
    fn test_serialized_proof_verifies() {
        let rollup = rollup();
        let proof = rollup.prove_chain(&beacon(), 2).unwrap();

        let from_bytes = RollupProof::from_bytes(&proof.to_bytes().unwrap()).unwrap();
        let from_json = RollupProof::from_json(&proof.to_json().unwrap()).unwrap();

        assert_eq!(rollup.verify(&from_bytes), rollup.verify(&proof));
        assert_eq!(rollup.verify(&from_json), rollup.verify(&proof));
        assert!(matches!(
            RollupProof::from_bytes(&[1, 2, 3]),
            Err(ProofError::Encoding(_))
        ));
    }

    #[test]
    fn test_prove_chain_cancellation() {
        let polls = Cell::new(0);
        let err = rollup()
            .prove_chain_cancellable(&beacon(), 10, || {
                polls.set(polls.get() + 1);
                polls.get() > 3
            })
            .unwrap_err();

        assert_eq!(err, LifeError::Proof(ProofError::Cancelled));
        assert_eq!(polls.get(), 4);
    }
}
