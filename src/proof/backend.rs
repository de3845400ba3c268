//! Proving Backend
//!
//! The seam between the rollup protocol and whatever realizes succinct proofs.
//! The protocol runs every assertion itself; the backend only attests a
//! [`Claim`] (statement digest + folded accumulator) and later checks that
//! attestation in constant time.
//!
//! [`DigestBackend`] is the bundled implementation: a keyed, domain-separated
//! SHA-256 seal. Its key comes from [`DigestBackend::compile`], the analog of
//! compiling the program and publishing its verification key. Proofs sealed
//! under one key never check under another.

use serde::{Deserialize, Serialize};

use crate::core::board::BOARD_SIZE;
use crate::core::hash::{hash_chain, StateHash, StateHasher};
use crate::error::ProofError;

/// Rule revision baked into every program key.
pub const RULE_VERSION: u32 = 1;

/// Domain separator for program key derivation.
const PROGRAM_DOMAIN: &[u8] = b"LIFE_ROLLUP_PROGRAM_V1";

/// Domain separator for the public key fingerprint.
const KEY_ID_DOMAIN: &[u8] = b"LIFE_ROLLUP_KEY_ID_V1";

/// Domain separator for seals.
const SEAL_DOMAIN: &[u8] = b"LIFE_ROLLUP_SEAL_V1";

/// Domain separator for base folds.
const FOLD_BASE_DOMAIN: &[u8] = b"LIFE_ROLLUP_FOLD_BASE_V1";

/// Domain separator for step folds.
const FOLD_STEP_DOMAIN: &[u8] = b"LIFE_ROLLUP_FOLD_STEP_V1";

/// What a seal attests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Claim {
    /// Digest of the bound rollup state.
    pub statement: StateHash,
    /// Fold of every statement in the chain so far.
    pub accumulator: StateHash,
}

/// Backend attestation over a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seal(pub StateHash);

/// Accumulator of a chain's first statement.
pub fn fold_base(statement: &StateHash) -> StateHash {
    hash_chain(FOLD_BASE_DOMAIN, &[statement])
}

/// Accumulator after folding `statement` into `prior`.
pub fn fold_step(prior: &StateHash, statement: &StateHash) -> StateHash {
    hash_chain(FOLD_STEP_DOMAIN, &[prior, statement])
}

/// Interface for sealing and checking claims.
///
/// Implementations must check in time independent of how many claims were
/// folded into the accumulator.
pub trait ProvingBackend: Send + Sync {
    /// Public fingerprint of the key proofs are sealed under.
    fn key_id(&self) -> StateHash;

    /// Attest a claim. Only called after every assertion has passed.
    fn seal(&self, claim: &Claim) -> Result<Seal, ProofError>;

    /// Check an attestation.
    fn check(&self, claim: &Claim, seal: &Seal) -> Result<(), ProofError>;
}

/// Keyed SHA-256 attestation backend.
///
/// Trust model: the seal is a MAC, not a public-key signature. Whoever holds
/// the key, or the seed it was compiled from, can seal any claim, true or
/// not. Verifiers must be the key holder, and the seed must stay secret;
/// [`crate::config::random_program_seed`] gives a per-process one.
#[derive(Clone)]
pub struct DigestBackend {
    key: StateHash,
}

impl DigestBackend {
    /// Derive the program key from a seed.
    ///
    /// The board size and rule revision are bound in, so a key never checks
    /// proofs produced for a different circuit.
    pub fn compile(program_seed: &[u8]) -> Self {
        let mut hasher = StateHasher::new(PROGRAM_DOMAIN);
        hasher.update_u32(BOARD_SIZE as u32);
        hasher.update_u32(RULE_VERSION);
        hasher.update_bytes(program_seed);
        Self { key: hasher.finalize() }
    }

    fn compute_seal(&self, claim: &Claim) -> StateHash {
        hash_chain(SEAL_DOMAIN, &[&self.key, &claim.statement, &claim.accumulator])
    }
}

impl std::fmt::Debug for DigestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestBackend")
            .field("key_id", &hex::encode(self.key_id()))
            .finish()
    }
}

impl ProvingBackend for DigestBackend {
    fn key_id(&self) -> StateHash {
        hash_chain(KEY_ID_DOMAIN, &[&self.key])
    }

    fn seal(&self, claim: &Claim) -> Result<Seal, ProofError> {
        Ok(Seal(self.compute_seal(claim)))
    }

    fn check(&self, claim: &Claim, seal: &Seal) -> Result<(), ProofError> {
        let expected = self.compute_seal(claim);
        // Constant-time compare.
        let diff = expected
            .iter()
            .zip(seal.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        if diff == 0 {
            Ok(())
        } else {
            Err(ProofError::SealMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim() -> Claim {
        Claim {
            statement: [1; 32],
            accumulator: fold_base(&[1; 32]),
        }
    }

    #[test]
    fn test_seal_checks_under_same_key() {
        let backend = DigestBackend::compile(b"test");
        let seal = backend.seal(&claim()).unwrap();
        assert!(backend.check(&claim(), &seal).is_ok());
    }

    #[test]
    fn test_seal_fails_under_other_key() {
        let a = DigestBackend::compile(b"a");
        let b = DigestBackend::compile(b"b");
        let seal = a.seal(&claim()).unwrap();

        assert_ne!(a.key_id(), b.key_id());
        assert_eq!(b.check(&claim(), &seal), Err(ProofError::SealMismatch));
    }

    #[test]
    fn test_seal_binds_claim() {
        let backend = DigestBackend::compile(b"test");
        let seal = backend.seal(&claim()).unwrap();

        let other = Claim { statement: [2; 32], ..claim() };
        assert_eq!(backend.check(&other, &seal), Err(ProofError::SealMismatch));
    }

    #[test]
    fn test_folds_are_order_sensitive() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_ne!(fold_step(&a, &b), fold_step(&b, &a));
        assert_ne!(fold_base(&a), fold_step(&[0; 32], &a));
    }

    #[test]
    fn test_debug_hides_key() {
        let backend = DigestBackend::compile(b"test");
        let shown = format!("{:?}", backend);
        assert!(shown.contains(&hex::encode(backend.key_id())));
        assert!(!shown.contains(&hex::encode(backend.key)));
    }
}
