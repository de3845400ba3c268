//! Statement Hashing
//!
//! Domain-separated SHA-256 digests used to bind proofs and acceptance
//! records to the boards they talk about:
//! - board digests,
//! - rollup statement digests (anchor, current board, step),
//! - accumulator folding and record commitments.
//!
//! Digests never replace board comparison; boards are compared cell by cell.

use sha2::{Digest, Sha256};

/// 256-bit digest.
pub type StateHash = [u8; 32];

/// All-zero hash, the commitment of a freshly created record.
pub const ZERO_HASH: StateHash = [0; 32];

/// Domain separator for board digests.
pub const BOARD_DOMAIN: &[u8] = b"LIFE_ROLLUP_BOARD_V1";

/// Domain separator for rollup statements.
pub const STATEMENT_DOMAIN: &[u8] = b"LIFE_ROLLUP_STATEMENT_V1";

/// Incremental SHA-256 prefixed with a domain tag.
///
/// Integers are fed little-endian. Callers own the field order.
pub struct StateHasher {
    inner: Sha256,
}

impl StateHasher {
    /// Hasher whose first input is `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut inner = Sha256::new();
        inner.update(domain);
        Self { inner }
    }

    /// Hasher for board digests.
    pub fn for_board() -> Self {
        Self::new(BOARD_DOMAIN)
    }

    /// Hasher for rollup statements.
    pub fn for_statement() -> Self {
        Self::new(STATEMENT_DOMAIN)
    }

    /// Feed opaque bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Feed a tag byte.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.inner.update([value]);
    }

    /// Feed a cell value or step counter.
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.inner.update(value.to_le_bytes());
    }

    /// Feed a record version.
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.inner.update(value.to_le_bytes());
    }

    /// Feed another digest.
    #[inline]
    pub fn update_hash(&mut self, hash: &StateHash) {
        self.inner.update(hash);
    }

    /// Consume and produce the digest.
    pub fn finalize(self) -> StateHash {
        self.inner.finalize().into()
    }
}

/// Hash a sequence of digests under a domain.
///
/// Used wherever two or more digests are chained (folds, commitments).
pub fn hash_chain(domain: &[u8], parts: &[&StateHash]) -> StateHash {
    let mut hasher = StateHasher::new(domain);
    for part in parts {
        hasher.update_hash(part);
    }
    hasher.finalize()
}

/// Short hex prefix for log lines.
pub fn short_hex(hash: &StateHash) -> String {
    hex::encode(&hash[..6])
}
