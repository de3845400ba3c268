//! Acceptance Record
//!
//! The single persisted commitment of a deployed gate. Records are values:
//! accepting a solution produces the next version, it never mutates the
//! current one.

use serde::{Deserialize, Serialize};

use crate::core::hash::{StateHash, StateHasher, ZERO_HASH};

/// Domain separator for record commitments.
const RECORD_DOMAIN: &[u8] = b"LIFE_ROLLUP_RECORD_V1";

/// Accepted solution classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionKind {
    /// Single-step fixed point.
    Still,
    /// Cycle of two or more steps.
    Repeater,
}

impl SolutionKind {
    fn tag(self) -> u8 {
        match self {
            Self::Still => 1,
            Self::Repeater => 2,
        }
    }
}

/// Versioned commitment over every accepted solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceRecord {
    /// Number of accepted submissions that produced this record.
    pub version: u64,
    /// Chained digest of all accepted statements, in order.
    pub commitment: StateHash,
    /// Accepted still solutions.
    pub still_count: u64,
    /// Accepted repeater solutions.
    pub repeater_count: u64,
}

impl Default for AcceptanceRecord {
    fn default() -> Self {
        Self::genesis()
    }
}

impl AcceptanceRecord {
    /// Record of a freshly initialized gate.
    pub const fn genesis() -> Self {
        Self {
            version: 0,
            commitment: ZERO_HASH,
            still_count: 0,
            repeater_count: 0,
        }
    }

    /// Next record after accepting `statement` as a `kind` solution.
    pub fn accept(&self, kind: SolutionKind, statement: &StateHash) -> Self {
        let version = self.version + 1;

        let mut hasher = StateHasher::new(RECORD_DOMAIN);
        hasher.update_hash(&self.commitment);
        hasher.update_u64(version);
        hasher.update_u8(kind.tag());
        hasher.update_hash(statement);

        let (still_count, repeater_count) = match kind {
            SolutionKind::Still => (self.still_count + 1, self.repeater_count),
            SolutionKind::Repeater => (self.still_count, self.repeater_count + 1),
        };

        Self {
            version,
            commitment: hasher.finalize(),
            still_count,
            repeater_count,
        }
    }

    /// Total accepted submissions.
    pub fn total_accepted(&self) -> u64 {
        self.still_count + self.repeater_count
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis() {
        let record = AcceptanceRecord::genesis();
        assert_eq!(record.version, 0);
        assert_eq!(record.commitment, ZERO_HASH);
        assert_eq!(record.total_accepted(), 0);
        assert_eq!(AcceptanceRecord::default(), record);
    }

    #[test]
    fn test_accept_advances_version() {
        let genesis = AcceptanceRecord::genesis();
        let one = genesis.accept(SolutionKind::Still, &[1; 32]);
        let two = one.accept(SolutionKind::Repeater, &[2; 32]);

        assert_eq!(one.version, 1);
        assert_eq!(two.version, 2);
        assert_eq!((two.still_count, two.repeater_count), (1, 1));
        assert_ne!(one.commitment, two.commitment);

        // The previous value is untouched.
        assert_eq!(genesis, AcceptanceRecord::genesis());
    }

    #[test]
    fn test_commitment_binds_kind_and_order() {
        let genesis = AcceptanceRecord::genesis();

        let still = genesis.accept(SolutionKind::Still, &[1; 32]);
        let repeater = genesis.accept(SolutionKind::Repeater, &[1; 32]);
        assert_ne!(still.commitment, repeater.commitment);

        let ab = genesis
            .accept(SolutionKind::Still, &[1; 32])
            .accept(SolutionKind::Still, &[2; 32]);
        let ba = genesis
            .accept(SolutionKind::Still, &[2; 32])
            .accept(SolutionKind::Still, &[1; 32]);
        assert_ne!(ab.commitment, ba.commitment);
    }

    #[test]
    fn test_resubmission_still_advances() {
        let once = AcceptanceRecord::genesis().accept(SolutionKind::Still, &[1; 32]);
        let twice = once.accept(SolutionKind::Still, &[1; 32]);
        assert_eq!(twice.still_count, 2);
        assert_ne!(once.commitment, twice.commitment);
    }

    #[test]
    fn test_binary_round_trip() {
        let record = AcceptanceRecord::genesis().accept(SolutionKind::Repeater, &[9; 32]);
        let decoded = AcceptanceRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, record);
    }
}
