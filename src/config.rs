//! Runtime Configuration
//!
//! Settings for the binary and the prover worker. The core protocol takes no
//! configuration; everything here is about how it is hosted.

use std::path::PathBuf;

use rand::Rng;

/// Fresh random program seed, hex encoded.
///
/// Proofs sealed under it only verify in this process.
pub fn random_program_seed() -> String {
    hex::encode(rand::thread_rng().gen::<[u8; 32]>())
}

/// Host configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeConfig {
    /// Seed the proving backend key is derived from. Anyone holding it can
    /// seal arbitrary claims, so it must stay secret.
    pub program_seed: String,
    /// Prover worker request queue depth.
    pub queue_capacity: usize,
    /// Longest period searched when classifying a board.
    pub max_period_search: u32,
    /// Where the acceptance record is persisted. `None` keeps it in memory.
    pub record_path: Option<PathBuf>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            program_seed: random_program_seed(),
            queue_capacity: 64,
            max_period_search: 64,
            record_path: None,
        }
    }
}

impl LifeConfig {
    /// Create config from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults; an unset or
    /// empty `LIFE_PROGRAM_SEED` gets a random seed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            program_seed: std::env::var("LIFE_PROGRAM_SEED")
                .ok()
                .filter(|seed| !seed.is_empty())
                .unwrap_or(defaults.program_seed),
            queue_capacity: std::env::var("LIFE_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.queue_capacity),
            max_period_search: std::env::var("LIFE_MAX_PERIOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_period_search),
            record_path: std::env::var("LIFE_RECORD_PATH").ok().map(PathBuf::from),
        }
    }
}
