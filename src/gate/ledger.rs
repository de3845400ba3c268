//! Acceptance Ledger
//!
//! Owns the one mutable piece of state: the current acceptance record.
//! Writers are serialized by a write lock held across check-and-commit, so
//! concurrent submissions never lose an update. A record only changes by
//! re-running the gate on a submission; every new record is persisted through
//! a [`RecordStore`] on the blocking pool before it becomes current.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::board::Board;
use crate::error::LifeError;
use crate::gate::record::AcceptanceRecord;
use crate::gate::submission::{Receipt, Submission, SubmissionGate};
use crate::proof::backend::{DigestBackend, ProvingBackend};
use crate::proof::rollup::RollupProof;

/// Ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The gate refused the submission.
    #[error(transparent)]
    Rejected(#[from] LifeError),

    /// Record changed since the caller read it.
    #[error("stale record: expected version {expected}, found {found}")]
    StaleRecord {
        /// Version the caller built on.
        expected: u64,
        /// Current version.
        found: u64,
    },

    /// Offered record is not what the submission produces.
    #[error("record v{got} does not match the verified submission")]
    RecordMismatch {
        /// Version offered.
        got: u64,
    },

    /// Persistence failed.
    #[error("record store error: {0}")]
    Store(String),
}

/// Where the acceptance record lives between runs.
///
/// Implementations may block; the ledger calls them on the blocking pool.
pub trait RecordStore: Send + Sync {
    /// Last saved record, if any.
    fn load(&self) -> Result<Option<AcceptanceRecord>, GateError>;

    /// Replace the saved record.
    fn save(&self, record: &AcceptanceRecord) -> Result<(), GateError>;
}

/// Volatile store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<AcceptanceRecord>>,
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Option<AcceptanceRecord>, GateError> {
        let slot = self.slot.lock().map_err(|e| GateError::Store(e.to_string()))?;
        Ok(*slot)
    }

    fn save(&self, record: &AcceptanceRecord) -> Result<(), GateError> {
        let mut slot = self.slot.lock().map_err(|e| GateError::Store(e.to_string()))?;
        *slot = Some(*record);
        Ok(())
    }
}

/// Record persisted as bincode in a single file.
///
/// Saves write and sync a sibling `<name>.tmp` file, then rename it over the
/// target.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Staging file used during saves.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn store_err(e: impl std::fmt::Display) -> GateError {
    GateError::Store(e.to_string())
}

impl RecordStore for FileStore {
    fn load(&self) -> Result<Option<AcceptanceRecord>, GateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path).map_err(store_err)?;
        let record = AcceptanceRecord::from_bytes(&bytes).map_err(store_err)?;
        Ok(Some(record))
    }

    fn save(&self, record: &AcceptanceRecord) -> Result<(), GateError> {
        let bytes = record.to_bytes().map_err(store_err)?;
        let tmp = self.temp_path();

        let mut file = File::create(&tmp).map_err(store_err)?;
        file.write_all(&bytes).map_err(store_err)?;
        file.sync_all().map_err(store_err)?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(store_err)?;
        Ok(())
    }
}

/// Single-writer owner of the acceptance record.
pub struct Ledger<B: ProvingBackend = DigestBackend> {
    gate: SubmissionGate<B>,
    record: RwLock<AcceptanceRecord>,
    store: Arc<dyn RecordStore>,
}

impl<B: ProvingBackend> Ledger<B> {
    /// Open the ledger, creating the genesis record if the store is empty.
    pub async fn open(
        gate: SubmissionGate<B>,
        store: Box<dyn RecordStore>,
    ) -> Result<Self, GateError> {
        let store: Arc<dyn RecordStore> = Arc::from(store);

        let loaded = {
            let store = Arc::clone(&store);
            tokio::task::spawn_blocking(move || store.load())
                .await
                .map_err(store_err)??
        };
        let record = match loaded {
            Some(record) => {
                info!("loaded acceptance record v{}", record.version);
                record
            }
            None => {
                let record = AcceptanceRecord::genesis();
                persist(&store, record).await?;
                info!("initialized acceptance record");
                record
            }
        };

        Ok(Self {
            gate,
            record: RwLock::new(record),
            store,
        })
    }

    /// Ledger over a [`MemoryStore`].
    pub fn in_memory(gate: SubmissionGate<B>) -> Self {
        Self {
            gate,
            record: RwLock::new(AcceptanceRecord::genesis()),
            store: Arc::new(MemoryStore::default()),
        }
    }

    /// The gate submissions are checked with.
    pub fn gate(&self) -> &SubmissionGate<B> {
        &self.gate
    }

    /// Current record.
    pub async fn current(&self) -> AcceptanceRecord {
        *self.record.read().await
    }

    /// Check and record a submission.
    pub async fn submit(&self, submission: &Submission) -> Result<Receipt, GateError> {
        let mut record = self.record.write().await;
        let acceptance = self.gate.submit(&record, submission)?;

        persist(&self.store, acceptance.record).await?;
        *record = acceptance.record;

        debug!("record now v{}", record.version);
        Ok(acceptance.receipt)
    }

    /// Submit a still-life board.
    pub async fn submit_still(&self, board: Board) -> Result<Receipt, GateError> {
        self.submit(&Submission::Still(board)).await
    }

    /// Submit a repeater chain proof.
    pub async fn submit_repeater(&self, proof: RollupProof) -> Result<Receipt, GateError> {
        self.submit(&Submission::Repeater(proof)).await
    }

    /// Install a record a caller produced with the gate directly.
    ///
    /// The current version must still be `expected_version`, and `next` must
    /// be exactly the record the gate produces for `submission` on top of
    /// the current one; the submission is re-verified here.
    pub async fn commit(
        &self,
        expected_version: u64,
        next: AcceptanceRecord,
        submission: &Submission,
    ) -> Result<Receipt, GateError> {
        let mut record = self.record.write().await;

        if record.version != expected_version {
            warn!(
                "stale commit: expected v{}, current v{}",
                expected_version, record.version
            );
            return Err(GateError::StaleRecord {
                expected: expected_version,
                found: record.version,
            });
        }

        let acceptance = self.gate.submit(&record, submission)?;
        if acceptance.record != next {
            warn!("commit of v{} refused: record does not match submission", next.version);
            return Err(GateError::RecordMismatch { got: next.version });
        }

        persist(&self.store, next).await?;
        *record = next;
        Ok(acceptance.receipt)
    }
}

async fn persist(store: &Arc<dyn RecordStore>, record: AcceptanceRecord) -> Result<(), GateError> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || store.save(&record))
        .await
        .map_err(store_err)?
}
