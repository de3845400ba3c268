//! Prover Worker
//!
//! Background task that builds chain proofs off the caller's thread.
//! Requests arrive on an mpsc queue; each proving job runs on the blocking
//! pool and answers on its own oneshot channel. A job can be cancelled by id
//! and is then dropped at its next step boundary.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::core::board::Board;
use crate::error::{LifeError, ProofError, Result};
use crate::gate::submission::Submission;
use crate::life::rule::check_transition;
use crate::proof::backend::{DigestBackend, ProvingBackend};
use crate::proof::rollup::{Rollup, RollupProof};
use crate::worker::protocol::{JobId, ProverRequest, ProverResponse};

/// Worker errors seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    /// Worker has shut down.
    #[error("prover worker closed")]
    Closed,

    /// Job aborted; carries the underlying message verbatim.
    #[error("{0}")]
    JobFailed(String),

    /// Job was cancelled before it finished.
    #[error("job cancelled")]
    Cancelled,
}

struct Envelope {
    request: ProverRequest,
    reply: oneshot::Sender<ProverResponse>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope").field("request", &self.request).finish()
    }
}

#[derive(Clone, Copy, Debug)]
enum JobKind {
    Chain,
    Submission,
}

/// A submitted job awaiting its answer.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    reply: oneshot::Receiver<ProverResponse>,
}

impl Job {
    /// Job identifier, usable with [`ProverHandle::cancel`].
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Wait for the answer. `Failed` and `Cancelled` become errors.
    pub async fn wait(self) -> std::result::Result<ProverResponse, WorkerError> {
        match self.reply.await.map_err(|_| WorkerError::Closed)? {
            ProverResponse::Failed { reason, .. } => Err(WorkerError::JobFailed(reason)),
            ProverResponse::Cancelled { .. } => Err(WorkerError::Cancelled),
            response => Ok(response),
        }
    }

    /// Wait for a chain proof.
    pub async fn proof(self) -> std::result::Result<RollupProof, WorkerError> {
        match self.wait().await? {
            ProverResponse::Proof { proof, .. } => Ok(proof),
            other => Err(unexpected(&other)),
        }
    }

    /// Wait for a submission payload.
    pub async fn submission(self) -> std::result::Result<Submission, WorkerError> {
        match self.wait().await? {
            ProverResponse::Submission { payload, .. } => Ok(payload),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &ProverResponse) -> WorkerError {
    WorkerError::JobFailed(format!("unexpected response: {:?}", response))
}

/// Cloneable handle to a running worker.
#[derive(Clone, Debug)]
pub struct ProverHandle {
    requests: mpsc::Sender<Envelope>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ProverHandle {
    /// Spawn a worker on the current runtime.
    pub fn spawn<B>(rollup: Arc<Rollup<B>>, queue_capacity: usize) -> (Self, JoinHandle<()>)
    where
        B: ProvingBackend + 'static,
    {
        let (requests, rx) = mpsc::channel(queue_capacity.max(1));
        let (shutdown_tx, _) = broadcast::channel(1);

        let worker = ProverWorker {
            rollup,
            jobs: BTreeMap::new(),
        };
        let task = tokio::spawn(worker.run(rx, shutdown_tx.subscribe()));

        (
            Self {
                requests,
                shutdown_tx,
            },
            task,
        )
    }

    async fn send(
        &self,
        request: ProverRequest,
    ) -> std::result::Result<oneshot::Receiver<ProverResponse>, WorkerError> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(Envelope { request, reply })
            .await
            .map_err(|_| WorkerError::Closed)?;
        Ok(rx)
    }

    /// Send any request and wait for the raw reply.
    pub async fn request(
        &self,
        request: ProverRequest,
    ) -> std::result::Result<ProverResponse, WorkerError> {
        self.send(request)
            .await?
            .await
            .map_err(|_| WorkerError::Closed)
    }

    /// Liveness check.
    pub async fn syn(&self) -> std::result::Result<(), WorkerError> {
        match self.request(ProverRequest::Syn).await? {
            ProverResponse::Ack => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    /// Queue a chain proof of `steps` evolutions of `board`.
    pub async fn start_chain(
        &self,
        board: Board,
        steps: u32,
    ) -> std::result::Result<Job, WorkerError> {
        let job_id = Uuid::new_v4();
        let reply = self
            .send(ProverRequest::ProveChain {
                job_id,
                board,
                steps,
            })
            .await?;
        Ok(Job { id: job_id, reply })
    }

    /// Queue preparation of a submission for `board` with period `steps`.
    pub async fn start_submission(
        &self,
        board: Board,
        steps: u32,
    ) -> std::result::Result<Job, WorkerError> {
        let job_id = Uuid::new_v4();
        let reply = self
            .send(ProverRequest::PrepareSubmission {
                job_id,
                board,
                steps,
            })
            .await?;
        Ok(Job { id: job_id, reply })
    }

    /// Prove a chain and wait for it.
    #[instrument(skip(self, board))]
    pub async fn prove_chain(
        &self,
        board: Board,
        steps: u32,
    ) -> std::result::Result<RollupProof, WorkerError> {
        self.start_chain(board, steps).await?.proof().await
    }

    /// Prepare a submission and wait for it.
    #[instrument(skip(self, board))]
    pub async fn prepare_submission(
        &self,
        board: Board,
        steps: u32,
    ) -> std::result::Result<Submission, WorkerError> {
        self.start_submission(board, steps).await?.submission().await
    }

    /// Cancel a queued or running job. Unknown ids are ignored.
    pub async fn cancel(&self, job_id: JobId) -> std::result::Result<(), WorkerError> {
        match self.request(ProverRequest::Cancel { job_id }).await? {
            ProverResponse::Ack => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    /// Stop the worker. Running jobs are cancelled.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

struct ProverWorker<B: ProvingBackend = DigestBackend> {
    rollup: Arc<Rollup<B>>,
    jobs: BTreeMap<JobId, watch::Sender<bool>>,
}

impl<B: ProvingBackend + 'static> ProverWorker<B> {
    #[instrument(skip_all)]
    async fn run(
        mut self,
        mut requests: mpsc::Receiver<Envelope>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        info!("prover worker started");

        loop {
            tokio::select! {
                envelope = requests.recv() => {
                    let Some(envelope) = envelope else {
                        debug!("all handles dropped");
                        break;
                    };
                    self.handle(envelope);
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        for (job_id, flag) in std::mem::take(&mut self.jobs) {
            if flag.send(true).is_ok() {
                debug!("cancelling job {} on shutdown", job_id);
            }
        }
        info!("prover worker stopped");
    }

    fn handle(&mut self, envelope: Envelope) {
        // Finished jobs have dropped their flag receivers.
        self.jobs.retain(|_, flag| !flag.is_closed());

        let Envelope { request, reply } = envelope;
        match request {
            ProverRequest::Syn => {
                let _ = reply.send(ProverResponse::Ack);
            }
            ProverRequest::Cancel { job_id } => {
                match self.jobs.remove(&job_id) {
                    Some(flag) => {
                        let _ = flag.send(true);
                        info!("cancel requested for job {}", job_id);
                    }
                    None => debug!("cancel for unknown job {}", job_id),
                }
                let _ = reply.send(ProverResponse::Ack);
            }
            ProverRequest::ProveChain {
                job_id,
                board,
                steps,
            } => self.start(job_id, JobKind::Chain, board, steps, reply),
            ProverRequest::PrepareSubmission {
                job_id,
                board,
                steps,
            } => self.start(job_id, JobKind::Submission, board, steps, reply),
        }
    }

    fn start(
        &mut self,
        job_id: JobId,
        kind: JobKind,
        board: Board,
        steps: u32,
        reply: oneshot::Sender<ProverResponse>,
    ) {
        if self.jobs.contains_key(&job_id) {
            warn!("job {} already running, duplicate refused", job_id);
            let _ = reply.send(ProverResponse::Failed {
                job_id,
                reason: format!("duplicate job id {}", job_id),
            });
            return;
        }

        let (flag, cancelled) = watch::channel(false);
        self.jobs.insert(job_id, flag);

        let rollup = Arc::clone(&self.rollup);
        debug!("job {} queued: {:?}, {} steps", job_id, kind, steps);

        tokio::spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || {
                run_job(&rollup, job_id, kind, &board, steps, &cancelled)
            })
            .await;

            let response = match outcome {
                Ok(response) => response,
                Err(e) => {
                    warn!("job {} panicked: {}", job_id, e);
                    ProverResponse::Failed {
                        job_id,
                        reason: e.to_string(),
                    }
                }
            };
            if reply.send(response).is_err() {
                debug!("job {} finished after its caller left", job_id);
            }
        });
    }
}

fn run_job<B: ProvingBackend>(
    rollup: &Rollup<B>,
    job_id: JobId,
    kind: JobKind,
    board: &Board,
    steps: u32,
    cancelled: &watch::Receiver<bool>,
) -> ProverResponse {
    let is_cancelled = || *cancelled.borrow();

    let result = match kind {
        JobKind::Chain => rollup
            .prove_chain_cancellable(board, steps, is_cancelled)
            .map(|proof| ProverResponse::Proof { job_id, proof }),
        JobKind::Submission if steps == 1 => {
            still_preflight(board).map(|()| ProverResponse::Submission {
                job_id,
                payload: Submission::Still(*board),
            })
        }
        JobKind::Submission => rollup
            .prove_chain_cancellable(board, steps, is_cancelled)
            .map(|proof| ProverResponse::Submission {
                job_id,
                payload: Submission::Repeater(proof),
            }),
    };

    match result {
        Ok(response) => response,
        Err(LifeError::Proof(ProofError::Cancelled)) => ProverResponse::Cancelled { job_id },
        Err(e) => {
            warn!("job {} failed: {}", job_id, e);
            ProverResponse::Failed {
                job_id,
                reason: e.to_string(),
            }
        }
    }
}

fn still_preflight(board: &Board) -> Result<()> {
    board.validate()?;
    check_transition(board, board)?;
    Ok(())
}
