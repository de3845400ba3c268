//! Life Rollup Demo
//!
//! Classifies a few known patterns, proves them on the background worker and
//! submits them to the ledger.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use life_rollup::{
    gate::{FileStore, Ledger, Submission, SubmissionGate},
    life::find_period,
    proof::ProvingBackend,
    Board, LifeConfig, ProverHandle, Rollup, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = LifeConfig::from_env();
    info!("Life Rollup v{}", VERSION);
    if std::env::var_os("LIFE_PROGRAM_SEED").is_none() {
        warn!("LIFE_PROGRAM_SEED unset, proofs are sealed under an ephemeral key");
    }

    let rollup = Arc::new(Rollup::compile(config.program_seed.as_bytes()));
    info!("Backend key: {}", hex::encode(rollup.backend().key_id()));

    let gate = SubmissionGate::new(Arc::clone(&rollup));
    let ledger = match &config.record_path {
        Some(path) => Ledger::open(gate, Box::new(FileStore::new(path)))
            .await
            .with_context(|| format!("opening record at {}", path.display()))?,
        None => Ledger::in_memory(gate),
    };

    let (prover, worker) = ProverHandle::spawn(rollup, config.queue_capacity);
    prover.syn().await?;

    info!("=== Submitting Patterns ===");
    for (name, board) in patterns() {
        let Some(period) = find_period(&board, config.max_period_search) else {
            info!("{}: no period within {} steps, skipped", name, config.max_period_search);
            continue;
        };

        info!("{}: period {}", name, period);
        let submission = prover.prepare_submission(board, period).await?;
        let receipt = ledger.submit(&submission).await?;
        info!(
            "{}: accepted as {:?}, record v{}, statement {}",
            name,
            receipt.kind,
            receipt.version,
            hex::encode(receipt.statement)
        );
    }

    info!("=== Rejections ===");
    let block = patterns()[0].1;
    let one_step = prover.prove_chain(block, 1).await?;
    match ledger.submit(&Submission::Repeater(one_step)).await {
        Ok(_) => warn!("one-step repeater unexpectedly accepted"),
        Err(e) => info!("one-step repeater rejected: {}", e),
    }

    let record = ledger.current().await;
    info!("=== Final Record ===");
    info!("Version: {}", record.version);
    info!("Still lifes: {}", record.still_count);
    info!("Repeaters: {}", record.repeater_count);
    info!("Commitment: {}", hex::encode(record.commitment));

    prover.shutdown();
    worker.await?;
    Ok(())
}

/// Demo patterns, block first.
fn patterns() -> Vec<(&'static str, Board)> {
    vec![
        ("block", Board::with_live_cells(&[(3, 2), (3, 3), (4, 2), (4, 3)])),
        ("blinker", Board::with_live_cells(&[(2, 3), (3, 3), (4, 3)])),
        (
            "beacon",
            Board::with_live_cells(&[
                (1, 4), (1, 5), (2, 4), (2, 5),
                (3, 2), (3, 3), (4, 2), (4, 3),
            ]),
        ),
        ("glider", Board::with_live_cells(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)])),
        ("toad", Board::with_live_cells(&[(3, 2), (3, 3), (3, 4), (4, 1), (4, 2), (4, 3)])),
    ]
}
