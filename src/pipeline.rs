//! The two batch stages as run by the binaries.

use crate::config::Config;
use crate::explorer::{ClientError, ExplorerClient, FetchOutcome, FetchSettings, TransferFetcher};
use crate::extractor::{self, ExtractError};
use crate::models::AddressEntry;
use crate::report;
use crate::storage::{self, StorageError};
use crate::validation::ValidationError;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Explorer client error: {0}")]
    Client(#[from] ClientError),

    #[error("Failed to save transfers: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to extract senders: {0}")]
    Extract(#[from] ExtractError),
}

/// Stage one: fetch every transfer, report it and persist the sorted log.
pub async fn run_fetch_stage(config: &Config) -> Result<FetchOutcome, PipelineError> {
    config.validate()?;

    info!(
        "Fetching token transfers for address {} (token contract {})",
        config.target_address, config.token_contract
    );

    let client = ExplorerClient::new(config)?;
    let fetcher = TransferFetcher::new(client, FetchSettings::from(config));
    let outcome = fetcher.fetch_all().await;

    persist_outcome(&outcome, &config.transfers_file, config.log_transfers)?;

    Ok(outcome)
}

/// Writes the fetched records unless there are none. Returns whether a file was written.
pub fn persist_outcome(outcome: &FetchOutcome, path: &Path, log_transfers: bool) -> Result<bool, StorageError> {
    if outcome.records.is_empty() {
        if outcome.is_complete() {
            info!("No transfers found; this address may have no matching transactions");
        } else {
            warn!("Fetch stopped before any transfers were retrieved: {}", outcome.stop);
        }
        return Ok(false);
    }

    info!(
        "Found {} transfers across {} pages, sorted oldest to newest",
        outcome.records.len(),
        outcome.pages_fetched
    );
    if !outcome.is_complete() {
        warn!("Transfer list is partial: {}", outcome.stop);
    }

    if log_transfers {
        report::log_transfers(&outcome.records);
    }

    storage::write_json_pretty(path, &outcome.records)?;
    info!("Saved transfers to {}", path.display());

    Ok(true)
}

/// Stage two: derive the sorted sender list from the persisted log.
pub fn run_extract_stage(config: &Config) -> Result<Vec<AddressEntry>, PipelineError> {
    let senders = extractor::extract_unique_senders(&config.transfers_file, &config.senders_file)?;
    Ok(senders)
}
