use crate::models::AddressEntry;
use crate::storage::{self, StorageError};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Content of '{0}' is not a list of transactions")]
    NotAList(PathBuf),
}

/// Distinct `from` addresses of the transfers in `input`, ascending.
/// Elements that are not objects or lack a string `from` are skipped.
pub fn unique_senders(input: &Value) -> Option<Vec<AddressEntry>> {
    let transfers = input.as_array()?;
    let mut senders = BTreeSet::new();

    for tx in transfers {
        match tx.get("from").and_then(Value::as_str) {
            Some(from) => {
                senders.insert(from);
            }
            None => warn!("Skipping malformed transaction record: {}", tx),
        }
    }

    Some(senders.into_iter().map(AddressEntry::new).collect())
}

/// Reads the transfers file, writes the sender list and returns it.
/// Nothing is written when the input cannot be used.
pub fn extract_unique_senders(input: &Path, output: &Path) -> Result<Vec<AddressEntry>, ExtractError> {
    let transfers = storage::read_json(input)?;
    let senders = unique_senders(&transfers).ok_or_else(|| ExtractError::NotAList(input.to_path_buf()))?;

    storage::write_json_pretty(output, &senders)?;

    info!("Saved unique 'from' addresses to '{}'", output.display());
    info!("Found {} unique 'from' addresses", senders.len());

    Ok(senders)
}
