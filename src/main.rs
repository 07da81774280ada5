// Runs both stages back to back:
// - fetch the transfer log and save it
// - extract the unique senders from the saved file

use transfer_ledger::{config::Config, logging, pipeline};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing();

    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config.redacted());

    let outcome = pipeline::run_fetch_stage(&config).await.map_err(|e| {
        error!("{}", e);
        e
    })?;

    if outcome.records.is_empty() {
        info!("Nothing to extract");
        return Ok(());
    }

    pipeline::run_extract_stage(&config).map_err(|e| {
        error!("{}", e);
        e
    })?;

    Ok(())
}
