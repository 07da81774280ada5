use transfer_ledger::{config::Config, logging, pipeline};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing();

    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config.redacted());

    match pipeline::run_fetch_stage(&config).await {
        Ok(outcome) => {
            info!(
                "Fetch finished with {} transfers ({})",
                outcome.records.len(),
                outcome.stop
            );
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
