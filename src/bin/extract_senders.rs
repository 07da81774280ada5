use transfer_ledger::{config::Config, logging, pipeline};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing();

    let config = Config::from_env();
    info!(
        "Extracting senders from '{}' into '{}'",
        config.transfers_file.display(),
        config.senders_file.display()
    );

    if let Err(e) = pipeline::run_extract_stage(&config) {
        error!("{}", e);
        return Err(e.into());
    }

    Ok(())
}
