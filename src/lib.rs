pub mod config;
pub mod explorer;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod storage;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use config::Config;
pub use explorer::{ExplorerApi, ExplorerClient, FetchOutcome, StopReason, TransferFetcher};
pub use extractor::{extract_unique_senders, ExtractError};
pub use models::{AddressEntry, TransferRecord};
pub use validation::ValidationError;
