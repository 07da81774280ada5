pub mod client;
pub mod models;
pub mod pagination;

// Re-exports for convenience
pub use client::{ClientError, ExplorerApi, ExplorerClient};
pub use pagination::{FetchOutcome, FetchSettings, StopReason, TransferFetcher};
