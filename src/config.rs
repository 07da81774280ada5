// Configuration for both stages:
// - Explorer endpoint, API key and the account/token pair to fetch
// - Pagination and retry tuning
// - Input/output file locations

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::validation::{validate_api_key, validate_evm_address, ValidationError};

pub const DEFAULT_API_URL: &str = "https://api.basescan.org/api";
pub const DEFAULT_TARGET_ADDRESS: &str = "0x0BDcA19c9801bb484285362fD5dd0c94592c874C";
/// USDC on Base
pub const DEFAULT_TOKEN_CONTRACT: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub target_address: String,
    pub token_contract: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub max_attempts: usize,
    pub page_delay: Duration,
    pub retry_backoff: Duration,
    pub rate_limit_backoff: Duration,
    pub transfers_file: PathBuf,
    pub senders_file: PathBuf,
    pub log_transfers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            target_address: DEFAULT_TARGET_ADDRESS.to_string(),
            token_contract: DEFAULT_TOKEN_CONTRACT.to_string(),
            page_size: 1000,
            request_timeout: Duration::from_secs(20),
            max_attempts: 3,
            page_delay: Duration::from_millis(300),
            retry_backoff: Duration::from_secs(5),
            rate_limit_backoff: Duration::from_secs(10),
            transfers_file: PathBuf::from("usdc_transactions_sorted.json"),
            senders_file: PathBuf::from("unique_from_addresses.json"),
            log_transfers: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        let api_url = env::var("EXPLORER_API_URL").unwrap_or(defaults.api_url);
        let api_key = env::var("EXPLORER_API_KEY").unwrap_or(defaults.api_key);
        let target_address = env::var("TARGET_ADDRESS").unwrap_or(defaults.target_address);
        let token_contract = env::var("TOKEN_CONTRACT_ADDRESS").unwrap_or(defaults.token_contract);
        let page_size = parse_or("PAGE_SIZE", env::var("PAGE_SIZE").ok(), defaults.page_size);
        let request_timeout = Duration::from_secs(parse_or(
            "REQUEST_TIMEOUT_SECS",
            env::var("REQUEST_TIMEOUT_SECS").ok(),
            defaults.request_timeout.as_secs(),
        ));
        let max_attempts = parse_or("MAX_ATTEMPTS", env::var("MAX_ATTEMPTS").ok(), defaults.max_attempts);
        let page_delay = Duration::from_millis(parse_or(
            "PAGE_DELAY_MS",
            env::var("PAGE_DELAY_MS").ok(),
            defaults.page_delay.as_millis() as u64,
        ));
        let retry_backoff = Duration::from_secs(parse_or(
            "RETRY_BACKOFF_SECS",
            env::var("RETRY_BACKOFF_SECS").ok(),
            defaults.retry_backoff.as_secs(),
        ));
        let rate_limit_backoff = Duration::from_secs(parse_or(
            "RATE_LIMIT_BACKOFF_SECS",
            env::var("RATE_LIMIT_BACKOFF_SECS").ok(),
            defaults.rate_limit_backoff.as_secs(),
        ));
        let transfers_file = env::var("TRANSFERS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.transfers_file);
        let senders_file = env::var("SENDERS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.senders_file);
        let log_transfers = parse_or("LOG_TRANSFERS", env::var("LOG_TRANSFERS").ok(), defaults.log_transfers);

        Self {
            api_url,
            api_key,
            target_address,
            token_contract,
            page_size,
            request_timeout,
            max_attempts,
            page_delay,
            retry_backoff,
            rate_limit_backoff,
            transfers_file,
            senders_file,
            log_transfers,
        }
    }

    /// Copy safe to log: the API key is masked.
    pub fn redacted(&self) -> Self {
        let api_key = if self.api_key.is_empty() {
            String::new()
        } else {
            "***".to_string()
        };
        Self {
            api_key,
            ..self.clone()
        }
    }

    /// Checks everything the fetcher needs before the first request goes out.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_api_key(&self.api_key)?;
        validate_evm_address("TARGET_ADDRESS", &self.target_address)?;
        validate_evm_address("TOKEN_CONTRACT_ADDRESS", &self.token_contract)?;

        if self.page_size == 0 {
            return Err(ValidationError::InvalidParameter("PAGE_SIZE must be positive".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidParameter("MAX_ATTEMPTS must be positive".to_string()));
        }

        Ok(())
    }
}

/// Parses an optional raw setting, keeping `default` when it is absent or unparsable.
pub fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value {:?} for {}", value, key);
            default
        }),
        None => default,
    }
}
