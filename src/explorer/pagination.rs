use crate::config::Config;
use crate::explorer::client::{ClientError, ExplorerApi};
use crate::explorer::models::{decode_page, ApiResponse};
use crate::models::{sort_by_timestamp, TransferRecord};
use backon::{ConstantBuilder, Retryable};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Pagination and retry knobs for one fetch run.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub page_size: u32,
    pub max_attempts: usize,
    pub page_delay: Duration,
    pub retry_backoff: Duration,
    pub rate_limit_backoff: Duration,
}

impl From<&Config> for FetchSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            max_attempts: config.max_attempts,
            page_delay: config.page_delay,
            retry_backoff: config.retry_backoff,
            rate_limit_backoff: config.rate_limit_backoff,
        }
    }
}

/// Why pagination stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The API has no transfers at all for this address/token.
    NoTransactions,
    /// A page came back empty.
    EmptyPage,
    /// A page shorter than the page size was the last one.
    LastPage,
    /// Non-success status other than "no data" or rate limiting.
    ApiError { status: String, message: String, result: String },
    /// `result` was not an array.
    UnexpectedResult(String),
    /// The body was not valid JSON.
    MalformedResponse(String),
    /// Every attempt for `page` failed.
    RetriesExhausted { page: u32, last_error: String },
}

impl StopReason {
    /// True when the explorer confirmed there is nothing more to fetch.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            StopReason::NoTransactions | StopReason::EmptyPage | StopReason::LastPage
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoTransactions => write!(f, "no transactions found for this address and token"),
            StopReason::EmptyPage => write!(f, "no more transactions"),
            StopReason::LastPage => write!(f, "reached the last page"),
            StopReason::ApiError { status, message, result } => write!(
                f,
                "API error: status {:?}, message {:?}, result {}",
                status, message, result
            ),
            StopReason::UnexpectedResult(result) => write!(f, "'result' is not a list: {}", result),
            StopReason::MalformedResponse(err) => write!(f, "malformed response: {}", err),
            StopReason::RetriesExhausted { page, last_error } => write!(
                f,
                "gave up on page {} after exhausting retries: {}",
                page, last_error
            ),
        }
    }
}

/// Accumulated transfers plus the reason the loop ended. Records are sorted
/// by timestamp whatever the reason.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<TransferRecord>,
    pub stop: StopReason,
    pub pages_fetched: u32,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.stop.is_complete()
    }
}

/// What one successful response means for the loop.
enum PageStep {
    Continue(Vec<TransferRecord>),
    Stop(Vec<TransferRecord>, StopReason),
}

/// Walks every `tokentx` page for the configured address and token.
pub struct TransferFetcher<A> {
    api: A,
    settings: FetchSettings,
}

impl<A: ExplorerApi> TransferFetcher<A> {
    pub fn new(api: A, settings: FetchSettings) -> Self {
        Self { api, settings }
    }

    /// Fetches pages from 1 until the API runs dry or stops cooperating.
    /// Never fails: errors end pagination and keep what was gathered.
    pub async fn fetch_all(&self) -> FetchOutcome {
        let mut records = Vec::new();
        let mut page = 1u32;
        let mut pages_fetched = 0u32;

        let stop = loop {
            info!("Fetching page {}...", page);

            let response = match self.fetch_page(page).await {
                Ok(response) => response,
                Err(ClientError::MalformedBody { source, body }) => {
                    error!("Failed to parse JSON response: {}", source);
                    debug!("Response text: {}", body);
                    break StopReason::MalformedResponse(source.to_string());
                }
                Err(e) => {
                    error!("Reached max retries, stopping fetch: {}", e);
                    break StopReason::RetriesExhausted {
                        page,
                        last_error: e.to_string(),
                    };
                }
            };
            pages_fetched += 1;

            match self.classify(response) {
                PageStep::Continue(batch) => {
                    debug!("Page {} returned a full batch of {}", page, batch.len());
                    records.extend(batch);
                    page += 1;
                    sleep(self.settings.page_delay).await;
                }
                PageStep::Stop(batch, reason) => {
                    records.extend(batch);
                    break reason;
                }
            }
        };

        if stop.is_complete() {
            info!("Stopped fetching: {}", stop);
        } else {
            warn!("Stopped fetching early: {}", stop);
        }

        sort_by_timestamp(&mut records);

        FetchOutcome {
            records,
            stop,
            pages_fetched,
        }
    }

    /// One page with bounded retries. Rate-limit responses come back as
    /// `ClientError::RateLimited` so they share the retry path with transport errors.
    async fn fetch_page(&self, page: u32) -> Result<ApiResponse, ClientError> {
        let retries = self.settings.max_attempts.saturating_sub(1);
        let backoff = ConstantBuilder::default()
            .with_delay(self.settings.retry_backoff)
            .with_max_times(retries);
        let rate_limit_backoff = self.settings.rate_limit_backoff;

        (move || async move { self.request_page(page).await })
            .retry(backoff)
            .when(ClientError::is_retryable)
            .adjust(move |err, delay| {
                delay.map(|d| match err {
                    ClientError::RateLimited(_) => rate_limit_backoff,
                    _ => d,
                })
            })
            .notify(|err, delay| {
                warn!("Page {} failed: {}. Retrying in {:?}", page, err, delay);
            })
            .await
    }

    async fn request_page(&self, page: u32) -> Result<ApiResponse, ClientError> {
        let response = self.api.token_transfers(page, self.settings.page_size).await?;

        if response.is_rate_limited() {
            return Err(ClientError::RateLimited(rate_limit_detail(&response)));
        }

        Ok(response)
    }

    fn classify(&self, response: ApiResponse) -> PageStep {
        if response.is_no_transactions() {
            return PageStep::Stop(Vec::new(), StopReason::NoTransactions);
        }

        if !response.is_ok() {
            let reason = StopReason::ApiError {
                status: response.status,
                message: response.message,
                result: response.result.to_string(),
            };
            error!("Error fetching data: {}", reason);
            return PageStep::Stop(Vec::new(), reason);
        }

        let items = match response.result {
            Value::Array(items) => items,
            other => {
                error!("API 'result' is not a list: {}", other);
                return PageStep::Stop(Vec::new(), StopReason::UnexpectedResult(other.to_string()));
            }
        };

        if items.is_empty() {
            return PageStep::Stop(Vec::new(), StopReason::EmptyPage);
        }

        let page = decode_page(items);
        if page.raw_len < self.settings.page_size as usize {
            PageStep::Stop(page.records, StopReason::LastPage)
        } else {
            PageStep::Continue(page.records)
        }
    }
}

fn rate_limit_detail(response: &ApiResponse) -> String {
    match response.result.as_str() {
        Some(result) if !result.is_empty() => format!("{} ({})", response.message, result),
        _ => response.message.clone(),
    }
}
