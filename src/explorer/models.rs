use serde::Deserialize;
use serde_json::Value;

use crate::models::TransferRecord;

pub const STATUS_OK: &str = "1";
pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";
pub const RATE_LIMIT_MARKER: &str = "Max rate limit reached";

/// Envelope shared by every Etherscan-family endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn is_no_transactions(&self) -> bool {
        !self.is_ok() && self.message == NO_TRANSACTIONS_MESSAGE
    }

    /// The marker shows up in `message` on some deployments and in a string
    /// `result` (with `message: "NOTOK"`) on others.
    pub fn is_rate_limited(&self) -> bool {
        if self.is_ok() {
            return false;
        }
        self.message.contains(RATE_LIMIT_MARKER)
            || self
                .result
                .as_str()
                .is_some_and(|result| result.contains(RATE_LIMIT_MARKER))
    }
}

/// A page of transfers decoded from `result`.
#[derive(Debug, Default)]
pub struct TransferPage {
    pub records: Vec<TransferRecord>,
    /// Element count as sent by the API, including skipped elements.
    pub raw_len: usize,
}

/// Every object becomes a record as-is; anything else is skipped.
pub fn decode_page(items: Vec<Value>) -> TransferPage {
    let raw_len = items.len();
    let mut records = Vec::with_capacity(raw_len);

    for item in items {
        match item {
            Value::Object(fields) => records.push(TransferRecord::from_fields(fields)),
            other => tracing::warn!("Skipping non-object transfer record: {}", other),
        }
    }

    TransferPage { records, raw_len }
}
