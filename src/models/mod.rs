// Transfer records as returned by the explorer and persisted to disk,
// plus the single-field sender entries produced by the extractor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Decimals assumed when a record carries no `tokenDecimal` (USDC uses 6).
pub const DEFAULT_TOKEN_DECIMALS: u32 = 6;

pub const TIME_STAMP: &str = "timeStamp";
pub const HASH: &str = "hash";
pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const VALUE: &str = "value";
pub const TOKEN_DECIMAL: &str = "tokenDecimal";
pub const TOKEN_SYMBOL: &str = "tokenSymbol";
pub const BLOCK_NUMBER: &str = "blockNumber";

/// One token-transfer event, stored exactly as the explorer sent it so the
/// persisted file keeps every key, value type and explicit `null`. Typed
/// views are read on demand and accept both strings and numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferRecord {
    fields: Map<String, Value>,
}

impl TransferRecord {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Text form of a field. Numbers and booleans are rendered, `null` reads as absent.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    pub fn hash(&self) -> Option<Cow<'_, str>> {
        self.text(HASH)
    }

    pub fn sender(&self) -> Option<Cow<'_, str>> {
        self.text(FROM)
    }

    pub fn recipient(&self) -> Option<Cow<'_, str>> {
        self.text(TO)
    }

    pub fn token_symbol(&self) -> Option<Cow<'_, str>> {
        self.text(TOKEN_SYMBOL)
    }

    pub fn block_number(&self) -> Option<Cow<'_, str>> {
        self.text(BLOCK_NUMBER)
    }

    /// Seconds since epoch, 0 when missing or unparsable.
    pub fn timestamp(&self) -> i64 {
        parse_timestamp(self.text(TIME_STAMP).as_deref()).unwrap_or(0)
    }

    /// `value / 10^tokenDecimal`, or `None` when either field does not parse.
    pub fn adjusted_value(&self) -> Option<f64> {
        adjusted_value(
            self.text(VALUE).as_deref(),
            self.text(TOKEN_DECIMAL).as_deref(),
        )
    }

    /// Display amount; 0.0 whenever the raw fields are unusable.
    pub fn display_value(&self) -> f64 {
        self.adjusted_value().unwrap_or(0.0)
    }
}

/// Parses a numeric-string timestamp. A missing field reads as `"0"`.
pub fn parse_timestamp(raw: Option<&str>) -> Option<i64> {
    raw.unwrap_or("0").trim().parse().ok()
}

/// Missing decimals fall back to the default; present-but-garbage decimals are an error.
pub fn parse_decimals(raw: Option<&str>) -> Option<u32> {
    match raw {
        Some(decimals) => decimals.trim().parse().ok(),
        None => Some(DEFAULT_TOKEN_DECIMALS),
    }
}

/// Integer amount of any width (token amounts are uint256), as `f64`.
pub fn parse_raw_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let digits = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Decimal-adjusted amount. A missing raw value reads as `"0"`.
pub fn adjusted_value(raw_value: Option<&str>, raw_decimals: Option<&str>) -> Option<f64> {
    let decimals = parse_decimals(raw_decimals)?;
    let value = parse_raw_amount(raw_value.unwrap_or("0"))?;
    let exponent = i32::try_from(decimals).ok()?;
    Some(value / 10f64.powi(exponent))
}

/// Stable ascending sort by timestamp; unparsable timestamps sort first as 0.
pub fn sort_by_timestamp(records: &mut [TransferRecord]) {
    records.sort_by_key(TransferRecord::timestamp);
}

/// One distinct sender address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddressEntry {
    pub from: String,
}

impl AddressEntry {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}
