use crate::models::{parse_timestamp, TransferRecord, TIME_STAMP, TOKEN_DECIMAL, VALUE};
use chrono::DateTime;
use std::borrow::Cow;
use tracing::{info, warn};

const NOT_AVAILABLE: &str = "N/A";

/// Human-readable view of one transfer. Bad fields degrade to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSummary {
    pub unix_time: i64,
    pub readable_time: String,
    pub hash: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub symbol: String,
    pub block_number: String,
}

impl TransferSummary {
    pub fn from_record(tx: &TransferRecord) -> Self {
        let hash = or_na(tx.hash());

        let unix_time = parse_timestamp(tx.text(TIME_STAMP).as_deref()).unwrap_or_else(|| {
            warn!(
                "Transaction {} has an invalid timestamp: {:?}",
                hash,
                tx.text(TIME_STAMP).unwrap_or_default()
            );
            0
        });

        let amount = tx.adjusted_value().unwrap_or_else(|| {
            warn!(
                "Transaction {} has an invalid token decimal or value: decimal={:?}, value={:?}",
                hash,
                tx.text(TOKEN_DECIMAL),
                tx.text(VALUE)
            );
            0.0
        });

        Self {
            unix_time,
            readable_time: format_utc(unix_time),
            from: or_na(tx.sender()),
            to: or_na(tx.recipient()),
            symbol: or_na(tx.token_symbol()),
            block_number: or_na(tx.block_number()),
            hash,
            amount,
        }
    }

    pub fn render(&self, index: usize) -> String {
        format!(
            "--- Transaction {} ---\n\
             Time: {} (Unix: {})\n\
             Hash: {}\n\
             From: {}\n\
             To: {}\n\
             Amount: {} {}\n\
             Block: {}",
            index,
            self.readable_time,
            self.unix_time,
            self.hash,
            self.from,
            self.to,
            self.amount,
            self.symbol,
            self.block_number
        )
    }
}

/// Logs every transfer, numbered from 1.
pub fn log_transfers(records: &[TransferRecord]) {
    for (i, tx) in records.iter().enumerate() {
        info!("\n{}", TransferSummary::from_record(tx).render(i + 1));
    }
}

fn format_utc(unix_time: i64) -> String {
    DateTime::from_timestamp(unix_time, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn or_na(field: Option<Cow<'_, str>>) -> String {
    field.map_or_else(|| NOT_AVAILABLE.to_string(), Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summarises_a_usdc_transfer() {
        let tx: TransferRecord = serde_json::from_value(json!({
            "timeStamp": "1700000000",
            "hash": "0xfeed",
            "from": "0xA",
            "to": "0xB",
            "value": "12345678",
            "tokenDecimal": "6",
            "tokenSymbol": "USDC",
            "blockNumber": "7000000"
        }))
        .unwrap();

        let summary = TransferSummary::from_record(&tx);
        assert_eq!(summary.readable_time, "2023-11-14 22:13:20 UTC");
        assert_eq!(summary.amount, 12.345678);

        let rendered = summary.render(1);
        assert!(rendered.starts_with("--- Transaction 1 ---"));
        assert!(rendered.contains("Amount: 12.345678 USDC"));
        assert!(rendered.contains("Block: 7000000"));
    }

    #[test]
    fn broken_fields_fall_back_without_failing() {
        let tx: TransferRecord = serde_json::from_value(json!({
            "timeStamp": "yesterday",
            "value": "100",
            "tokenDecimal": "x"
        }))
        .unwrap();

        let summary = TransferSummary::from_record(&tx);
        assert_eq!(summary.unix_time, 0);
        assert_eq!(summary.readable_time, "1970-01-01 00:00:00 UTC");
        assert_eq!(summary.amount, 0.0);
        assert_eq!(summary.hash, "N/A");
        assert_eq!(summary.symbol, "N/A");
    }

    #[test]
    fn numeric_fields_render_like_strings() {
        let tx: TransferRecord = serde_json::from_value(json!({
            "timeStamp": 30,
            "hash": "0x1",
            "to": null,
            "value": "2000000",
            "tokenDecimal": 6,
            "blockNumber": 99
        }))
        .unwrap();

        let summary = TransferSummary::from_record(&tx);
        assert_eq!(summary.unix_time, 30);
        assert_eq!(summary.amount, 2.0);
        assert_eq!(summary.to, "N/A");
        assert_eq!(summary.block_number, "99");
    }
}
