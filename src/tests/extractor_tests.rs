//! tests/extractor_tests.rs - Sender extraction from a saved transfers file

#[cfg(test)]
mod tests {
    use crate::{
        explorer::{FetchOutcome, StopReason},
        extractor::{extract_unique_senders, unique_senders, ExtractError},
        models::{AddressEntry, TransferRecord},
        pipeline::persist_outcome,
        storage::StorageError,
    };
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("usdc_transactions_sorted.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn duplicates_collapse_and_sort() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, r#"[{"from":"0xA"},{"from":"0xB"},{"from":"0xA"}]"#);
        let output = dir.path().join("unique_from_addresses.json");

        let senders = extract_unique_senders(&input, &output).unwrap();

        assert_eq!(senders, vec![AddressEntry::new("0xA"), AddressEntry::new("0xB")]);
        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, json!([{ "from": "0xA" }, { "from": "0xB" }]));
    }

    #[test]
    fn case_variants_stay_distinct() {
        let senders = unique_senders(&json!([
            { "from": "0xabc" },
            { "from": "0xABC" },
            { "from": "0xabc" }
        ]))
        .unwrap();

        assert_eq!(senders, vec![AddressEntry::new("0xABC"), AddressEntry::new("0xabc")]);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let senders = unique_senders(&json!([
            { "from": "0xB", "to": "0xT" },
            "not a record",
            { "to": "0xT" },
            42,
            { "from": "0xA" }
        ]))
        .unwrap();

        assert_eq!(senders, vec![AddressEntry::new("0xA"), AddressEntry::new("0xB")]);
    }

    #[test]
    fn object_input_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, r#"{"from":"0xA"}"#);
        let output = dir.path().join("unique_from_addresses.json");

        let err = extract_unique_senders(&input, &output).unwrap_err();

        assert!(matches!(err, ExtractError::NotAList(_)));
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("unique_from_addresses.json");

        let err = extract_unique_senders(&dir.path().join("absent.json"), &output).unwrap_err();

        assert!(matches!(err, ExtractError::Storage(StorageError::NotFound(_))));
        assert!(!output.exists());
    }

    #[test]
    fn invalid_json_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "[{\"from\": ");
        let output = dir.path().join("unique_from_addresses.json");

        let err = extract_unique_senders(&input, &output).unwrap_err();

        assert!(matches!(err, ExtractError::Storage(StorageError::Json { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn fetched_log_feeds_the_extractor() {
        let dir = tempfile::tempdir().unwrap();
        let transfers_file = dir.path().join("usdc_transactions_sorted.json");
        let senders_file = dir.path().join("unique_from_addresses.json");

        let records: Vec<TransferRecord> = serde_json::from_value(json!([
            { "timeStamp": "1", "hash": "0x1", "from": "0xB", "to": "0xT", "value": "1", "tokenDecimal": "6" },
            { "timeStamp": "2", "hash": "0x2", "from": "0xA", "to": "0xT", "value": "2", "tokenDecimal": "x" },
            { "timeStamp": "3", "hash": "0x3", "from": "0xB", "to": "0xT", "value": "3", "tokenDecimal": "6" }
        ]))
        .unwrap();
        let outcome = FetchOutcome {
            records,
            stop: StopReason::LastPage,
            pages_fetched: 1,
        };

        assert!(persist_outcome(&outcome, &transfers_file, true).unwrap());

        let saved: Value = serde_json::from_str(&fs::read_to_string(&transfers_file).unwrap()).unwrap();
        assert_eq!(saved[1]["tokenDecimal"], json!("x"));
        assert_eq!(saved[2]["value"], json!("3"));

        let senders = extract_unique_senders(&transfers_file, &senders_file).unwrap();
        assert_eq!(senders, vec![AddressEntry::new("0xA"), AddressEntry::new("0xB")]);
    }

    #[test]
    fn empty_outcome_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let transfers_file = dir.path().join("usdc_transactions_sorted.json");

        let outcome = FetchOutcome {
            records: Vec::new(),
            stop: StopReason::RetriesExhausted {
                page: 1,
                last_error: "timeout".to_string(),
            },
            pages_fetched: 0,
        };

        assert!(!persist_outcome(&outcome, &transfers_file, false).unwrap());
        assert!(!transfers_file.exists());
    }
}
