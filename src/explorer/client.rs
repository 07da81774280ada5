use crate::config::Config;
use crate::explorer::models::ApiResponse;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    #[error("Failed to parse JSON response: {source}")]
    MalformedBody {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl ClientError {
    /// Timeouts, transport failures and rate limiting are worth another attempt;
    /// a body that does not parse is not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::MalformedBody { .. })
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else {
            ClientError::Transport(err)
        }
    }
}

/// Source of `tokentx` pages.
pub trait ExplorerApi {
    fn token_transfers(
        &self,
        page: u32,
        offset: u32,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;
}

/// HTTP client for an Etherscan-family `account/tokentx` endpoint.
pub struct ExplorerClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    address: String,
    contract_address: String,
}

impl ExplorerClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        info!(
            "Initializing explorer client for {} (timeout {:?})",
            config.api_url, config.request_timeout
        );

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            address: config.target_address.clone(),
            contract_address: config.token_contract.clone(),
        })
    }

    fn query(&self, page: u32, offset: u32) -> Vec<(&'static str, String)> {
        vec![
            ("module", "account".to_string()),
            ("action", "tokentx".to_string()),
            ("contractaddress", self.contract_address.clone()),
            ("address", self.address.clone()),
            ("page", page.to_string()),
            ("offset", offset.to_string()),
            ("apikey", self.api_key.clone()),
        ]
    }
}

impl ExplorerApi for ExplorerClient {
    async fn token_transfers(&self, page: u32, offset: u32) -> Result<ApiResponse, ClientError> {
        let request = self
            .http
            .get(&self.api_url)
            .query(&self.query(page, offset))
            .build()?;

        debug!("Request URL: {}", redact_api_key(request.url().as_str(), &self.api_key));

        let body = self
            .http
            .execute(request)
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(ClientError::from_reqwest)?
            .text()
            .await
            .map_err(ClientError::from_reqwest)?;

        serde_json::from_str(&body).map_err(|source| ClientError::MalformedBody { source, body })
    }
}

fn redact_api_key(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        url.to_string()
    } else {
        url.replace(api_key, "***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_carries_every_tokentx_parameter() {
        let config = Config {
            api_key: "SECRET".to_string(),
            ..Config::default()
        };
        let client = ExplorerClient::new(&config).unwrap();
        let query = client.query(3, 1000);

        let keys: Vec<_> = query.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            ["module", "action", "contractaddress", "address", "page", "offset", "apikey"]
        );
        assert!(query.contains(&("action", "tokentx".to_string())));
        assert!(query.contains(&("page", "3".to_string())));
        assert!(query.contains(&("offset", "1000".to_string())));
    }

    #[test]
    fn api_key_is_redacted_from_logged_urls() {
        let url = "https://api.basescan.org/api?module=account&apikey=SECRET";
        assert_eq!(
            redact_api_key(url, "SECRET"),
            "https://api.basescan.org/api?module=account&apikey=***"
        );
        assert_eq!(redact_api_key(url, ""), url);
    }

    #[test]
    fn only_malformed_bodies_are_final() {
        let parse_err = serde_json::from_str::<ApiResponse>("<html>").unwrap_err();
        let malformed = ClientError::MalformedBody {
            source: parse_err,
            body: "<html>".to_string(),
        };
        assert!(!malformed.is_retryable());
        assert!(ClientError::RateLimited("NOTOK".to_string()).is_retryable());
    }
}
