use crate::blockchain::models::{extract_record, RawTransaction, TxListResponse};
use crate::config::Config;
use crate::models::TransactionHistory;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected request: {0}")]
    Api(String),

    #[error("unexpected response payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// The single chain-data capability the scoring pipeline depends on.
/// Failures are transient from the caller's point of view; the fetch layer
/// owns retry and degradation.
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    async fn get_transactions(
        &self,
        address: &str,
        start_block: u64,
        end_block: u64,
        sort: SortOrder,
    ) -> Result<TransactionHistory, ProviderError>;
}

/// Etherscan-style JSON API client.
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl EtherscanClient {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        let limiter = config
            .provider_rate_limit
            .and_then(NonZeroU32::new)
            .map(|per_second| RateLimiter::direct(Quota::per_second(per_second)));

        info!(
            "Initializing transaction provider client for {} (rate limit: {:?}/s)",
            config.provider_api_url, config.provider_rate_limit
        );

        Ok(Self {
            http,
            base_url: config.provider_api_url.clone(),
            api_key: config.provider_api_key.clone(),
            limiter,
        })
    }
}

#[async_trait]
impl TransactionProvider for EtherscanClient {
    async fn get_transactions(
        &self,
        address: &str,
        start_block: u64,
        end_block: u64,
        sort: SortOrder,
    ) -> Result<TransactionHistory, ProviderError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let response: TxListResponse = self
            .http
            .get(&self.base_url)
            .query(&[
                ("module", "account".to_string()),
                ("action", "txlist".to_string()),
                ("address", address.to_string()),
                ("startblock", start_block.to_string()),
                ("endblock", end_block.to_string()),
                ("sort", sort.as_param().to_string()),
                ("apikey", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let items = match response.result {
            Value::Array(items) => items,
            Value::String(detail) => {
                // "No transactions found" arrives as status 0 but is a
                // legitimate empty history, not a failure.
                if response.message.contains("No transactions found")
                    || detail.contains("No transactions found")
                {
                    return Ok(Vec::new());
                }
                return Err(ProviderError::Api(detail));
            }
            other => {
                return Err(ProviderError::Payload(format!(
                    "unexpected result shape: {}",
                    other
                )))
            }
        };

        if response.status != "1" && !response.message.contains("No transactions found") {
            return Err(ProviderError::Api(response.message));
        }

        let mut history: TransactionHistory = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RawTransaction>(item) {
                Ok(raw) => extract_record(&raw),
                Err(e) => {
                    warn!("Skipping undecodable transaction record: {}", e);
                    None
                }
            })
            .collect();

        // Ascending order is a fetch-time invariant for downstream feature
        // derivation; enforce it rather than trusting the wire.
        if sort == SortOrder::Ascending {
            history.sort_by_key(|t| t.timestamp);
        }

        debug!(
            "Fetched {} transactions for {} (blocks {}-{})",
            history.len(),
            address,
            start_block,
            end_block
        );

        Ok(history)
    }
}
