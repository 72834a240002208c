//! Shared fixtures: canned providers and dataset rows.

use crate::blockchain::client::{ProviderError, SortOrder, TransactionProvider};
use crate::cache::{CacheStore, RetryPolicy, TransactionFetcher};
use crate::dataset::DatasetRow;
use crate::models::{TransactionHistory, TransactionRecord};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Returns a fixed history and counts upstream calls. An optional delay
/// simulates provider latency for coalescing tests.
pub struct StaticProvider {
    pub history: TransactionHistory,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(history: TransactionHistory) -> Self {
        Self {
            history,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(history: TransactionHistory, delay: Duration) -> Self {
        Self {
            history,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionProvider for StaticProvider {
    async fn get_transactions(
        &self,
        _address: &str,
        _start_block: u64,
        _end_block: u64,
        _sort: SortOrder,
    ) -> Result<TransactionHistory, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.history.clone())
    }
}

/// Fails every call; counts attempts.
pub struct FailingProvider {
    pub calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionProvider for FailingProvider {
    async fn get_transactions(
        &self,
        _address: &str,
        _start_block: u64,
        _end_block: u64,
        _sort: SortOrder,
    ) -> Result<TransactionHistory, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Api("simulated outage".to_string()))
    }
}

/// Millisecond backoff so retry tests stay fast.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

pub async fn memory_fetcher(
    provider: Arc<dyn TransactionProvider>,
    policy: RetryPolicy,
) -> TransactionFetcher {
    let store = CacheStore::connect_in_memory()
        .await
        .expect("in-memory store");
    TransactionFetcher::new(provider, store, 100, policy)
}

pub fn record(
    from: &str,
    to: &str,
    value: u128,
    gas_price: u64,
    timestamp: i64,
) -> TransactionRecord {
    TransactionRecord {
        from: from.to_string(),
        to: to.to_string(),
        value,
        gas_price,
        timestamp,
        is_contract_creation: false,
    }
}

/// A dataset row with every feature cell populated, scaled off `base` so
/// rows are distinguishable.
pub fn full_row(address: &str, flag: u8, base: f64) -> DatasetRow {
    DatasetRow {
        address: address.to_string(),
        flag,
        total_transactions: Some(base),
        total_ether_received: Some(base * 2.0),
        unique_received_from: Some(base),
        unique_sent_to: Some(base / 2.0),
        total_ether_sent_contracts: Some(base / 4.0),
        avg_min_between_sent: Some(base * 3.0),
        erc20_total_ether_received: Some(base),
        erc20_total_ether_sent: Some(base / 2.0),
        erc20_uniq_sent_tokens: Some(1.0),
        erc20_uniq_rec_tokens: Some(2.0),
        total_ether_balance: Some(base),
        num_created_contracts: Some(0.0),
        time_diff_mins: Some(base * 10.0),
    }
}
