//! Transaction retrieval with two cache layers and bounded retry.
//!
//! Layering per fetch: moka in-memory map, then the SQLite store, then the
//! provider behind exponential backoff. Misses for the same key are
//! serialized through a per-key mutex so concurrent requests make one
//! upstream call; different keys proceed independently.

use crate::blockchain::client::{ProviderError, SortOrder, TransactionProvider};
use crate::cache::keys::TxCacheKey;
use crate::cache::store::CacheStore;
use crate::models::{FetchOutcome, TransactionHistory};
use backon::{ExponentialBuilder, Retryable};
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total provider attempts per miss, including the first.
    pub max_attempts: usize,
    /// First retry delay; doubles on each subsequent attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

pub struct TransactionFetcher {
    provider: Arc<dyn TransactionProvider>,
    store: CacheStore,
    memory: Cache<TxCacheKey, Arc<TransactionHistory>>,
    locks: Mutex<HashMap<TxCacheKey, Arc<Mutex<()>>>>,
    retry: RetryPolicy,
}

impl TransactionFetcher {
    pub fn new(
        provider: Arc<dyn TransactionProvider>,
        store: CacheStore,
        capacity: u64,
        retry: RetryPolicy,
    ) -> Self {
        // No TTL: cached history is kept until explicitly invalidated.
        let memory = Cache::builder()
            .max_capacity(capacity)
            .support_invalidation_closures()
            .build();

        Self {
            provider,
            store,
            memory,
            locks: Mutex::new(HashMap::new()),
            retry,
        }
    }

    /// Retrieve the history for an address over a block range. Never
    /// errors: exhausted retries degrade to an empty history with the
    /// `degraded` flag set, and nothing is cached for that case.
    pub async fn fetch(&self, address: &str, start_block: u64, end_block: u64) -> FetchOutcome {
        let key = TxCacheKey::new(address, start_block, end_block);

        if let Some(history) = self.memory.get(&key).await {
            debug!("Cache hit (memory) for {}", key);
            return FetchOutcome::fresh(history);
        }

        let lock = self.key_lock(&key).await;
        let outcome = {
            let _guard = lock.lock().await;
            self.fetch_locked(&key, address, start_block, end_block).await
        };
        self.locks.lock().await.remove(&key);
        outcome
    }

    async fn fetch_locked(
        &self,
        key: &TxCacheKey,
        address: &str,
        start_block: u64,
        end_block: u64,
    ) -> FetchOutcome {
        // A concurrent miss may have filled the caches while we waited.
        if let Some(history) = self.memory.get(key).await {
            debug!("Cache hit (memory) for {}", key);
            return FetchOutcome::fresh(history);
        }

        match self.store.get(key).await {
            Ok(Some(history)) => {
                debug!("Cache hit (store) for {}", key);
                let history = Arc::new(history);
                self.memory.insert(key.clone(), history.clone()).await;
                return FetchOutcome::fresh(history);
            }
            Ok(None) => {}
            // A broken store read is a miss, not a failed fetch.
            Err(e) => warn!("Cache store read failed for {}: {}", key, e),
        }

        debug!("Cache miss for {}", key);
        match self.fetch_with_retry(address, start_block, end_block).await {
            Ok(mut history) => {
                history.sort_by_key(|t| t.timestamp);
                let history = Arc::new(history);
                if let Err(e) = self.store.insert(key, &history).await {
                    warn!("Failed to persist history for {}: {}", key, e);
                }
                self.memory.insert(key.clone(), history.clone()).await;
                info!("Fetched {} transactions for {}", history.len(), key);
                FetchOutcome::fresh(history)
            }
            Err(e) => {
                error!("Max retries reached for {}: {}", key, e);
                FetchOutcome::degraded_empty()
            }
        }
    }

    async fn fetch_with_retry(
        &self,
        address: &str,
        start_block: u64,
        end_block: u64,
    ) -> Result<TransactionHistory, ProviderError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry.base_delay)
            .with_factor(2.0)
            .with_max_times(self.retry.max_attempts.saturating_sub(1));

        (|| async {
            self.provider
                .get_transactions(address, start_block, end_block, SortOrder::Ascending)
                .await
        })
        .retry(backoff)
        .notify(|err: &ProviderError, delay: Duration| {
            warn!(
                "Transaction fetch for {} failed: {} (next attempt in {:?})",
                address, err, delay
            );
        })
        .await
    }

    /// Drop every cached range for an address from both layers.
    pub async fn invalidate(&self, address: &str) {
        let normalized = address.to_lowercase();
        let _ = self
            .memory
            .invalidate_entries_if(move |key, _| key.address() == normalized);
        match self.store.invalidate_address(address).await {
            Ok(removed) => info!("Invalidated {} cached ranges for {}", removed, address),
            Err(e) => warn!("Cache store invalidation failed for {}: {}", address, e),
        }
    }

    async fn key_lock(&self, key: &TxCacheKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
