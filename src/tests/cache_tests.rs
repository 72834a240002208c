//! Fetch-layer behavior: caching, retry bounds, degradation and the wire
//! record conversion.

use crate::blockchain::models::{extract_record, RawTransaction};
use crate::cache::{CacheStore, TransactionFetcher, TxCacheKey};
use crate::tests::support::{fast_retry, memory_fetcher, record, FailingProvider, StaticProvider};
use std::sync::Arc;
use std::time::Duration;

const ADDR: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";

fn sample_history() -> Vec<crate::models::TransactionRecord> {
    vec![
        record("0xaa", ADDR, 1_000, 10, 100),
        record("0xbb", "0xcc", 2_000, 20, 200),
    ]
}

#[tokio::test]
async fn second_fetch_hits_cache_with_zero_upstream_calls() {
    let provider = Arc::new(StaticProvider::new(sample_history()));
    let fetcher = memory_fetcher(provider.clone(), fast_retry()).await;

    let first = fetcher.fetch(ADDR, 0, 100).await;
    let second = fetcher.fetch(ADDR, 0, 100).await;

    assert_eq!(*first.history, *second.history);
    assert!(!first.degraded && !second.degraded);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn exhausted_retries_degrade_to_empty_history() {
    let provider = Arc::new(FailingProvider::new());
    let fetcher = memory_fetcher(provider.clone(), fast_retry()).await;

    let outcome = fetcher.fetch(ADDR, 0, 100).await;

    assert!(outcome.history.is_empty());
    assert!(outcome.degraded);
    // Exactly the attempt budget, no more.
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn degraded_outcome_is_not_cached() {
    let provider = Arc::new(FailingProvider::new());
    let fetcher = memory_fetcher(provider.clone(), fast_retry()).await;

    let first = fetcher.fetch(ADDR, 0, 100).await;
    let second = fetcher.fetch(ADDR, 0, 100).await;

    assert!(first.degraded && second.degraded);
    // Both fetches went upstream with the full attempt budget.
    assert_eq!(provider.call_count(), 6);
}

#[tokio::test]
async fn store_survives_a_fetcher_restart() {
    let store = CacheStore::connect_in_memory().await.expect("store");

    let warm_provider = Arc::new(StaticProvider::new(sample_history()));
    let warm = TransactionFetcher::new(warm_provider.clone(), store.clone(), 100, fast_retry());
    let first = warm.fetch(ADDR, 0, 100).await;
    assert_eq!(warm_provider.call_count(), 1);

    // New fetcher, cold memory layer, same store: served from disk.
    let cold_provider = Arc::new(StaticProvider::new(Vec::new()));
    let cold = TransactionFetcher::new(cold_provider.clone(), store, 100, fast_retry());
    let second = cold.fetch(ADDR, 0, 100).await;

    assert_eq!(*first.history, *second.history);
    assert_eq!(cold_provider.call_count(), 0);
}

#[tokio::test]
async fn concurrent_misses_for_one_key_coalesce() {
    let provider = Arc::new(StaticProvider::with_delay(
        sample_history(),
        Duration::from_millis(50),
    ));
    let fetcher = Arc::new(memory_fetcher(provider.clone(), fast_retry()).await);

    let a = tokio::spawn({
        let fetcher = fetcher.clone();
        async move { fetcher.fetch(ADDR, 0, 100).await }
    });
    let b = tokio::spawn({
        let fetcher = fetcher.clone();
        async move { fetcher.fetch(ADDR, 0, 100).await }
    });

    let (a, b) = (a.await.expect("task a"), b.await.expect("task b"));
    assert_eq!(*a.history, *b.history);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn block_range_is_part_of_the_key() {
    let provider = Arc::new(StaticProvider::new(sample_history()));
    let fetcher = memory_fetcher(provider.clone(), fast_retry()).await;

    fetcher.fetch(ADDR, 0, 100).await;
    fetcher.fetch(ADDR, 0, 200).await;

    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn invalidation_clears_both_layers() {
    let provider = Arc::new(StaticProvider::new(sample_history()));
    let fetcher = memory_fetcher(provider.clone(), fast_retry()).await;

    fetcher.fetch(ADDR, 0, 100).await;
    fetcher.invalidate(ADDR).await;
    fetcher.fetch(ADDR, 0, 100).await;

    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn empty_history_is_cached_as_present() {
    let provider = Arc::new(StaticProvider::new(Vec::new()));
    let fetcher = memory_fetcher(provider.clone(), fast_retry()).await;

    let first = fetcher.fetch(ADDR, 0, 100).await;
    let second = fetcher.fetch(ADDR, 0, 100).await;

    // A genuinely empty history is a successful result, distinct from a
    // degraded one, and is cached like any other.
    assert!(first.history.is_empty() && !first.degraded);
    assert!(second.history.is_empty() && !second.degraded);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn addresses_share_entries_across_case() {
    let provider = Arc::new(StaticProvider::new(sample_history()));
    let fetcher = memory_fetcher(provider.clone(), fast_retry()).await;

    fetcher.fetch(&ADDR.to_lowercase(), 0, 100).await;
    fetcher.fetch(&ADDR.to_uppercase().replace("0X", "0x"), 0, 100).await;

    assert_eq!(provider.call_count(), 1);
}

#[test]
fn cache_key_display_includes_range() {
    let key = TxCacheKey::new(ADDR, 5, 10);
    let rendered = key.to_string();
    assert!(rendered.contains(&ADDR.to_lowercase()));
    assert!(rendered.ends_with(":5:10"));
}

#[test]
fn wire_record_conversion() {
    let raw = RawTransaction {
        from: "0xaa".to_string(),
        to: "0xbb".to_string(),
        value: "1000000000000000000".to_string(),
        gas_price: "20000000000".to_string(),
        time_stamp: "1600000000".to_string(),
        contract_address: String::new(),
    };
    let record = extract_record(&raw).expect("valid record");
    assert_eq!(record.value, 1_000_000_000_000_000_000);
    assert_eq!(record.gas_price, 20_000_000_000);
    assert_eq!(record.timestamp, 1_600_000_000);
    assert!(!record.is_contract_creation);
}

#[test]
fn wire_record_contract_creation_flag() {
    let raw = RawTransaction {
        from: "0xaa".to_string(),
        to: String::new(),
        value: "0".to_string(),
        gas_price: String::new(),
        time_stamp: "1600000000".to_string(),
        contract_address: "0xdeployed".to_string(),
    };
    let record = extract_record(&raw).expect("valid record");
    assert!(record.is_contract_creation);
    // Missing gas price defaults instead of dropping the record.
    assert_eq!(record.gas_price, 0);
}

#[test]
fn wire_record_with_garbage_value_is_dropped() {
    let raw = RawTransaction {
        from: "0xaa".to_string(),
        to: "0xbb".to_string(),
        value: "not-a-number".to_string(),
        gas_price: "1".to_string(),
        time_stamp: "1600000000".to_string(),
        contract_address: String::new(),
    };
    assert!(extract_record(&raw).is_none());
}
