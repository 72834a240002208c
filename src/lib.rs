pub mod api;
pub mod blockchain;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod features;
pub mod ml;
pub mod models;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::route::create_router;
pub use blockchain::{EtherscanClient, ProviderError, TransactionProvider};
pub use cache::{CacheStore, TransactionFetcher};
pub use models::{FetchOutcome, Prediction, TransactionHistory, TransactionRecord};
pub use validation::validate_eth_address;
