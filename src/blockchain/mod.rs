pub mod client;
pub mod models;

pub use client::{EtherscanClient, ProviderError, SortOrder, TransactionProvider};
pub use models::{extract_record, RawTransaction, TxListResponse};
