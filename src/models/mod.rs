// Define TransactionRecord and the API request/response models
// Implement serialization/deserialization for the cache store and HTTP layer

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One normal transaction as fetched from the chain data provider.
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub from: String,
    pub to: String,
    /// Value in wei. Wei amounts overflow u64, and JSON numbers overflow
    /// before u128 does, so the serialized form keeps the wire's string shape.
    #[serde(with = "wei_string")]
    pub value: u128,
    /// Gas price in wei.
    pub gas_price: u64,
    /// Unix seconds.
    pub timestamp: i64,
    pub is_contract_creation: bool,
}

/// Transaction history for one address, ascending by timestamp.
/// An empty history is valid and distinct from "not yet fetched".
pub type TransactionHistory = Vec<TransactionRecord>;

/// Result of a cache/fetch round trip. `degraded` marks a history that is
/// empty because every retry against the provider failed, as opposed to an
/// address that genuinely has no transactions.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub history: Arc<TransactionHistory>,
    pub degraded: bool,
}

impl FetchOutcome {
    pub fn fresh(history: Arc<TransactionHistory>) -> Self {
        Self {
            history,
            degraded: false,
        }
    }

    pub fn degraded_empty() -> Self {
        Self {
            history: Arc::new(Vec::new()),
            degraded: true,
        }
    }
}

/// A named numeric value; keeps the schema order intact in JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

/// Scoring response returned by the prediction endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub contract_address: String,
    pub is_fraudulent: bool,
    pub fraud_probability: f64,
    pub confidence: f64,
    pub feature_importance: Vec<NamedValue>,
    pub features_analyzed: Vec<NamedValue>,
    /// True when the transaction fetch exhausted its retries and the score
    /// was computed over an empty history.
    pub fetch_degraded: bool,
    pub model_type: String,
}

mod wei_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
