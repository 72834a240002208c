//! Feature extraction shared by the training and serving paths.
//!
//! The schema is a single static table of named extractors. Both the
//! dataset-mode path (training over labeled rows) and the live-mode path
//! (scoring a freshly fetched history) walk the same table in the same
//! order, so the two call sites cannot drift apart.

use crate::dataset::DatasetRow;
use crate::models::TransactionHistory;
use std::collections::HashSet;

pub const WEI_PER_ETHER: f64 = 1e18;

pub const FEATURE_COUNT: usize = 13;

/// Where feature values come from for one extraction call.
///
/// `Dataset` rows win over derivation wherever the labeled dataset defines
/// the column; `ChainOnly` derives everything from the fetched history.
#[derive(Debug, Clone, Copy)]
pub enum FeatureSource<'a> {
    Dataset(&'a DatasetRow),
    ChainOnly,
}

pub struct FeatureSpec {
    pub name: &'static str,
    derive: fn(&TransactionHistory, &str) -> f64,
    from_dataset: fn(&DatasetRow) -> Option<f64>,
}

/// The fixed feature schema. Order is part of the model contract: the
/// trained classifier, the imputer and the serving path all index by it.
pub static FEATURE_SCHEMA: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        name: "num_transactions",
        derive: tx_count,
        from_dataset: |row| Some(cell(row.total_transactions)),
    },
    FeatureSpec {
        name: "total_value",
        derive: total_value_ether,
        from_dataset: |row| Some(cell(row.total_ether_received)),
    },
    FeatureSpec {
        name: "avg_gas_price",
        derive: avg_gas_price,
        // The labeled dataset carries no gas column.
        from_dataset: |_| None,
    },
    FeatureSpec {
        name: "unique_senders",
        derive: unique_senders,
        from_dataset: |row| Some(cell(row.unique_received_from)),
    },
    FeatureSpec {
        name: "unique_receivers",
        derive: unique_receivers,
        from_dataset: |row| Some(cell(row.unique_sent_to)),
    },
    FeatureSpec {
        name: "contract_interactions",
        derive: contract_interactions,
        from_dataset: |row| Some(cell(row.total_ether_sent_contracts)),
    },
    FeatureSpec {
        name: "avg_transaction_interval",
        derive: avg_interval_mins,
        from_dataset: |row| Some(cell(row.avg_min_between_sent)),
    },
    FeatureSpec {
        name: "erc20_total_ether_received",
        derive: no_derivation,
        from_dataset: |row| Some(cell(row.erc20_total_ether_received)),
    },
    FeatureSpec {
        name: "erc20_total_ether_sent",
        derive: no_derivation,
        from_dataset: |row| Some(cell(row.erc20_total_ether_sent)),
    },
    FeatureSpec {
        name: "erc20_unique_tokens",
        derive: no_derivation,
        from_dataset: |row| Some(cell(row.erc20_uniq_sent_tokens) + cell(row.erc20_uniq_rec_tokens)),
    },
    FeatureSpec {
        name: "total_ether_balance",
        derive: no_derivation,
        from_dataset: |row| Some(cell(row.total_ether_balance)),
    },
    FeatureSpec {
        name: "num_created_contracts",
        derive: no_derivation,
        from_dataset: |row| Some(cell(row.num_created_contracts)),
    },
    FeatureSpec {
        name: "time_diff_mins",
        derive: no_derivation,
        from_dataset: |row| Some(cell(row.time_diff_mins)),
    },
];

/// Schema names in order, as owned strings for persistence in the bundle.
pub fn schema_columns() -> Vec<String> {
    FEATURE_SCHEMA.iter().map(|s| s.name.to_string()).collect()
}

/// A fresh, never-mutated vector of the 13 schema values in schema order.
/// NaN marks a missing dataset cell and is resolved later by the imputer;
/// live derivation never produces NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_SCHEMA
            .iter()
            .position(|s| s.name == name)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_SCHEMA
            .iter()
            .zip(self.values.iter())
            .map(|(s, v)| (s.name, *v))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }
}

/// Map a transaction history (plus, in dataset mode, the labeled row) onto
/// the fixed schema. Pure: no side effects, same inputs give the same
/// vector.
pub fn extract(
    history: &TransactionHistory,
    address: &str,
    source: FeatureSource<'_>,
) -> FeatureVector {
    let mut values = [0.0; FEATURE_COUNT];
    for (i, spec) in FEATURE_SCHEMA.iter().enumerate() {
        values[i] = match source {
            FeatureSource::Dataset(row) => {
                (spec.from_dataset)(row).unwrap_or_else(|| (spec.derive)(history, address))
            }
            FeatureSource::ChainOnly => (spec.derive)(history, address),
        };
    }
    FeatureVector { values }
}

// A missing cell stays missing: it flows to the imputer as NaN rather than
// being silently zeroed.
fn cell(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

fn tx_count(history: &TransactionHistory, _address: &str) -> f64 {
    history.len() as f64
}

fn total_value_ether(history: &TransactionHistory, _address: &str) -> f64 {
    history.iter().map(|t| t.value as f64).sum::<f64>() / WEI_PER_ETHER
}

// Averaged fields follow the empty-history-is-zero convention, never NaN.
fn avg_gas_price(history: &TransactionHistory, _address: &str) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    history.iter().map(|t| t.gas_price as f64).sum::<f64>() / history.len() as f64
}

fn unique_senders(history: &TransactionHistory, _address: &str) -> f64 {
    history
        .iter()
        .map(|t| t.from.to_lowercase())
        .collect::<HashSet<_>>()
        .len() as f64
}

fn unique_receivers(history: &TransactionHistory, _address: &str) -> f64 {
    history
        .iter()
        .map(|t| t.to.to_lowercase())
        .collect::<HashSet<_>>()
        .len() as f64
}

fn contract_interactions(history: &TransactionHistory, address: &str) -> f64 {
    history
        .iter()
        .filter(|t| t.to.eq_ignore_ascii_case(address))
        .count() as f64
}

/// Mean gap between consecutive transactions in minutes. Histories arrive
/// sorted ascending, so consecutive deltas are non-negative. Fewer than two
/// records leave no interval to average.
fn avg_interval_mins(history: &TransactionHistory, _address: &str) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }
    let total_secs: i64 = history
        .windows(2)
        .map(|pair| pair[1].timestamp - pair[0].timestamp)
        .sum();
    total_secs as f64 / (history.len() - 1) as f64 / 60.0
}

// ERC-20 aggregates, balance, created-contract count and time span cannot
// be derived from a normal-transaction history; live-mode scores carry 0
// here, a known feature-quality gap for non-dataset addresses.
fn no_derivation(_history: &TransactionHistory, _address: &str) -> f64 {
    0.0
}
