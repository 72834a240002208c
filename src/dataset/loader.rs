//! Labeled dataset loading from the flat CSV file.

use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("labeled dataset produced no usable rows")]
    Empty,
}

/// One row of the labeled address dataset. Column names follow the source
/// CSV verbatim, including its leading-space ERC20 headers. Every feature
/// cell is optional: an empty cell deserializes to `None` and is treated as
/// a missing value downstream, not as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetRow {
    #[serde(rename = "Address")]
    pub address: String,

    /// 1 = known scam, 0 = legitimate.
    #[serde(rename = "FLAG")]
    pub flag: u8,

    #[serde(rename = "total transactions (including tnx to create contract", default)]
    pub total_transactions: Option<f64>,

    #[serde(rename = "total ether received", default)]
    pub total_ether_received: Option<f64>,

    #[serde(rename = "Unique Received From Addresses", default)]
    pub unique_received_from: Option<f64>,

    #[serde(rename = "Unique Sent To Addresses", default)]
    pub unique_sent_to: Option<f64>,

    #[serde(rename = "total ether sent contracts", default)]
    pub total_ether_sent_contracts: Option<f64>,

    #[serde(rename = "Avg min between sent tnx", default)]
    pub avg_min_between_sent: Option<f64>,

    #[serde(rename = " ERC20 total Ether received", default)]
    pub erc20_total_ether_received: Option<f64>,

    #[serde(rename = " ERC20 total ether sent", default)]
    pub erc20_total_ether_sent: Option<f64>,

    #[serde(rename = " ERC20 uniq sent token name", default)]
    pub erc20_uniq_sent_tokens: Option<f64>,

    #[serde(rename = " ERC20 uniq rec token name", default)]
    pub erc20_uniq_rec_tokens: Option<f64>,

    #[serde(rename = "total ether balance", default)]
    pub total_ether_balance: Option<f64>,

    #[serde(rename = "Number of Created Contracts", default)]
    pub num_created_contracts: Option<f64>,

    #[serde(rename = "Time Diff between first and last (Mins)", default)]
    pub time_diff_mins: Option<f64>,
}

/// Load the labeled dataset, skipping rows that fail to deserialize.
pub fn load_rows(path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.deserialize::<DatasetRow>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("Skipping malformed dataset row: {}", e);
                skipped += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    let scam = rows.iter().filter(|r| r.flag == 1).count();
    info!(
        "Loaded {} dataset rows ({} scam, {} legitimate, {} skipped)",
        rows.len(),
        scam,
        rows.len() - scam,
        skipped
    );

    Ok(rows)
}
