//! Turns the labeled address rows into a feature matrix, label vector and
//! fitted imputer.

use crate::dataset::imputer::MedianImputer;
use crate::dataset::loader::{DatasetError, DatasetRow};
use crate::features::{extract, FeatureSource};
use crate::models::TransactionHistory;
use std::collections::HashSet;
use tracing::info;

/// Substituted when the dataset declares no legitimate addresses, so the
/// trainer never sees a single-class matrix from this source alone.
pub const FALLBACK_LEGIT_ADDRESSES: [&str; 3] = [
    "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D", // Uniswap V2 router
    "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", // WETH
    "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", // UNI token
];

pub struct DatasetBuild {
    pub matrix: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
    /// Fitted over the assembled matrix before imputation was applied.
    /// This exact instance must be persisted and reused at serve time.
    pub imputer: MedianImputer,
}

/// Assemble the training matrix. Extraction always runs in dataset mode
/// over an empty history: the labeled path relies entirely on the
/// dataset-native columns and never re-fetches chain data. Addresses
/// claimed by the scam list keep the fraud label; the legitimate list
/// skips them.
pub fn build(rows: &[DatasetRow]) -> Result<DatasetBuild, DatasetError> {
    let scam_rows: Vec<&DatasetRow> = rows.iter().filter(|r| r.flag == 1).collect();
    let legit_rows: Vec<&DatasetRow> = rows.iter().filter(|r| r.flag == 0).collect();

    let empty: TransactionHistory = Vec::new();
    let mut matrix = Vec::new();
    let mut labels: Vec<u8> = Vec::new();
    let mut claimed: HashSet<String> = HashSet::new();

    for &row in &scam_rows {
        let vector = extract(&empty, &row.address, FeatureSource::Dataset(row));
        matrix.push(vector.to_vec());
        labels.push(1);
        claimed.insert(row.address.to_lowercase());
    }

    if legit_rows.is_empty() {
        info!(
            "No legitimate addresses in the dataset; substituting {} fallback addresses",
            FALLBACK_LEGIT_ADDRESSES.len()
        );
        for address in FALLBACK_LEGIT_ADDRESSES {
            if claimed.contains(&address.to_lowercase()) {
                continue;
            }
            // No dataset row exists for these, so every field derives from
            // the empty history.
            let vector = extract(&empty, address, FeatureSource::ChainOnly);
            matrix.push(vector.to_vec());
            labels.push(0);
        }
    } else {
        for &row in &legit_rows {
            if claimed.contains(&row.address.to_lowercase()) {
                continue;
            }
            let vector = extract(&empty, &row.address, FeatureSource::Dataset(row));
            matrix.push(vector.to_vec());
            labels.push(0);
        }
    }

    if matrix.is_empty() {
        return Err(DatasetError::Empty);
    }

    let scam_count = labels.iter().filter(|&&l| l == 1).count();
    info!(
        "Assembled dataset: {} samples ({} scam, {} legitimate)",
        labels.len(),
        scam_count,
        labels.len() - scam_count
    );

    let imputer = MedianImputer::fit(&matrix);
    imputer.transform_matrix(&mut matrix);

    Ok(DatasetBuild {
        matrix,
        labels,
        imputer,
    })
}
