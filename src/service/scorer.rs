//! Live scoring: fetch, extract, align, impute, predict.

use crate::cache::TransactionFetcher;
use crate::features::{extract, FeatureSource, FeatureVector};
use crate::ml::{ModelBundle, MODEL_TYPE};
use crate::models::{NamedValue, Prediction};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ScoreError {
    /// The live extraction no longer produces a column the model was
    /// trained on. This is an extraction regression and must surface, not
    /// be zero-filled away.
    #[error("feature '{column}' missing from live extraction; trained schema cannot be satisfied")]
    SchemaMismatch { column: String },
}

/// Immutable scoring context: the loaded bundle plus the fetch layer.
/// Constructed once at startup and shared read-only across requests.
pub struct FraudScorer {
    bundle: Arc<ModelBundle>,
    fetcher: Arc<TransactionFetcher>,
    start_block: u64,
    end_block: u64,
}

impl FraudScorer {
    pub fn new(
        bundle: Arc<ModelBundle>,
        fetcher: Arc<TransactionFetcher>,
        start_block: u64,
        end_block: u64,
    ) -> Self {
        Self {
            bundle,
            fetcher,
            start_block,
            end_block,
        }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Score one address. No retries here: fetch failures were already
    /// absorbed into a degraded empty history by the fetch layer.
    pub async fn score(&self, address: &str) -> Result<Prediction, ScoreError> {
        let outcome = self
            .fetcher
            .fetch(address, self.start_block, self.end_block)
            .await;
        if outcome.degraded {
            warn!(
                "Scoring {} over a degraded empty history; result reflects no chain data",
                address
            );
        }

        let features = extract(&outcome.history, address, FeatureSource::ChainOnly);
        let raw = align_columns(&features, &self.bundle.columns)?;

        // The persisted imputer's statistics, never a refit on request data.
        let row = self.bundle.imputer.transform_row(&raw);

        let probabilities = self.bundle.model.predict_proba(&row);
        let label = self.bundle.model.predict(&row);

        let importances = self.bundle.model.feature_importances();
        let feature_importance = self
            .bundle
            .columns
            .iter()
            .zip(importances.iter())
            .map(|(name, &value)| NamedValue {
                name: name.clone(),
                value,
            })
            .collect();
        let features_analyzed = self
            .bundle
            .columns
            .iter()
            .zip(row.iter())
            .map(|(name, &value)| NamedValue {
                name: name.clone(),
                value,
            })
            .collect();

        let prediction = Prediction {
            contract_address: address.to_string(),
            is_fraudulent: label == 1,
            fraud_probability: probabilities[1],
            confidence: probabilities[0].max(probabilities[1]),
            feature_importance,
            features_analyzed,
            fetch_degraded: outcome.degraded,
            model_type: MODEL_TYPE.to_string(),
        };

        info!(
            "Prediction for {}: fraudulent={} probability={:.4} confidence={:.4} degraded={}",
            address,
            prediction.is_fraudulent,
            prediction.fraud_probability,
            prediction.confidence,
            prediction.fetch_degraded
        );

        Ok(prediction)
    }
}

/// Reorder a live feature vector into the column order recorded at
/// training time. Absent columns fail loudly.
pub fn align_columns(features: &FeatureVector, columns: &[String]) -> Result<Vec<f64>, ScoreError> {
    columns
        .iter()
        .map(|column| {
            features.get(column).ok_or_else(|| ScoreError::SchemaMismatch {
                column: column.clone(),
            })
        })
        .collect()
}
