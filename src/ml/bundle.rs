//! The persisted model artifact.
//!
//! Model, imputer and feature-column order travel as one file so the
//! serving path can never load a model whose companion statistics or
//! schema are missing or stale.

use crate::dataset::MedianImputer;
use crate::ml::logistic::LogisticModel;
use crate::ml::trainer::{TrainedModel, ValidationReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(
        "inconsistent bundle: {columns} feature columns, imputer width {imputer}, model width {model}"
    )]
    Inconsistent {
        columns: usize,
        imputer: usize,
        model: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Feature names in the exact order seen at training time. Serving
    /// realigns every live vector to this order before imputation.
    pub columns: Vec<String>,
    pub imputer: MedianImputer,
    pub model: LogisticModel,
    pub report: ValidationReport,
    /// Unix seconds.
    pub trained_at: i64,
}

impl ModelBundle {
    pub fn new(columns: Vec<String>, imputer: MedianImputer, trained: TrainedModel) -> Self {
        Self {
            columns,
            imputer,
            model: trained.model,
            report: trained.report,
            trained_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Atomic save: the bundle lands fully written or not at all.
    pub fn save(&self, path: &Path) -> Result<(), BundleError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        info!("Saved model bundle to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, BundleError> {
        let json = fs::read_to_string(path)?;
        let bundle: Self = serde_json::from_str(&json)?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<(), BundleError> {
        let columns = self.columns.len();
        let imputer = self.imputer.width();
        let model = self.model.width();
        if columns != imputer || columns != model {
            return Err(BundleError::Inconsistent {
                columns,
                imputer,
                model,
            });
        }
        Ok(())
    }
}
