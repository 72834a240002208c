//! Model fitting: class guard, stratified split, hyperparameter grid and
//! the validation report.

use crate::ml::logistic::{LogisticModel, LogisticParams};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const TRAIN_SEED: u64 = 42;
const VALIDATION_RATIO: f64 = 0.2;

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("at least two classes (scam and legitimate) are required for training")]
    InsufficientClasses,

    #[error("training matrix is empty")]
    EmptyMatrix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub accuracy: f64,
    pub macro_f1: f64,
    pub legitimate: ClassMetrics,
    pub fraudulent: ClassMetrics,
    /// Rows are actual class, columns predicted: `[[tn, fp], [fn, tp]]`.
    pub confusion: [[usize; 2]; 2],
    pub best_params: LogisticParams,
}

pub struct TrainedModel {
    pub model: LogisticModel,
    pub report: ValidationReport,
}

/// Fit the best model over a small fixed hyperparameter grid. The class
/// guard runs before any fitting: a single-class label vector is rejected
/// up front, never discovered mid-fit.
pub fn train(matrix: &[Vec<f64>], labels: &[u8]) -> Result<TrainedModel, TrainError> {
    if matrix.is_empty() || labels.is_empty() {
        return Err(TrainError::EmptyMatrix);
    }

    let has_positive = labels.iter().any(|&y| y == 1);
    let has_negative = labels.iter().any(|&y| y == 0);
    if !(has_positive && has_negative) {
        return Err(TrainError::InsufficientClasses);
    }

    let (train_idx, valid_idx) = stratified_split(labels, VALIDATION_RATIO, TRAIN_SEED);
    let (train_x, train_y) = select(matrix, labels, &train_idx);
    // With very few samples per class the validation side can come up
    // empty; score on the training rows rather than nothing.
    let eval_idx = if valid_idx.is_empty() { &train_idx } else { &valid_idx };
    let (valid_x, valid_y) = select(matrix, labels, eval_idx);

    info!(
        "Training set: {} samples, {} scam, {} legitimate",
        train_y.len(),
        train_y.iter().filter(|&&y| y == 1).count(),
        train_y.iter().filter(|&&y| y == 0).count()
    );

    let mut best: Option<(f64, LogisticModel, LogisticParams)> = None;
    for params in param_grid() {
        let candidate = LogisticModel::fit(&train_x, &train_y, &params);
        let predictions: Vec<u8> = valid_x.iter().map(|row| candidate.predict(row)).collect();
        let score = macro_f1(&valid_y, &predictions);
        debug!(
            "Grid candidate lr={} epochs={} l2={}: macro-F1 {:.4}",
            params.learning_rate, params.epochs, params.l2, score
        );
        if best.as_ref().map(|(s, _, _)| score > *s).unwrap_or(true) {
            best = Some((score, candidate, params));
        }
    }

    // The grid is non-empty, so a best candidate always exists.
    let (_, model, best_params) = match best {
        Some(found) => found,
        None => return Err(TrainError::EmptyMatrix),
    };

    let predictions: Vec<u8> = valid_x.iter().map(|row| model.predict(row)).collect();
    let report = build_report(&valid_y, &predictions, best_params);

    info!(
        "Best parameters: lr={} epochs={} l2={}; validation accuracy {:.4}, macro-F1 {:.4}",
        best_params.learning_rate,
        best_params.epochs,
        best_params.l2,
        report.accuracy,
        report.macro_f1
    );

    Ok(TrainedModel { model, report })
}

fn param_grid() -> Vec<LogisticParams> {
    let mut grid = Vec::new();
    for &learning_rate in &[0.05, 0.1] {
        for &epochs in &[200, 400] {
            for &l2 in &[0.0, 1e-3] {
                grid.push(LogisticParams {
                    learning_rate,
                    epochs,
                    l2,
                });
            }
        }
    }
    grid
}

/// Deterministic per-class split. Each class contributes a ceil share of
/// the validation ratio, capped so training always keeps at least one
/// sample of the class.
fn stratified_split(labels: &[u8], ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::new();
    let mut valid_idx = Vec::new();

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter_map(|(i, &y)| (y == class).then_some(i))
            .collect();
        if indices.is_empty() {
            continue;
        }
        indices.shuffle(&mut rng);
        let take = ((indices.len() as f64 * ratio).ceil() as usize).min(indices.len() - 1);
        valid_idx.extend(indices.drain(..take));
        train_idx.extend(indices);
    }

    (train_idx, valid_idx)
}

fn select(matrix: &[Vec<f64>], labels: &[u8], indices: &[usize]) -> (Vec<Vec<f64>>, Vec<u8>) {
    let rows = indices.iter().map(|&i| matrix[i].clone()).collect();
    let selected = indices.iter().map(|&i| labels[i]).collect();
    (rows, selected)
}

fn build_report(actual: &[u8], predicted: &[u8], best_params: LogisticParams) -> ValidationReport {
    let mut confusion = [[0usize; 2]; 2];
    for (&a, &p) in actual.iter().zip(predicted.iter()) {
        confusion[a as usize][p as usize] += 1;
    }

    let correct = confusion[0][0] + confusion[1][1];
    let total = actual.len().max(1);
    let legitimate = class_metrics(&confusion, 0);
    let fraudulent = class_metrics(&confusion, 1);

    ValidationReport {
        accuracy: correct as f64 / total as f64,
        macro_f1: (legitimate.f1 + fraudulent.f1) / 2.0,
        legitimate,
        fraudulent,
        confusion,
        best_params,
    }
}

fn class_metrics(confusion: &[[usize; 2]; 2], class: usize) -> ClassMetrics {
    let tp = confusion[class][class];
    let fp = confusion[1 - class][class];
    let fn_ = confusion[class][1 - class];

    let precision = ratio_or_zero(tp, tp + fp);
    let recall = ratio_or_zero(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    ClassMetrics {
        precision,
        recall,
        f1,
        support: tp + fn_,
    }
}

fn ratio_or_zero(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn macro_f1(actual: &[u8], predicted: &[u8]) -> f64 {
    let mut confusion = [[0usize; 2]; 2];
    for (&a, &p) in actual.iter().zip(predicted.iter()) {
        confusion[a as usize][p as usize] += 1;
    }
    (class_metrics(&confusion, 0).f1 + class_metrics(&confusion, 1).f1) / 2.0
}
