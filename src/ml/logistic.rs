//! Binary logistic classifier trained by full-batch gradient descent.
//!
//! Inputs are standardized with statistics captured at fit time, so the
//! persisted model is self-contained: the same scaling is applied to every
//! row it ever scores.

use serde::{Deserialize, Serialize};

pub const MODEL_TYPE: &str = "Logistic Regression";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 300,
            l2: 1e-4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: Vec<f64>,
    bias: f64,
    means: Vec<f64>,
    stds: Vec<f64>,
    params: LogisticParams,
}

impl LogisticModel {
    /// Fit on an imputed matrix (no NaN cells) with labels in {0, 1}.
    /// Classes are weighted inversely to their frequency so an imbalanced
    /// dataset does not collapse to the majority label.
    pub fn fit(matrix: &[Vec<f64>], labels: &[u8], params: &LogisticParams) -> Self {
        let n = matrix.len();
        let width = matrix.first().map(|row| row.len()).unwrap_or(0);

        let (means, stds) = column_stats(matrix, width);
        let scaled: Vec<Vec<f64>> = matrix
            .iter()
            .map(|row| scale_row(row, &means, &stds))
            .collect();

        let positives = labels.iter().filter(|&&y| y == 1).count();
        let negatives = n - positives;
        let (w_pos, w_neg) = if positives == 0 || negatives == 0 {
            (1.0, 1.0)
        } else {
            (n as f64 / (2.0 * positives as f64), n as f64 / (2.0 * negatives as f64))
        };

        let mut weights = vec![0.0; width];
        let mut bias = 0.0;

        for _ in 0..params.epochs {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;

            for (row, &label) in scaled.iter().zip(labels.iter()) {
                let p = sigmoid(dot(&weights, row) + bias);
                let sample_weight = if label == 1 { w_pos } else { w_neg };
                let g = sample_weight * (p - label as f64);
                for (gw, &x) in grad_w.iter_mut().zip(row.iter()) {
                    *gw += g * x;
                }
                grad_b += g;
            }

            let inv_n = 1.0 / n as f64;
            for (w, gw) in weights.iter_mut().zip(grad_w.iter()) {
                *w -= params.learning_rate * (gw * inv_n + params.l2 * *w);
            }
            bias -= params.learning_rate * grad_b * inv_n;
        }

        Self {
            weights,
            bias,
            means,
            stds,
            params: *params,
        }
    }

    /// Two-class probability vector `[p_legitimate, p_fraudulent]`; the
    /// components always sum to 1.
    pub fn predict_proba(&self, row: &[f64]) -> [f64; 2] {
        let scaled = scale_row(row, &self.means, &self.stds);
        let p = sigmoid(dot(&self.weights, &scaled) + self.bias);
        [1.0 - p, p]
    }

    pub fn predict(&self, row: &[f64]) -> u8 {
        u8::from(self.predict_proba(row)[1] >= 0.5)
    }

    /// Weight magnitudes over standardized inputs, normalized to sum to 1.
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.weights.iter().map(|w| w.abs()).sum();
        if total == 0.0 {
            return vec![0.0; self.weights.len()];
        }
        self.weights.iter().map(|w| w.abs() / total).collect()
    }

    pub fn width(&self) -> usize {
        self.weights.len()
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn scale_row(row: &[f64], means: &[f64], stds: &[f64]) -> Vec<f64> {
    row.iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(&v, (&m, &s))| (v - m) / s)
        .collect()
}

fn column_stats(matrix: &[Vec<f64>], width: usize) -> (Vec<f64>, Vec<f64>) {
    let n = matrix.len().max(1) as f64;
    let mut means = vec![0.0; width];
    for row in matrix {
        for (m, &v) in means.iter_mut().zip(row.iter()) {
            *m += v;
        }
    }
    for m in means.iter_mut() {
        *m /= n;
    }

    let mut stds = vec![0.0; width];
    for row in matrix {
        for ((s, &m), &v) in stds.iter_mut().zip(means.iter()).zip(row.iter()) {
            *s += (v - m) * (v - m);
        }
    }
    for s in stds.iter_mut() {
        *s = (*s / n).sqrt();
        // Constant columns scale to zero deviation; divide by 1 instead.
        if *s == 0.0 {
            *s = 1.0;
        }
    }

    (means, stds)
}
