//! Median imputation for missing feature values.

use serde::{Deserialize, Serialize};

/// Per-column median replacement, fitted once over the training matrix and
/// persisted with the model. Serving applies `transform_row` with the
/// stored statistics; it is never refit on request data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    medians: Vec<f64>,
}

impl MedianImputer {
    /// Fit column-wise medians, ignoring NaN cells. A column with no finite
    /// value at all imputes to 0.0; the schema is fixed, so columns are
    /// never dropped.
    pub fn fit(matrix: &[Vec<f64>]) -> Self {
        let width = matrix.first().map(|row| row.len()).unwrap_or(0);
        let mut medians = Vec::with_capacity(width);
        for col in 0..width {
            let mut values: Vec<f64> = matrix
                .iter()
                .filter_map(|row| {
                    let v = row[col];
                    (!v.is_nan()).then_some(v)
                })
                .collect();
            medians.push(median(&mut values));
        }
        Self { medians }
    }

    /// Replace NaN cells with the fitted medians. Finite values pass
    /// through untouched.
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        debug_assert_eq!(row.len(), self.medians.len());
        row.iter()
            .zip(self.medians.iter())
            .map(|(&v, &m)| if v.is_nan() { m } else { v })
            .collect()
    }

    pub fn transform_matrix(&self, matrix: &mut [Vec<f64>]) {
        for row in matrix.iter_mut() {
            *row = self.transform_row(row);
        }
    }

    pub fn medians(&self) -> &[f64] {
        &self.medians
    }

    pub fn width(&self) -> usize {
        self.medians.len()
    }
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
