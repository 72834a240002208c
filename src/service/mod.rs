pub mod scorer;

pub use scorer::{align_columns, FraudScorer, ScoreError};
