pub mod bundle;
pub mod logistic;
pub mod trainer;

pub use bundle::{BundleError, ModelBundle};
pub use logistic::{LogisticModel, LogisticParams, MODEL_TYPE};
pub use trainer::{train, TrainError, TrainedModel, ValidationReport};
