pub mod builder;
pub mod imputer;
pub mod loader;

pub use builder::{build, DatasetBuild, FALLBACK_LEGIT_ADDRESSES};
pub use imputer::MedianImputer;
pub use loader::{load_rows, DatasetError, DatasetRow};
