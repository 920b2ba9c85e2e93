//! Classifier Models
//!
//! Evaluators for the serialized estimators a classifier artifact can carry,
//! and the `Classifier` seam the prediction service depends on.

pub mod artifact;
pub mod linear;
pub mod tree;

pub use artifact::{Estimator, ModelArtifact, ModelError, FORMAT_VERSION};
pub use linear::{LogisticRegression, StandardScaler};
pub use tree::{DecisionTree, RandomForest};

use ndarray::ArrayView2;

/// A pre-trained binary classifier.
///
/// Implementations are read-only after construction and must be deterministic:
/// the same row always yields the same label.
pub trait Classifier: Send + Sync {
    /// Short name of the estimator family, for logs and the inspector.
    fn kind(&self) -> &'static str;

    /// One 0/1 label per input row.
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Vec<u8>;
}
