//! Classifier port: Trait for the pre-trained status model.
//!
//! This trait abstracts the model format (XGBoost JSON) from the application logic.

use crate::domain::Observation;

/// Error raised while scoring an observation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Invalid feature vector: {0}")]
    InvalidInput(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Model evaluation failed: {0}")]
    Internal(String),
}

/// Trait for binary classifiers.
///
/// Implementations must be deterministic and free of side effects: the same
/// observation always yields the same label and probabilities.
pub trait Classifier: Send + Sync {
    /// Predict the class label for an observation.
    ///
    /// `0` is the normal class; callers treat any other value as anomalous.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the observation cannot be scored.
    fn predict(&self, observation: &Observation) -> Result<i64, ClassifierError>;

    /// Predict `[p(normal), p(malfunction)]`.
    ///
    /// Both values lie in `[0, 1]` and sum to 1.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the observation cannot be scored.
    fn predict_proba(&self, observation: &Observation) -> Result<[f64; 2], ClassifierError>;
}
