//! Prediction service: runs one synchronous prediction per user action.
//!
//! This service coordinates:
//! - Input validation
//! - Classifier invocation
//! - Conversion of failures into a displayable message

use std::sync::Arc;

use crate::domain::Observation;
use crate::ports::Classifier;

use super::presentation::{present, RenderModel};

/// Result of one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// The classifier answered; everything the result view needs
    Rendered(RenderModel),
    /// Inference failed; only this message is shown
    Failed { message: String },
}

impl PredictionOutcome {
    /// The render model, if the prediction succeeded.
    #[must_use]
    pub fn rendered(&self) -> Option<&RenderModel> {
        match self {
            Self::Rendered(model) => Some(model),
            Self::Failed { .. } => None,
        }
    }
}

/// Service for running inference against the loaded classifier.
///
/// The classifier is shared read-only; the service keeps no per-request state,
/// so consecutive predictions are independent.
pub struct PredictionService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
}

impl<C> PredictionService<C>
where
    C: Classifier,
{
    /// Create a new prediction service.
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Run inference on one observation.
    ///
    /// Never fails: classifier errors are logged and returned as
    /// `PredictionOutcome::Failed`.
    pub fn predict(&self, observation: Observation) -> PredictionOutcome {
        if let Err(errors) = observation.validate() {
            tracing::warn!("Rejected observation: {}", errors.join(", "));
            return PredictionOutcome::Failed {
                message: format!("Prediction failed: {}", errors.join(", ")),
            };
        }

        tracing::debug!("Running prediction on {:?}", observation.to_array());

        match present(&observation, self.classifier.as_ref()) {
            Ok(model) => {
                tracing::info!(
                    "Prediction complete: status={}, p_normal={:.5}, p_malfunction={:.5}",
                    model.status,
                    model.probabilities.normal,
                    model.probabilities.malfunction
                );
                PredictionOutcome::Rendered(model)
            }
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                PredictionOutcome::Failed {
                    message: format!("Prediction failed: {e}"),
                }
            }
        }
    }
}
