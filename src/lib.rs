//! # Windguard
//!
//! Wind turbine status prediction dashboard.
//!
//! An operator enters seven live turbine readings; a pre-trained gradient
//! boosted classifier labels the turbine as normal or malfunctioning and the
//! terminal UI shows the class probabilities and maintenance advice.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (Observation, DeviceStatus, Advice)
//! - `ports`: The `Classifier` trait
//! - `adapters`: XGBoost JSON model evaluator
//! - `application`: Prediction service and presentation
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{DeviceStatus, Observation};

use adapters::xgboost::XgboostClassifier;
use config::AppConfig;

/// Result type for Windguard operations
pub type Result<T> = std::result::Result<T, WindguardError>;

/// Main error type for Windguard
#[derive(Debug, thiserror::Error)]
pub enum WindguardError {
    #[error("Model could not be loaded: {0}")]
    Model(#[from] adapters::ModelError),

    #[error("Inference failed: {0}")]
    Inference(#[from] ports::ClassifierError),
}

/// Load the classifier named by the configuration.
///
/// # Errors
/// Returns `WindguardError::Model` if the model is missing, corrupt,
/// unsupported, or fails manifest verification.
pub fn load_classifier(config: &AppConfig) -> Result<XgboostClassifier> {
    let model = XgboostClassifier::load(&config.model_path, config.require_manifest)?;
    Ok(model)
}
