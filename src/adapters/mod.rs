//! Adapters layer: Concrete implementations of ports.
//!
//! - `xgboost`: evaluator for XGBoost JSON model exports

pub mod xgboost;

// Re-export model error for lib.rs
pub use xgboost::ModelError;
