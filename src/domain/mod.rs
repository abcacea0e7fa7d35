//! Domain layer: Core types of the turbine status dashboard.
//!
//! This module contains plain Rust types with no I/O.

mod observation;
mod status;

pub use observation::{FeatureSpec, Observation, FEATURES, FEATURE_COUNT};
pub use status::{format_percent, Advice, ClassProbabilities, DeviceStatus};
