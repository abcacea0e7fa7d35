//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the prediction use case of the dashboard.

mod inference;
mod presentation;

pub use inference::{PredictionOutcome, PredictionService};
pub use presentation::{present, ChartBar, RenderModel, CHART_AXIS_MAX};

#[cfg(test)]
pub(crate) use presentation::test_support;
