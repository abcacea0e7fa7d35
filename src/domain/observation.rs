//! Turbine sensor observation types.
//!
//! An observation is the seven-value input vector for one prediction request.
//! The field order is fixed and must match the order the model was trained on.

use serde::{Deserialize, Serialize};

/// Number of features the classifier expects.
pub const FEATURE_COUNT: usize = 7;

/// Static description of one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    /// Feature name as used by the training pipeline
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Short help text shown next to the field
    pub hint: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl FeatureSpec {
    /// Clamp a value into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Check whether a value lies within the inclusive range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Format a value with the fixed display precision.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        format!("{:.3}", value)
    }
}

/// Input fields in model feature order.
pub static FEATURES: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        key: "yaw_position",
        label: "Yaw Position",
        hint: "yaw angle relative to the wind",
        min: -3.0,
        max: 3.0,
        default: 0.0,
        step: 0.001,
    },
    FeatureSpec {
        key: "environment_tmp",
        label: "Environment Temp",
        hint: "ambient temperature in °C",
        min: -5.0,
        max: 50.0,
        default: 25.0,
        step: 0.001,
    },
    FeatureSpec {
        key: "power",
        label: "Output Power",
        hint: "standardized power output",
        min: -2.0,
        max: 2.0,
        default: 0.0,
        step: 0.001,
    },
    FeatureSpec {
        key: "wind_speed",
        label: "Wind Speed",
        hint: "standardized wind speed",
        min: -2.0,
        max: 20.0,
        default: 5.0,
        step: 0.001,
    },
    FeatureSpec {
        key: "pitch3_angle",
        label: "Pitch 3 Angle",
        hint: "blade 3 pitch angle",
        min: -1.0,
        max: 1.0,
        default: 0.0,
        step: 0.001,
    },
    FeatureSpec {
        key: "int_tmp",
        label: "Internal Temp",
        hint: "nacelle internal temperature in °C",
        min: -5.0,
        max: 80.0,
        default: 45.0,
        step: 0.001,
    },
    FeatureSpec {
        key: "pitch2_angle",
        label: "Pitch 2 Angle",
        hint: "blade 2 pitch angle",
        min: -1.0,
        max: 1.0,
        default: 0.0,
        step: 0.001,
    },
];

/// One set of turbine readings submitted for prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub yaw_position: f64,
    pub environment_tmp: f64,
    pub power: f64,
    pub wind_speed: f64,
    pub pitch3_angle: f64,
    pub int_tmp: f64,
    pub pitch2_angle: f64,
}

impl Default for Observation {
    fn default() -> Self {
        let mut defaults = [0.0; FEATURE_COUNT];
        for (slot, spec) in defaults.iter_mut().zip(FEATURES.iter()) {
            *slot = spec.default;
        }
        Self::from_array(defaults)
    }
}

impl Observation {
    /// Build an observation from values in model feature order.
    #[must_use]
    pub fn from_array(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            yaw_position: v[0],
            environment_tmp: v[1],
            power: v[2],
            wind_speed: v[3],
            pitch3_angle: v[4],
            int_tmp: v[5],
            pitch2_angle: v[6],
        }
    }

    /// Create an observation from a slice.
    ///
    /// # Errors
    /// Returns error if the slice length is not 7.
    pub fn from_slice(v: &[f64]) -> Result<Self, String> {
        let array: [f64; FEATURE_COUNT] = v
            .try_into()
            .map_err(|_| format!("Expected {} features, got {}", FEATURE_COUNT, v.len()))?;
        Ok(Self::from_array(array))
    }

    /// Values in model feature order.
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.yaw_position,
            self.environment_tmp,
            self.power,
            self.wind_speed,
            self.pitch3_angle,
            self.int_tmp,
            self.pitch2_angle,
        ]
    }

    /// Validate that all values are finite and within their field ranges.
    ///
    /// # Errors
    /// Returns one message per offending field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .to_array()
            .iter()
            .zip(FEATURES.iter())
            .filter(|(value, spec)| !value.is_finite() || !spec.contains(**value))
            .map(|(value, spec)| {
                format!(
                    "{} {} out of range [{}, {}]",
                    spec.label, value, spec.min, spec.max
                )
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
