//! Device status types.
//!
//! Represents the interpreted output of the turbine status classifier.

use serde::{Deserialize, Serialize};

/// Operating status derived from the predicted class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// Class 0
    Normal,
    /// Any other class
    Malfunction,
}

impl DeviceStatus {
    /// Map a predicted label. Only `0` is normal; every other label is
    /// treated as the anomalous class.
    #[must_use]
    pub fn from_label(label: i64) -> Self {
        if label == 0 {
            Self::Normal
        } else {
            Self::Malfunction
        }
    }

    /// Lowercase status label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Malfunction => "malfunction",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Normal => (76, 175, 80),      // Green (#4CAF50)
            Self::Malfunction => (255, 82, 82), // Red (#FF5252)
        }
    }

    /// Maintenance advice for this status.
    #[must_use]
    pub fn advice(&self) -> Advice {
        match self {
            Self::Normal => Advice::CONTINUE_OPERATION,
            Self::Malfunction => Advice::INSPECT_NOW,
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Class probabilities as returned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    /// Probability of class 0 (normal)
    pub normal: f64,
    /// Probability of class 1 (malfunction)
    pub malfunction: f64,
}

impl ClassProbabilities {
    /// Allowed deviation of `normal + malfunction` from 1.
    pub const SUM_TOLERANCE: f64 = 1e-6;

    /// Build from a `[p0, p1]` pair, checking that it is a distribution.
    ///
    /// # Errors
    /// Returns error if either value is outside `[0, 1]` or the pair does
    /// not sum to 1.
    pub fn try_from_pair(pair: [f64; 2]) -> Result<Self, String> {
        let [normal, malfunction] = pair;
        for p in pair {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("probability {p} outside [0, 1]"));
            }
        }
        if ((normal + malfunction) - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(format!(
                "probabilities {normal} and {malfunction} do not sum to 1"
            ));
        }
        Ok(Self {
            normal,
            malfunction,
        })
    }
}

/// Format a probability as a percentage with three decimals.
#[must_use]
pub fn format_percent(p: f64) -> String {
    format!("{:.3}%", p * 100.0)
}

/// A static maintenance advice block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    pub headline: &'static str,
    pub steps: &'static [&'static str],
}

impl Advice {
    pub const CONTINUE_OPERATION: Advice = Advice {
        headline: "Turbine is operating normally. Recommendations:",
        steps: &[
            "Keep the current operating parameters",
            "Inspect the lubrication system on schedule",
            "Monitor temperature trends",
        ],
    };

    pub const INSPECT_NOW: Advice = Advice {
        headline: "Abnormal state detected! Recommendations:",
        steps: &[
            "Run a full diagnostic check immediately",
            "Inspect the blade pitch control system",
            "Monitor power output stability",
            "Contact a maintenance engineer for an on-site inspection",
        ],
    };
}
