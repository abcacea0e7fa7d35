//! Presentation: turns one classifier call into everything the result view shows.
//!
//! `present` is pure apart from the render timestamp, so it can be tested
//! without a terminal.

use chrono::{DateTime, Utc};

use crate::domain::{format_percent, Advice, ClassProbabilities, DeviceStatus, Observation};
use crate::ports::{Classifier, ClassifierError};

/// Upper bound of the probability chart axis. The axis is fixed at `[0, 1]`.
pub const CHART_AXIS_MAX: f64 = 1.0;

/// One bar of the probability chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: &'static str,
    /// Bar length on the `[0, CHART_AXIS_MAX]` axis
    pub value: f64,
    /// Percentage text drawn next to the bar
    pub annotation: String,
    /// Class the bar belongs to (drives its colour)
    pub status: DeviceStatus,
}

/// Everything needed to draw one prediction result.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    /// Input the result was computed from
    pub observation: Observation,
    pub status: DeviceStatus,
    pub probabilities: ClassProbabilities,
    pub normal_percent: String,
    pub malfunction_percent: String,
    /// Normal bar first, malfunction bar second
    pub chart: [ChartBar; 2],
    pub advice: Advice,
    pub rendered_at: DateTime<Utc>,
}

/// Run the classifier on one observation and build the render model.
///
/// # Errors
/// Returns the classifier's error, or `ClassifierError::Internal` if the
/// returned probabilities are not a valid distribution.
pub fn present<C>(observation: &Observation, classifier: &C) -> Result<RenderModel, ClassifierError>
where
    C: Classifier + ?Sized,
{
    let label = classifier.predict(observation)?;
    let pair = classifier.predict_proba(observation)?;
    let probabilities = ClassProbabilities::try_from_pair(pair).map_err(ClassifierError::Internal)?;

    let status = DeviceStatus::from_label(label);
    let normal_percent = format_percent(probabilities.normal);
    let malfunction_percent = format_percent(probabilities.malfunction);

    let chart = [
        ChartBar {
            label: "Normal",
            value: probabilities.normal.clamp(0.0, CHART_AXIS_MAX),
            annotation: normal_percent.clone(),
            status: DeviceStatus::Normal,
        },
        ChartBar {
            label: "Malfunction",
            value: probabilities.malfunction.clamp(0.0, CHART_AXIS_MAX),
            annotation: malfunction_percent.clone(),
            status: DeviceStatus::Malfunction,
        },
    ];

    Ok(RenderModel {
        observation: *observation,
        status,
        probabilities,
        normal_percent,
        malfunction_percent,
        chart,
        advice: status.advice(),
        rendered_at: Utc::now(),
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_normal_result() {
        let classifier = FixedClassifier {
            label: 0,
            proba: [0.875, 0.125],
        };
        let model = present(&Observation::default(), &classifier).expect("Should present");

        assert_eq!(model.status, DeviceStatus::Normal);
        assert_eq!(model.normal_percent, "87.500%");
        assert_eq!(model.malfunction_percent, "12.500%");
        assert_eq!(model.advice, Advice::CONTINUE_OPERATION);
        assert_eq!(model.chart[0].label, "Normal");
        assert!((model.chart[0].value - 0.875).abs() < f64::EPSILON);
        assert_eq!(model.chart[1].annotation, "12.500%");
    }

    #[test]
    fn test_any_nonzero_label_is_malfunction() {
        for label in [1, 2, -3] {
            let classifier = FixedClassifier {
                label,
                proba: [0.4, 0.6],
            };
            let model = present(&Observation::default(), &classifier).expect("Should present");
            assert_eq!(model.status, DeviceStatus::Malfunction);
            assert_eq!(model.advice, Advice::INSPECT_NOW);
        }
    }

    #[test]
    fn test_percentages_are_rounded_to_three_decimals() {
        let classifier = FixedClassifier {
            label: 0,
            proba: [0.8765432, 0.1234568],
        };
        let model = present(&Observation::default(), &classifier).expect("Should present");
        assert_eq!(model.normal_percent, "87.654%");
        assert_eq!(model.malfunction_percent, "12.346%");
    }

    #[test]
    fn test_invalid_distribution_is_an_error() {
        let classifier = FixedClassifier {
            label: 0,
            proba: [0.7, 0.7],
        };
        let err = present(&Observation::default(), &classifier).unwrap_err();
        assert!(matches!(err, ClassifierError::Internal(_)));
    }

    #[test]
    fn test_classifier_error_propagates() {
        let err = present(&Observation::default(), &FailingClassifier("booster exploded"))
            .unwrap_err();
        assert!(err.to_string().contains("booster exploded"));
    }

    #[test]
    fn test_same_input_same_result() {
        let obs = Observation {
            int_tmp: 61.25,
            ..Default::default()
        };
        let a = present(&obs, &TemperatureClassifier).unwrap();
        let b = present(&obs, &TemperatureClassifier).unwrap();

        assert_eq!(a.status, b.status);
        assert_eq!(a.probabilities, b.probabilities);
        assert_eq!(a.normal_percent, b.normal_percent);
        assert_eq!(a.chart, b.chart);
    }
}
