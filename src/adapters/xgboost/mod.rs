//! XGBoost adapter: Implementation of Classifier for exported tree ensembles.
//!
//! Loads the JSON document written by XGBoost's `save_model("model.json")`
//! (both the 1.x and 2.x layouts) and evaluates it natively.
//!
//! # Supported models
//!
//! - Booster `gbtree`, objective `binary:logistic`
//! - Exactly [`FEATURE_COUNT`] numeric features, numeric splits only
//!
//! A `best_iteration` attribute (written by early stopping) limits scoring to
//! the trees up to and including that boosting round, as XGBoost's own
//! `predict` does.
//!
//! Anything else is rejected at load time so the dashboard fails at startup
//! instead of on the first prediction.
//!
//! # Integrity
//!
//! When a `manifest.json` sits next to the model, it must bind the model file
//! by SHA-256 digest. Setting `require_manifest` turns a missing manifest into
//! a load error.

mod tree;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::domain::{Observation, FEATURES, FEATURE_COUNT};
use crate::ports::{Classifier, ClassifierError};

use tree::Tree;

/// Default model file name inside a model directory.
pub const MODEL_FILE_NAME: &str = "model.json";

/// Manifest file name binding model files to their digests.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

const SUPPORTED_OBJECTIVE: &str = "binary:logistic";

/// Feature types XGBoost evaluates with plain `x < threshold` splits.
const NUMERIC_FEATURE_TYPES: [&str; 3] = ["float", "int", "q"];

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported model: {0}")]
    Unsupported(String),

    #[error("Malformed model: {0}")]
    Malformed(String),

    #[error("Model integrity check failed: {0}")]
    Integrity(String),
}

// === XGBoost JSON document ===

#[derive(Debug, Deserialize)]
struct XgbDocument {
    learner: XgbLearner,
    #[serde(default)]
    version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct XgbLearner {
    learner_model_param: XgbLearnerModelParam,
    gradient_booster: XgbGradientBooster,
    objective: XgbObjective,
    #[serde(default)]
    feature_names: Vec<String>,
    #[serde(default)]
    feature_types: Vec<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct XgbLearnerModelParam {
    base_score: String,
    #[serde(default)]
    num_class: Option<String>,
    num_feature: String,
}

#[derive(Debug, Deserialize)]
struct XgbGradientBooster {
    name: String,
    #[serde(default)]
    model: Option<XgbTreeModel>,
}

#[derive(Debug, Deserialize)]
struct XgbTreeModel {
    #[serde(default)]
    gbtree_model_param: Option<XgbGbtreeModelParam>,
    trees: Vec<tree::RawTree>,
}

#[derive(Debug, Deserialize)]
struct XgbGbtreeModelParam {
    #[serde(default)]
    num_parallel_tree: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XgbObjective {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ModelManifest {
    version: u32,
    files: BTreeMap<String, String>,
}

/// Summary of a loaded model, for display and logging.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub path: PathBuf,
    pub num_trees: usize,
    pub base_score: f64,
    /// XGBoost version that wrote the file, if recorded
    pub xgboost_version: Option<String>,
    /// Whether a manifest digest was verified
    pub verified: bool,
}

/// Tree-ensemble classifier loaded from an XGBoost JSON export.
///
/// Immutable after loading; share it behind an `Arc`.
#[derive(Debug)]
pub struct XgboostClassifier {
    trees: Vec<Tree>,
    base_margin: f64,
    info: ModelInfo,
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn parse_count(field: &str, raw: &str) -> Result<usize, ModelError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ModelError::Malformed(format!("{field} is not an integer: {raw:?}")))
}

/// Parse `base_score`, written as `"5E-1"` by 1.x and `"[5E-1]"` by 2.1+.
fn parse_base_score(raw: &str) -> Result<f64, ModelError> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let first = inner.split(',').next().unwrap_or("").trim();
    let score: f64 = first
        .parse()
        .map_err(|_| ModelError::Malformed(format!("base_score is not a number: {raw:?}")))?;
    if !(score > 0.0 && score < 1.0) {
        return Err(ModelError::Malformed(format!(
            "base_score {score} must lie strictly between 0 and 1 for {SUPPORTED_OBJECTIVE}"
        )));
    }
    Ok(score)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl XgboostClassifier {
    /// Load a model from a directory (containing `model.json`) or a file path.
    ///
    /// # Errors
    /// Returns `ModelError` if the file is missing, fails the manifest check,
    /// cannot be parsed, or describes an unsupported model.
    pub fn load(path: &Path, require_manifest: bool) -> Result<Self, ModelError> {
        let model_path = if path.is_dir() {
            path.join(MODEL_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        if !model_path.is_file() {
            return Err(ModelError::NotFound(model_path));
        }

        let bytes = std::fs::read(&model_path)?;
        let verified = Self::verify_manifest(&model_path, &bytes, require_manifest)?;

        let document: XgbDocument = serde_json::from_slice(&bytes)?;
        let mut classifier = Self::from_document(document, model_path.clone())?;
        classifier.info.verified = verified;

        tracing::info!(
            "Loaded model from {:?} (trees={}, base_score={}, xgboost={}, verified={})",
            model_path,
            classifier.info.num_trees,
            classifier.info.base_score,
            classifier.info.xgboost_version.as_deref().unwrap_or("unknown"),
            verified
        );

        Ok(classifier)
    }

    /// Parse a model from an in-memory JSON string.
    ///
    /// # Errors
    /// Returns `ModelError` if the JSON is invalid or the model unsupported.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let document: XgbDocument = serde_json::from_str(json)?;
        Self::from_document(document, PathBuf::new())
    }

    /// Check `manifest.json` next to the model, if any.
    ///
    /// Returns whether a digest was verified.
    fn verify_manifest(
        model_path: &Path,
        model_bytes: &[u8],
        require_manifest: bool,
    ) -> Result<bool, ModelError> {
        let base_dir = model_path.parent().unwrap_or_else(|| Path::new("."));
        let manifest_path = base_dir.join(MANIFEST_FILE_NAME);

        if !manifest_path.exists() {
            if require_manifest {
                return Err(ModelError::Integrity(format!(
                    "{MANIFEST_FILE_NAME} required but not found in {:?}",
                    base_dir
                )));
            }
            tracing::warn!("No {MANIFEST_FILE_NAME} next to model; skipping digest check");
            return Ok(false);
        }

        let manifest: ModelManifest = serde_json::from_slice(&std::fs::read(&manifest_path)?)
            .map_err(|e| ModelError::Integrity(format!("invalid {MANIFEST_FILE_NAME}: {e}")))?;
        if manifest.version != 1 {
            return Err(ModelError::Integrity(format!(
                "unsupported manifest version: {}",
                manifest.version
            )));
        }

        let file_name = model_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ModelError::Integrity("model path has no file name".into()))?;
        let expected = manifest.files.get(file_name).ok_or_else(|| {
            ModelError::Integrity(format!("{MANIFEST_FILE_NAME} does not list {file_name}"))
        })?;

        let actual = sha256_hex_bytes(model_bytes);
        if !expected.trim().eq_ignore_ascii_case(&actual) {
            return Err(ModelError::Integrity(format!(
                "SHA-256 mismatch for {file_name}"
            )));
        }

        tracing::debug!("Model digest verified against {:?}", manifest_path);
        Ok(true)
    }

    fn from_document(document: XgbDocument, path: PathBuf) -> Result<Self, ModelError> {
        let learner = document.learner;

        if learner.objective.name != SUPPORTED_OBJECTIVE {
            return Err(ModelError::Unsupported(format!(
                "objective {:?} (expected {SUPPORTED_OBJECTIVE})",
                learner.objective.name
            )));
        }

        let params = &learner.learner_model_param;
        if let Some(raw) = &params.num_class {
            let num_class = parse_count("num_class", raw)?;
            if num_class > 1 {
                return Err(ModelError::Unsupported(format!(
                    "multi-class model with {num_class} classes"
                )));
            }
        }

        let num_feature = parse_count("num_feature", &params.num_feature)?;
        if num_feature != FEATURE_COUNT {
            return Err(ModelError::Unsupported(format!(
                "model expects {num_feature} features, dashboard provides {FEATURE_COUNT}"
            )));
        }

        if !learner.feature_names.is_empty() {
            let expected: Vec<&str> = FEATURES.iter().map(|f| f.key).collect();
            if learner.feature_names != expected {
                return Err(ModelError::Unsupported(format!(
                    "feature names {:?} do not match {:?}",
                    learner.feature_names, expected
                )));
            }
        }

        if let Some(kind) = learner
            .feature_types
            .iter()
            .find(|t| !NUMERIC_FEATURE_TYPES.contains(&t.as_str()))
        {
            return Err(ModelError::Unsupported(format!("feature type {kind:?}")));
        }

        let base_score = parse_base_score(&params.base_score)?;

        let booster = learner.gradient_booster;
        let model = match (booster.name.as_str(), booster.model) {
            ("gbtree", Some(model)) => model,
            (name, _) => {
                return Err(ModelError::Unsupported(format!("booster {name:?}")));
            }
        };
        let trees_per_round = match model
            .gbtree_model_param
            .as_ref()
            .and_then(|p| p.num_parallel_tree.as_deref())
        {
            Some(raw) => parse_count("num_parallel_tree", raw)?.max(1),
            None => 1,
        };

        let mut raw_trees = model.trees;
        if raw_trees.is_empty() {
            return Err(ModelError::Malformed("model contains no trees".into()));
        }

        if let Some(raw) = learner.attributes.get("best_iteration") {
            let best_iteration = parse_count("best_iteration", raw)?;
            let keep = (best_iteration + 1).saturating_mul(trees_per_round);
            if keep > raw_trees.len() {
                return Err(ModelError::Malformed(format!(
                    "best_iteration {best_iteration} exceeds the {} trees in the model",
                    raw_trees.len()
                )));
            }
            if keep < raw_trees.len() {
                tracing::debug!(
                    "Scoring with {keep} of {} trees (best_iteration={best_iteration})",
                    raw_trees.len()
                );
                raw_trees.truncate(keep);
            }
        }

        if let Some(i) = raw_trees.iter().position(tree::RawTree::has_categorical_splits) {
            return Err(ModelError::Unsupported(format!(
                "tree {i} uses categorical splits"
            )));
        }

        let trees = raw_trees
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                Tree::compile(raw, FEATURE_COUNT)
                    .map_err(|e| ModelError::Malformed(format!("tree {i}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let xgboost_version = if document.version.is_empty() {
            None
        } else {
            Some(
                document
                    .version
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join("."),
            )
        };

        Ok(Self {
            base_margin: (base_score / (1.0 - base_score)).ln(),
            info: ModelInfo {
                path,
                num_trees: trees.len(),
                base_score,
                xgboost_version,
                verified: false,
            },
            trees,
        })
    }

    /// Summary of the loaded model.
    #[must_use]
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Raw margin (log-odds of malfunction) for an observation.
    ///
    /// NaN is treated as a missing value and follows each split's default
    /// branch; infinite values are rejected.
    ///
    /// # Errors
    /// Returns `ClassifierError` on infinite inputs or a non-finite margin.
    pub fn margin(&self, observation: &Observation) -> Result<f64, ClassifierError> {
        let features = observation.to_array();
        if let Some((i, value)) = features
            .iter()
            .enumerate()
            .find(|(_, v)| v.is_infinite())
        {
            return Err(ClassifierError::InvalidInput(format!(
                "{} is {}",
                FEATURES[i].key, value
            )));
        }

        let margin = self.base_margin
            + self
                .trees
                .iter()
                .map(|t| t.leaf_value(&features))
                .sum::<f64>();

        if !margin.is_finite() {
            return Err(ClassifierError::Numerical(format!(
                "ensemble margin is {margin}"
            )));
        }
        Ok(margin)
    }
}

impl Classifier for XgboostClassifier {
    fn predict(&self, observation: &Observation) -> Result<i64, ClassifierError> {
        let [_, p_malfunction] = self.predict_proba(observation)?;
        Ok(if p_malfunction > 0.5 { 1 } else { 0 })
    }

    fn predict_proba(&self, observation: &Observation) -> Result<[f64; 2], ClassifierError> {
        let p = sigmoid(self.margin(observation)?);
        Ok([1.0 - p, p])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    /// One stump on `int_tmp < 60` with the given leaves.
    fn stump_model(base_score: &str, left: f64, right: f64) -> serde_json::Value {
        json!({
            "learner": {
                "feature_names": [],
                "learner_model_param": {
                    "base_score": base_score,
                    "num_class": "0",
                    "num_feature": "7"
                },
                "objective": { "name": "binary:logistic" },
                "gradient_booster": {
                    "name": "gbtree",
                    "model": {
                        "trees": [{
                            "left_children": [1, -1, -1],
                            "right_children": [2, -1, -1],
                            "split_indices": [5, 0, 0],
                            "split_conditions": [60.0, left, right],
                            "default_left": [1, 0, 0]
                        }]
                    }
                }
            },
            "version": [2, 0, 3]
        })
    }

    fn write_model(dir: &Path, model: &serde_json::Value) -> Vec<u8> {
        let bytes = serde_json::to_vec(model).expect("serialize model");
        std::fs::write(dir.join(MODEL_FILE_NAME), &bytes).expect("write model");
        bytes
    }

    fn write_manifest(dir: &Path, files: &[(&str, String)]) {
        let map: BTreeMap<&str, &str> = files.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let manifest = json!({ "version": 1, "files": map });
        std::fs::write(
            dir.join(MANIFEST_FILE_NAME),
            serde_json::to_vec(&manifest).expect("serialize manifest"),
        )
        .expect("write manifest");
    }

    #[test]
    fn test_stump_evaluation() {
        let model = XgboostClassifier::from_json_str(&stump_model("5E-1", -1.0, 2.0).to_string())
            .expect("Model should parse");

        let cool = Observation::default();
        assert!((model.margin(&cool).unwrap() - -1.0).abs() < 1e-12);
        assert_eq!(model.predict(&cool).unwrap(), 0);

        let hot = Observation {
            int_tmp: 60.0,
            ..Default::default()
        };
        let [p0, p1] = model.predict_proba(&hot).unwrap();
        assert!((p1 - sigmoid(2.0)).abs() < 1e-12);
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&hot).unwrap(), 1);
    }

    #[test]
    fn test_bracketed_base_score_shifts_margin() {
        let model = XgboostClassifier::from_json_str(&stump_model("[2E-1]", 0.0, 0.0).to_string())
            .expect("Model should parse");
        let p = model.predict_proba(&Observation::default()).unwrap()[1];
        assert!((p - 0.2).abs() < 1e-9);
        assert!((model.info().base_score - 0.2).abs() < 1e-12);
        assert_eq!(model.info().xgboost_version.as_deref(), Some("2.0.3"));
    }

    #[test]
    fn test_missing_value_follows_default_branch() {
        let model = XgboostClassifier::from_json_str(&stump_model("5E-1", -1.0, 2.0).to_string())
            .expect("Model should parse");
        let obs = Observation {
            int_tmp: f64::NAN,
            ..Default::default()
        };
        assert!((model.margin(&obs).unwrap() - -1.0).abs() < 1e-12);
    }

    #[test]
    fn test_infinite_input_is_rejected() {
        let model = XgboostClassifier::from_json_str(&stump_model("5E-1", -1.0, 2.0).to_string())
            .expect("Model should parse");
        let obs = Observation {
            power: f64::INFINITY,
            ..Default::default()
        };
        let err = model.predict_proba(&obs).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput(_)));
        assert!(err.to_string().contains("power"));
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let mut model = stump_model("5E-1", 0.0, 0.0);
        model["learner"]["learner_model_param"]["num_feature"] = json!("9");
        let err = XgboostClassifier::from_json_str(&model.to_string()).unwrap_err();
        assert!(matches!(err, ModelError::Unsupported(_)));
    }

    #[test]
    fn test_rejects_other_objectives() {
        let mut model = stump_model("5E-1", 0.0, 0.0);
        model["learner"]["objective"]["name"] = json!("multi:softprob");
        assert!(matches!(
            XgboostClassifier::from_json_str(&model.to_string()),
            Err(ModelError::Unsupported(_))
        ));
    }

    #[test]
    fn test_rejects_shuffled_feature_names() {
        let mut model = stump_model("5E-1", 0.0, 0.0);
        model["learner"]["feature_names"] = json!([
            "environment_tmp", "yaw_position", "power", "wind_speed",
            "pitch3_angle", "int_tmp", "pitch2_angle"
        ]);
        assert!(matches!(
            XgboostClassifier::from_json_str(&model.to_string()),
            Err(ModelError::Unsupported(_))
        ));
    }

    #[test]
    fn test_best_iteration_limits_scored_trees() {
        let mut model = stump_model("5E-1", -1.0, 2.0);
        let trees = &mut model["learner"]["gradient_booster"]["model"]["trees"];
        trees.as_array_mut().expect("trees array").push(json!({
            "left_children": [-1],
            "right_children": [-1],
            "split_indices": [0],
            "split_conditions": [5.0],
            "default_left": [0]
        }));

        let full = XgboostClassifier::from_json_str(&model.to_string()).expect("Model should parse");
        assert_eq!(full.info().num_trees, 2);
        assert!((full.margin(&Observation::default()).unwrap() - 4.0).abs() < 1e-12);

        model["learner"]["attributes"] = json!({ "best_iteration": "0", "best_score": "0.1" });
        let early = XgboostClassifier::from_json_str(&model.to_string()).expect("Model should parse");
        assert_eq!(early.info().num_trees, 1);
        assert!((early.margin(&Observation::default()).unwrap() - -1.0).abs() < 1e-12);
        assert_eq!(early.predict(&Observation::default()).unwrap(), 0);

        model["learner"]["attributes"] = json!({ "best_iteration": "2" });
        assert!(matches!(
            XgboostClassifier::from_json_str(&model.to_string()),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_categorical_splits() {
        let mut model = stump_model("5E-1", -1.0, 2.0);
        model["learner"]["gradient_booster"]["model"]["trees"][0]["split_type"] = json!([1, 0, 0]);
        assert!(matches!(
            XgboostClassifier::from_json_str(&model.to_string()),
            Err(ModelError::Unsupported(_))
        ));

        model["learner"]["gradient_booster"]["model"]["trees"][0]["split_type"] = json!([0, 0, 0]);
        assert!(XgboostClassifier::from_json_str(&model.to_string()).is_ok());
    }

    #[test]
    fn test_rejects_categorical_feature_types() {
        let mut model = stump_model("5E-1", -1.0, 2.0);
        model["learner"]["feature_types"] = json!(["float", "float", "float", "c", "float", "float", "float"]);
        let err = XgboostClassifier::from_json_str(&model.to_string()).unwrap_err();
        assert!(matches!(err, ModelError::Unsupported(_)));
        assert!(err.to_string().contains("\"c\""));
    }

    #[test]
    fn test_load_from_directory_with_manifest() {
        let temp = tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &stump_model("5E-1", -1.0, 2.0));
        write_manifest(temp.path(), &[(MODEL_FILE_NAME, sha256_hex_bytes(&bytes))]);

        let model = XgboostClassifier::load(temp.path(), true).expect("Model should load");
        assert!(model.info().verified);
        assert_eq!(model.info().num_trees, 1);
        assert_eq!(model.info().path, temp.path().join(MODEL_FILE_NAME));
    }

    #[test]
    fn test_load_fails_on_digest_mismatch() {
        let temp = tempdir().expect("tempdir");
        write_model(temp.path(), &stump_model("5E-1", -1.0, 2.0));
        write_manifest(temp.path(), &[(MODEL_FILE_NAME, sha256_hex_bytes(b"something else"))]);

        let err = XgboostClassifier::load(temp.path(), false).unwrap_err();
        assert!(matches!(err, ModelError::Integrity(_)));
    }

    #[test]
    fn test_load_fails_if_manifest_omits_model() {
        let temp = tempdir().expect("tempdir");
        write_model(temp.path(), &stump_model("5E-1", -1.0, 2.0));
        write_manifest(temp.path(), &[("other.json", "00".repeat(32))]);

        assert!(matches!(
            XgboostClassifier::load(temp.path(), false),
            Err(ModelError::Integrity(_))
        ));
    }

    #[test]
    fn test_manifest_required() {
        let temp = tempdir().expect("tempdir");
        write_model(temp.path(), &stump_model("5E-1", -1.0, 2.0));

        assert!(XgboostClassifier::load(temp.path(), false).is_ok());
        assert!(matches!(
            XgboostClassifier::load(temp.path(), true),
            Err(ModelError::Integrity(_))
        ));
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let temp = tempdir().expect("tempdir");
        assert!(matches!(
            XgboostClassifier::load(temp.path(), false),
            Err(ModelError::NotFound(_))
        ));

        std::fs::write(temp.path().join(MODEL_FILE_NAME), b"{ not json").expect("write");
        assert!(matches!(
            XgboostClassifier::load(temp.path(), false),
            Err(ModelError::Parse(_))
        ));
    }

    #[test]
    fn test_bundled_demo_model() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let model = XgboostClassifier::load(&dir, true).expect("Demo model should load");
        assert_eq!(model.info().num_trees, 3);

        // Defaults: -0.9 (tree 0) - 0.5 (tree 1) - 0.4 (tree 2), base margin 0.
        let margin = model.margin(&Observation::default()).unwrap();
        assert!((margin - -1.8).abs() < 1e-6);

        let faulty = Observation {
            int_tmp: 70.0,
            pitch3_angle: 0.8,
            power: -1.5,
            environment_tmp: 45.0,
            ..Default::default()
        };
        assert!((model.margin(&faulty).unwrap() - 2.5).abs() < 1e-6);
        assert_eq!(model.predict(&faulty).unwrap(), 1);
    }
}
