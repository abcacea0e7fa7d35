//! Regression tree as stored in XGBoost's JSON format.
//!
//! Nodes live in parallel arrays indexed by node id. A node whose left child
//! is `-1` is a leaf and its `split_conditions` entry holds the leaf value.

use serde::Deserialize;

/// `default_left` is an int array in most exports and a bool array in some.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub(super) enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(i) => i != 0,
        }
    }
}

/// Tree arrays exactly as deserialized.
#[derive(Debug, Deserialize)]
pub(super) struct RawTree {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    default_left: Vec<Flag>,
    /// `0` numeric, `1` categorical; absent in pre-1.6 exports
    #[serde(default)]
    split_type: Vec<i64>,
}

impl RawTree {
    /// Whether any node splits on a category set rather than a threshold.
    pub(super) fn has_categorical_splits(&self) -> bool {
        self.split_type.iter().any(|&t| t != 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        // XGBoost compares in single precision.
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f32),
}

/// A validated tree ready for evaluation.
#[derive(Debug, Clone)]
pub(super) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Validate raw arrays and build the node list.
    ///
    /// Children must point forward (`child > parent`), which every XGBoost
    /// export satisfies and which guarantees evaluation terminates.
    pub(super) fn compile(raw: RawTree, num_features: usize) -> Result<Self, String> {
        let n = raw.left_children.len();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if raw.right_children.len() != n
            || raw.split_indices.len() != n
            || raw.split_conditions.len() != n
            || raw.default_left.len() != n
        {
            return Err("node array lengths differ".into());
        }

        let child = |parent: usize, idx: i64| -> Result<usize, String> {
            usize::try_from(idx)
                .ok()
                .filter(|&c| c > parent && c < n)
                .ok_or_else(|| format!("node {parent} has invalid child {idx}"))
        };

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (raw.left_children[i], raw.right_children[i]);
            let condition = raw.split_conditions[i];
            if !condition.is_finite() {
                return Err(format!("node {i} has non-finite value {condition}"));
            }

            if left == -1 && right == -1 {
                nodes.push(Node::Leaf(condition as f32));
                continue;
            }

            let feature = usize::try_from(raw.split_indices[i])
                .ok()
                .filter(|&f| f < num_features)
                .ok_or_else(|| {
                    format!(
                        "node {i} splits on feature {} (model has {num_features})",
                        raw.split_indices[i]
                    )
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: condition as f32,
                left: child(i, left)?,
                right: child(i, right)?,
                default_left: raw.default_left[i].is_set(),
            });
        }

        Ok(Self { nodes })
    }

    /// Walk from the root to a leaf and return its value.
    pub(super) fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return f64::from(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features[feature];
                    idx = if x.is_nan() {
                        if default_left {
                            left
                        } else {
                            right
                        }
                    } else if (x as f32) < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}
