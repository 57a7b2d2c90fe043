//! On-disk artifact format.
//!
//! The artifact is the fitted forest exported to JSON. Field names follow the
//! attributes of the fitted estimator (`feature_names_in_`, `n_outputs_`,
//! `estimators_`) so the exporter can dump them without renaming.
//!
//! ```text
//! {
//!   "model_type": "RandomForestRegressor",
//!   "feature_names_in_": ["DM", "CP", ...],
//!   "n_outputs_": 4,
//!   "monotonic_cst_": null,
//!   "estimators_": [ { "children_left": [...], "children_right": [...],
//!                      "feature": [...], "threshold": [...],
//!                      "value": [[...], ...] } ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, Result};

/// Child index marking a leaf node.
pub const TREE_LEAF: i64 = -1;

/// Estimator family recorded in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Mean over all estimators.
    RandomForestRegressor,
    /// A single tree.
    DecisionTreeRegressor,
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RandomForestRegressor => write!(f, "RandomForestRegressor"),
            Self::DecisionTreeRegressor => write!(f, "DecisionTreeRegressor"),
        }
    }
}

/// One fitted tree in parallel-array layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// One vector of `n_outputs` values per node.
    pub value: Vec<Vec<f64>>,
}

impl TreeArtifact {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Check the arrays describe a well-formed tree.
    ///
    /// Children always sit after their parent, which also rules out cycles.
    pub fn validate(&self, n_features: usize, n_outputs: usize) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(ModelError::InvalidArtifact("tree has no nodes".to_string()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(ModelError::InvalidArtifact(format!(
                "tree node arrays differ in length (children_left={}, children_right={}, feature={}, threshold={}, value={})",
                n,
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                self.value.len()
            )));
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];

            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(ModelError::InvalidArtifact(format!(
                        "node {node} has a right child but no left child"
                    )));
                }
                if self.value[node].len() != n_outputs {
                    return Err(ModelError::InvalidArtifact(format!(
                        "leaf {node} has {} values, expected {n_outputs}",
                        self.value[node].len()
                    )));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(ModelError::InvalidArtifact(format!(
                        "node {node} points to invalid child {child}"
                    )));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(ModelError::InvalidArtifact(format!(
                    "node {node} splits on feature {feature}, model has {n_features} features"
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(ModelError::InvalidArtifact(format!(
                    "node {node} has a NaN threshold"
                )));
            }
        }

        Ok(())
    }
}

/// Deserialized artifact, before it is compiled into a predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: ModelType,

    #[serde(rename = "feature_names_in_")]
    pub feature_names: Vec<String>,

    #[serde(rename = "n_outputs_")]
    pub n_outputs: usize,

    #[serde(default)]
    pub monotonic_cst: Option<Vec<i8>>,

    /// Attribute name written by older exporters. The outer `Option` records
    /// whether the key was present at all, since `null` is a valid value.
    #[serde(
        rename = "monotonic_cst_",
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_monotonic_cst: Option<Option<Vec<i8>>>,

    #[serde(rename = "estimators_")]
    pub estimators: Vec<TreeArtifact>,
}

/// Marks a key as present even when its value is `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ModelArtifact {
    /// Read and deserialize an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Structural checks run once at load time.
    pub fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "model has no feature names".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "duplicate feature name '{name}'"
                )));
            }
        }
        if self.n_outputs == 0 {
            return Err(ModelError::InvalidArtifact(
                "model has zero outputs".to_string(),
            ));
        }
        match (self.model_type, self.estimators.len()) {
            (_, 0) => {
                return Err(ModelError::InvalidArtifact(
                    "model has no estimators".to_string(),
                ))
            }
            (ModelType::DecisionTreeRegressor, n) if n != 1 => {
                return Err(ModelError::InvalidArtifact(format!(
                    "DecisionTreeRegressor must have exactly one tree, found {n}"
                )))
            }
            _ => {}
        }

        if let Some(constraints) = &self.monotonic_cst {
            if constraints.len() != self.n_features() {
                return Err(ModelError::InvalidArtifact(format!(
                    "monotonic_cst has {} entries, model has {} features",
                    constraints.len(),
                    self.n_features()
                )));
            }
            if let Some(bad) = constraints.iter().find(|c| !(-1..=1).contains(*c)) {
                return Err(ModelError::InvalidArtifact(format!(
                    "monotonic_cst entries must be -1, 0 or 1, found {bad}"
                )));
            }
        }

        for (i, tree) in self.estimators.iter().enumerate() {
            tree.validate(self.n_features(), self.n_outputs)
                .map_err(|e| match e {
                    ModelError::InvalidArtifact(msg) => {
                        ModelError::InvalidArtifact(format!("estimator {i}: {msg}"))
                    }
                    other => other,
                })?;
        }

        Ok(())
    }
}

/// Copy the legacy `monotonic_cst_` attribute onto `monotonic_cst`.
///
/// Artifacts exported by an older version of the fitting library store the
/// constraints under the suffixed name; the predictor reads the unsuffixed one.
/// Returns true when the legacy attribute was found.
pub fn normalize_monotonic_constraints(artifact: &mut ModelArtifact) -> bool {
    match artifact.legacy_monotonic_cst.take() {
        Some(legacy) => {
            artifact.monotonic_cst = legacy;
            true
        }
        None => false,
    }
}
