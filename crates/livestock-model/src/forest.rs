//! Forest predictor built from a loaded artifact.

use std::path::Path;

use log::debug;

use crate::artifact::{normalize_monotonic_constraints, ModelArtifact, ModelType};
use crate::error::{ModelError, Result};
use crate::frame::FeatureFrame;
use crate::prediction::RawPrediction;
use crate::tree::RegressionTree;

/// Read-only predictor. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ForestModel {
    model_type: ModelType,
    feature_names: Vec<String>,
    n_outputs: usize,
    monotonic_cst: Option<Vec<i8>>,
    trees: Vec<RegressionTree>,
}

impl ForestModel {
    /// Load, normalize and validate an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_artifact(ModelArtifact::from_path(path)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_artifact(ModelArtifact::from_slice(bytes)?)
    }

    pub fn from_artifact(mut artifact: ModelArtifact) -> Result<Self> {
        if normalize_monotonic_constraints(&mut artifact) {
            debug!("Copied legacy monotonic_cst_ attribute onto monotonic_cst");
        }
        artifact.validate()?;

        let trees = artifact
            .estimators
            .iter()
            .map(|tree| RegressionTree::from_artifact(tree, artifact.n_outputs))
            .collect();

        Ok(Self {
            model_type: artifact.model_type,
            feature_names: artifact.feature_names,
            n_outputs: artifact.n_outputs,
            monotonic_cst: artifact.monotonic_cst,
            trees,
        })
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn monotonic_constraints(&self) -> Option<&[i8]> {
        self.monotonic_cst.as_deref()
    }

    /// Predict every row of `frame`.
    ///
    /// Returns a flat vector for single-output models and one row per sample
    /// otherwise.
    pub fn predict(&self, frame: &FeatureFrame) -> Result<RawPrediction> {
        let rows = frame.aligned_rows(&self.feature_names)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(self.predict_row(row)?);
        }

        if self.n_outputs == 1 {
            Ok(RawPrediction::Flat(out.into_iter().map(|r| r[0]).collect()))
        } else {
            Ok(RawPrediction::Matrix(out))
        }
    }

    /// Mean of the leaf outputs over all trees.
    fn predict_row(&self, row: &[f32]) -> Result<Vec<f64>> {
        if row.len() != self.n_features() {
            return Err(ModelError::Prediction(format!(
                "X has {} features, but the model is expecting {} features as input",
                row.len(),
                self.n_features()
            )));
        }

        let mut sums = vec![0.0f64; self.n_outputs];
        for tree in &self.trees {
            for (sum, value) in sums.iter_mut().zip(tree.predict_row(row)) {
                *sum += value;
            }
        }

        let n = self.trees.len() as f64;
        let mean: Vec<f64> = sums.into_iter().map(|s| s / n).collect();
        if let Some(bad) = mean.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::Prediction(format!(
                "prediction for output {bad} is not finite"
            )));
        }
        Ok(mean)
    }
}
