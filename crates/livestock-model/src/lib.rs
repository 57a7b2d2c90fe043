//! Fitted regression forest used by the livestock feed service.
//!
//! The artifact is loaded once with [`ForestModel::load`], which also applies
//! the legacy-attribute normalization and validates the tree structure. A
//! JSON record becomes a one-row [`FeatureFrame`] and
//! [`ForestModel::predict`] returns a [`RawPrediction`].
//!
//! ```ignore
//! let model = ForestModel::load("livestock_random_forest.json")?;
//! let frame = FeatureFrame::from_json(&serde_json::json!({"DM": 91.2, ...}))?;
//! let rows = model.predict(&frame)?.into_rows();
//! ```

pub mod artifact;
pub mod error;
pub mod forest;
pub mod frame;
pub mod prediction;
pub mod tree;

pub use artifact::{normalize_monotonic_constraints, ModelArtifact, ModelType, TreeArtifact};
pub use error::{ModelError, Result};
pub use forest::ForestModel;
pub use frame::FeatureFrame;
pub use prediction::RawPrediction;
pub use tree::RegressionTree;
