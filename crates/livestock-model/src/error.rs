//! Error type shared by artifact loading, frame construction and prediction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the model crate.
///
/// The variants split along the lines the HTTP layer cares about: anything
/// raised while loading is fatal for the model, anything raised per record is
/// only fatal for that record.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file could not be read.
    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact bytes are not a valid artifact document.
    #[error("failed to deserialize model artifact: {0}")]
    Format(#[from] serde_json::Error),

    /// The artifact deserialized but describes an unusable model.
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// The record could not be turned into a feature row.
    #[error("{0}")]
    InvalidInput(String),

    /// The model could not evaluate the row.
    #[error("{0}")]
    Prediction(String),
}

impl ModelError {
    /// True when the error was raised while loading the artifact.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Format(_) | Self::InvalidArtifact(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
