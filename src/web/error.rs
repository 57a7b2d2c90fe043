// Service error kinds and their HTTP status mapping

use hyper::StatusCode;
use livestock_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Artifact missing, undeserializable or structurally invalid.
    #[error("Failed to load model: {0}")]
    LoadError(#[source] ModelError),

    /// A prediction was requested while no model is loaded.
    #[error("Model not loaded")]
    ModelUnavailable,

    /// Body unreadable, not JSON, or not a usable feature record.
    #[error("{0}")]
    InputError(String),

    /// The model failed to evaluate the record or its output had the wrong shape.
    #[error("{0}")]
    PredictionError(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::LoadError(_) | Self::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InputError(_) | Self::PredictionError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidInput(msg) => Self::InputError(msg),
            ModelError::Prediction(msg) => Self::PredictionError(msg),
            load @ (ModelError::Io { .. } | ModelError::Format(_) | ModelError::InvalidArtifact(_)) => {
                Self::LoadError(load)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::ModelUnavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ServiceError::InputError("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::PredictionError("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        let load = ServiceError::LoadError(ModelError::InvalidArtifact("empty".into()));
        assert_eq!(load.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_model_error_conversion() {
        let err: ServiceError = ModelError::InvalidInput("could not convert".into()).into();
        assert!(matches!(err, ServiceError::InputError(_)));
        assert_eq!(err.to_string(), "could not convert");

        let err: ServiceError = ModelError::Prediction("not finite".into()).into();
        assert!(matches!(err, ServiceError::PredictionError(_)));

        let err: ServiceError = ModelError::InvalidArtifact("no trees".into()).into();
        assert!(matches!(err, ServiceError::LoadError(_)));
    }

    #[test]
    fn test_unavailable_message() {
        assert_eq!(ServiceError::ModelUnavailable.to_string(), "Model not loaded");
    }
}
