// Model loading and the application state shared by request handlers

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use livestock_model::ForestModel;
use log::{error, info};

use super::config::{LoadStrategy, ServerConfig};
use super::error::ServiceError;

pub type SharedAppState = Arc<AppState>;

/// Everything a handler needs: the model slot and how to fill it.
///
/// The slot is written at most once. An empty `Some(None)` records a failed
/// load so later requests do not retry it.
#[derive(Debug)]
pub struct AppState {
    model_path: PathBuf,
    load_strategy: LoadStrategy,
    model: OnceLock<Option<Arc<ForestModel>>>,
}

impl AppState {
    /// State with nothing loaded yet.
    pub fn new(model_path: impl Into<PathBuf>, load_strategy: LoadStrategy) -> Self {
        Self {
            model_path: model_path.into(),
            load_strategy,
            model: OnceLock::new(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.model_path.clone(), config.load_strategy)
    }

    /// State around an already built model.
    pub fn with_model(model: ForestModel) -> Self {
        let model = OnceLock::from(Some(Arc::new(model)));
        Self {
            model_path: PathBuf::new(),
            load_strategy: LoadStrategy::Eager,
            model,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn load_strategy(&self) -> LoadStrategy {
        self.load_strategy
    }

    /// Attempt the load if it has not happened yet. Returns the load status.
    pub fn load_model(&self) -> bool {
        self.model
            .get_or_init(|| load_model(&self.model_path))
            .is_some()
    }

    /// True once a load attempt has succeeded.
    pub fn model_loaded(&self) -> bool {
        matches!(self.model.get(), Some(Some(_)))
    }

    /// The model to predict with.
    ///
    /// In lazy mode the first call performs the load; concurrent first
    /// callers wait for that single attempt.
    pub fn model(&self) -> Result<Arc<ForestModel>, ServiceError> {
        let slot = match self.load_strategy {
            LoadStrategy::Eager => self.model.get(),
            LoadStrategy::Lazy => Some(self.model.get_or_init(|| load_model(&self.model_path))),
        };
        slot.and_then(Option::clone)
            .ok_or(ServiceError::ModelUnavailable)
    }
}

/// Read the artifact at `path`.
///
/// Failures are logged and reported as `None`; they never reach the caller
/// as errors so the server can keep running without a model.
pub fn load_model(path: &Path) -> Option<Arc<ForestModel>> {
    info!("Attempting to load model from: {}", path.display());
    match ForestModel::load(path) {
        Ok(model) => {
            info!(
                "Model loaded successfully. Type: {}, features: {}, outputs: {}, estimators: {}",
                model.model_type(),
                model.feature_names().join(", "),
                model.n_outputs(),
                model.n_estimators()
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            error!("{}", ServiceError::LoadError(e));
            None
        }
    }
}

/// Build the shared state and, in eager mode, load the model now.
pub fn initialize(config: &ServerConfig) -> SharedAppState {
    let state = Arc::new(AppState::from_config(config));
    if state.load_strategy() == LoadStrategy::Eager && !state.load_model() {
        error!("Model not loaded, /predict will answer 500 until restart");
    }
    state
}
