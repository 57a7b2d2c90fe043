// Web server modules for the livestock feed predictor

pub mod config;
pub mod error;
pub mod logger;
pub mod model_manager;
pub mod models;
pub mod request_parsing;
pub mod response_helpers;
pub mod routes;
pub mod server;

// Re-export commonly used types
pub use config::*;
pub use error::*;
pub use model_manager::*;
pub use models::*;
pub use server::*;
