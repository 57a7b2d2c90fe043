// Health check route handler

use hyper::{Body, Response, StatusCode};
use std::convert::Infallible;

use crate::web::model_manager::SharedAppState;
use crate::web::models::TestStatus;
use crate::web::response_helpers::json_response;

/// `GET /test`: always 200, reports whether the model is loaded.
pub async fn handle_test(state: SharedAppState) -> Result<Response<Body>, Infallible> {
    Ok(json_response(StatusCode::OK, &TestStatus::new(state.model_loaded())))
}
