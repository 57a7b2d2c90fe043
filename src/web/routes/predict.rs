// Prediction route handlers

use hyper::{Body, Request, Response, StatusCode};
use livestock_model::FeatureFrame;
use log::{error, info};
use std::convert::Infallible;

use crate::web::error::ServiceError;
use crate::web::model_manager::{AppState, SharedAppState};
use crate::web::models::FeedPrediction;
use crate::web::request_parsing::{parse_json_value, read_body, require_json_content_type};
use crate::web::response_helpers::{cors_preflight, json_response, service_error};

/// `POST /predict`
///
/// Every failure becomes a JSON error response; nothing propagates past
/// this handler.
pub async fn handle_predict(
    req: Request<Body>,
    state: SharedAppState,
) -> Result<Response<Body>, Infallible> {
    match predict(req, &state).await {
        Ok(prediction) => {
            info!("Prediction result: {prediction:?}");
            Ok(json_response(StatusCode::OK, &prediction))
        }
        Err(e) => {
            error!("Error during prediction: {e}");
            Ok(service_error(&e))
        }
    }
}

/// `OPTIONS /predict`: preflight only, the model is never touched.
pub async fn handle_options() -> Result<Response<Body>, Infallible> {
    Ok(cors_preflight())
}

async fn predict(req: Request<Body>, state: &AppState) -> Result<FeedPrediction, ServiceError> {
    let model = state.model()?;

    require_json_content_type(&req)?;
    let body = read_body(req).await?;
    let record = parse_json_value(&body)?;
    info!("Received data: {record}");

    let frame = FeatureFrame::from_json(&record)?;
    let raw = model.predict(&frame)?;
    // Single-output models answer with a flat vector; index it as one row.
    let rows = raw.into_rows();

    FeedPrediction::from_rows(&rows)
}
