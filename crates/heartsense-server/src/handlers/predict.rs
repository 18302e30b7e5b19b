//! Prediction endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::dto::PredictResponse;
use crate::error::AppError;
use crate::extract::{InputMode, PredictInput};
use crate::pages;
use crate::services;
use crate::state::AppState;

/// Classifies the submitted features.
///
/// JSON clients get `{prediction, probability}`; form submissions get the
/// rendered result page.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    input: PredictInput,
) -> Result<Response, AppError> {
    let prediction = services::prediction::predict(&state, &input.features)?;

    match input.mode {
        InputMode::Json => Ok(Json(PredictResponse::from(prediction)).into_response()),
        InputMode::Form => Ok(Html(pages::result(prediction.diagnosis)?).into_response()),
    }
}
