//! Prediction service.
//!
//! Runs the shared classifier on one feature vector and logs the outcome.

use heartsense_core::{FeatureVector, Prediction};
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::AppState;

/// Classifies a single row with the loaded model.
pub fn predict(state: &AppState, features: &FeatureVector) -> Result<Prediction, AppError> {
    let model = state.model();
    debug!(model = model.name(), features = ?features.as_slice(), "Running inference");

    let prediction = model.classify(features)?;

    info!(
        model = model.name(),
        class = prediction.diagnosis.class(),
        probability = prediction.rounded_probability(),
        "Prediction: {}",
        prediction.diagnosis
    );
    Ok(prediction)
}
