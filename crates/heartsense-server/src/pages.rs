//! HTML pages embedded into the binary.

use heartsense_core::Diagnosis;
use rust_embed::Embed;

use crate::error::AppError;

#[derive(Embed)]
#[folder = "assets"]
struct Pages;

const PREDICTION_PLACEHOLDER: &str = "{{ prediction }}";

fn load(name: &str) -> Result<String, AppError> {
    let file = Pages::get(name).ok_or_else(|| AppError::Internal(format!("page '{}' not embedded", name)))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|e| AppError::Internal(format!("page '{}' is not UTF-8: {}", name, e)))
}

/// The feature entry form.
pub fn index() -> Result<String, AppError> {
    load("index.html")
}

/// The result page with the diagnosis label filled in.
pub fn result(diagnosis: Diagnosis) -> Result<String, AppError> {
    Ok(load("result.html")?.replace(PREDICTION_PLACEHOLDER, diagnosis.label()))
}
