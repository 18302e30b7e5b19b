//! Request extraction for `POST /predict`.
//!
//! The endpoint serves two kinds of clients from one route: API clients
//! posting JSON and browsers submitting the HTML form. The content type picks
//! the mode, and the mode later picks the response representation.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};
use heartsense_core::FeatureVector;

use crate::dto::PredictRequest;
use crate::error::AppError;

/// How the client submitted its features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Json,
    Form,
}

/// Feature vector extracted from either input mode.
#[derive(Debug)]
pub struct PredictInput {
    pub mode: InputMode,
    pub features: FeatureVector,
}

/// Returns `true` for `application/json` and `application/*+json` bodies.
pub fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

impl<S> FromRequest<S> for PredictInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(body) = Json::<PredictRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self {
                mode: InputMode::Json,
                features: body.into_vector()?,
            });
        }

        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self {
            mode: InputMode::Form,
            features: FeatureVector::from_fields(&fields)?,
        })
    }
}
