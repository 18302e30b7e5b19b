//! Data transfer objects for HTTP message serialization.

use heartsense_core::{parse_value, FeatureVector, PredictError, Prediction};
use serde::{Deserialize, Serialize};

/// A single element of the `features` array.
///
/// Clients send numbers, but numeric strings are accepted as well.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    fn to_f64(&self, index: usize) -> Result<f64, PredictError> {
        match self {
            FeatureValue::Number(n) => Ok(*n),
            FeatureValue::Text(s) => parse_value(s).ok_or_else(|| PredictError::InvalidValue {
                index,
                value: s.clone(),
            }),
        }
    }
}

/// JSON body of `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub features: Vec<FeatureValue>,
}

impl PredictRequest {
    /// Parses every element and shapes the result into a single row.
    pub fn into_vector(self) -> Result<FeatureVector, PredictError> {
        let values = self
            .features
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_f64(i))
            .collect::<Result<Vec<_>, _>>()?;
        FeatureVector::new(values)
    }
}

/// JSON response of `POST /predict`.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub probability: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prediction: p.diagnosis.label().to_string(),
            probability: p.rounded_probability(),
        }
    }
}
