//! Core domain types and error definitions for heartsense.
//!
//! This crate provides the types shared between the model loader and the
//! HTTP server:
//!
//! - [`FEATURES`] — The fixed feature schema the classifier was trained on
//! - [`FeatureVector`] — A single row of 18 features in schema order
//! - [`Classifier`] — The two operations every model exposes
//! - [`Prediction`] and [`Diagnosis`] — Classification output and its label
//! - [`PredictError`] — Error type for feature extraction and inference
//!
//! # Example
//!
//! ```rust
//! use heartsense_core::{FeatureVector, FEATURE_COUNT};
//!
//! let vector = FeatureVector::new(vec![0.0; FEATURE_COUNT]).unwrap();
//! assert_eq!(vector.as_slice().len(), 18);
//!
//! assert!(FeatureVector::new(vec![1.0, 2.0]).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Number of features in the schema.
pub const FEATURE_COUNT: usize = 18;

/// Feature names in the exact order the model expects.
///
/// The categorical attributes (chest pain type, resting ECG, ST slope and
/// thalassemia) are one-hot encoded with their first level dropped. These
/// names double as the HTML form field names.
pub const FEATURES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "trestbps",
    "chol",
    "fbs",
    "thalch",
    "exang",
    "oldpeak",
    "ca",
    "cp_atypical angina",
    "cp_non-anginal",
    "cp_typical angina",
    "restecg_normal",
    "restecg_st-t abnormality",
    "slope_flat",
    "slope_upsloping",
    "thal_normal",
    "thal_reversable defect",
];

/// Errors that can occur while building a feature vector or running inference.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Input row does not have one value per schema feature.
    #[error("Expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    /// A named form field was absent.
    #[error("Missing feature '{0}'")]
    MissingFeature(&'static str),

    /// A named form field could not be parsed as a float.
    #[error("Could not convert '{value}' to float for feature '{feature}'")]
    InvalidField { feature: &'static str, value: String },

    /// A positional value could not be parsed as a float.
    #[error("Could not convert '{value}' to float at position {index}")]
    InvalidValue { index: usize, value: String },

    /// Input contains NaN or infinity.
    #[error("Input contains a non-finite value for feature '{0}'")]
    NonFinite(&'static str),
}

/// Parses a textual feature value the way a form or JSON string is read.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// A single row of input features, ordered as in [`FEATURES`].
///
/// Can only be constructed with exactly [`FEATURE_COUNT`] values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Builds a vector from positional values.
    pub fn new(values: Vec<f64>) -> Result<Self, PredictError> {
        let actual = values.len();
        let row: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| PredictError::FeatureCount {
            expected: FEATURE_COUNT,
            actual,
        })?;
        Ok(Self(row))
    }

    /// Builds a vector from named fields, reading each schema feature in order.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, PredictError> {
        let mut row = [0.0; FEATURE_COUNT];
        for (slot, name) in row.iter_mut().zip(FEATURES) {
            let raw = fields.get(name).ok_or(PredictError::MissingFeature(name))?;
            *slot = parse_value(raw).ok_or_else(|| PredictError::InvalidField {
                feature: name,
                value: raw.clone(),
            })?;
        }
        Ok(Self(row))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Pairs each value with its feature name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURES.into_iter().zip(self.0.iter().copied())
    }
}

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnosis {
    /// Class 0.
    Absent,
    /// Class 1.
    Present,
}

impl Diagnosis {
    /// Maps a model class index to a diagnosis. Any non-zero class is positive.
    pub fn from_class(class: u8) -> Self {
        if class == 0 {
            Self::Absent
        } else {
            Self::Present
        }
    }

    pub fn class(&self) -> u8 {
        match self {
            Self::Absent => 0,
            Self::Present => 1,
        }
    }

    /// Returns the human-readable label shown to API clients and on the result page.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "DOES NOT have Heart Disease",
            Self::Present => "HAS Heart Disease",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class.
    pub diagnosis: Diagnosis,
    /// Probability of the positive class.
    pub probability: f64,
}

impl Prediction {
    /// Positive-class probability rounded to 4 decimal places.
    pub fn rounded_probability(&self) -> f64 {
        (self.probability * 10_000.0).round() / 10_000.0
    }
}

/// A pre-trained binary classifier.
///
/// Implementations are loaded once and shared read-only between requests,
/// so they must be `Send + Sync` and take `&self`.
pub trait Classifier: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Predicts the class of a single row.
    fn predict(&self, features: &FeatureVector) -> Result<Diagnosis, PredictError>;

    /// Returns class probabilities `[p0, p1]` for a single row.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], PredictError>;

    /// Runs both operations and combines them into a [`Prediction`].
    fn classify(&self, features: &FeatureVector) -> Result<Prediction, PredictError> {
        let diagnosis = self.predict(features)?;
        let [_, probability] = self.predict_proba(features)?;
        Ok(Prediction { diagnosis, probability })
    }
}
