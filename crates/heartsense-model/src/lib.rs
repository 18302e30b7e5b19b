//! Logistic regression classifier loaded from a JSON model artifact.
//!
//! The artifact is produced offline and describes a fitted binary logistic
//! regression over the fixed feature schema:
//!
//! ```json
//! {
//!   "model_name": "logreg-uci-heart",
//!   "feature_names": ["age", "sex", "..."],
//!   "coefficients": [0.18, 0.45, "..."],
//!   "intercept": 0.25,
//!   "scaler": { "mean": ["..."], "scale": ["..."] },
//!   "threshold": 0.5
//! }
//! ```
//!
//! `scaler` and `threshold` are optional. Loading rejects artifacts whose
//! `feature_names` differ from [`heartsense_core::FEATURES`] in spelling or
//! order, so a model trained on another encoding fails at startup instead of
//! silently producing wrong scores.

use std::fs;
use std::path::Path;

use heartsense_core::{Classifier, Diagnosis, FeatureVector, PredictError, FEATURES, FEATURE_COUNT};
use serde::Deserialize;
use tracing::{debug, info};

/// Errors that can occur when loading a model artifact.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// Failed to read the artifact file.
    #[error("Failed to read model artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the artifact JSON.
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact parsed but is not usable with the compiled-in schema.
    #[error("Invalid model artifact '{model}': {message}")]
    Invalid { model: String, message: String },
}

impl ModelError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Creates a validation error.
    pub fn invalid(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            model: model.into(),
            message: message.into(),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// On-disk artifact layout.
#[derive(Debug, Deserialize)]
struct Artifact {
    model_name: String,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    scaler: Option<ScalerArtifact>,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Per-feature standardisation applied before the linear term.
#[derive(Debug, Clone)]
struct Scaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

/// A fitted binary logistic regression.
///
/// Immutable after loading; share it behind an `Arc` across request handlers.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    name: String,
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    scaler: Option<Scaler>,
    threshold: f64,
}

impl LogisticModel {
    /// Loads and validates an artifact from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ModelError::io(path.display().to_string(), e))?;
        let model = Self::from_json(&content)?;
        info!(
            "Loaded model '{}' from {} ({} features, threshold {})",
            model.name,
            path.display(),
            FEATURE_COUNT,
            model.threshold
        );
        Ok(model)
    }

    /// Parses and validates an artifact from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: Artifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: Artifact) -> Result<Self, ModelError> {
        let Artifact {
            model_name,
            feature_names,
            coefficients,
            intercept,
            scaler,
            threshold,
        } = artifact;

        if feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::invalid(
                &model_name,
                format!("expected {} feature names, got {}", FEATURE_COUNT, feature_names.len()),
            ));
        }
        if let Some((i, (got, want))) = feature_names
            .iter()
            .zip(FEATURES)
            .enumerate()
            .find(|(_, (got, want))| got.as_str() != *want)
        {
            return Err(ModelError::invalid(
                &model_name,
                format!("feature {} is '{}', expected '{}'", i, got, want),
            ));
        }

        let coefficients = fixed(&model_name, "coefficients", coefficients)?;
        if !intercept.is_finite() {
            return Err(ModelError::invalid(&model_name, "intercept is not finite"));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ModelError::invalid(
                &model_name,
                format!("threshold {} outside (0, 1)", threshold),
            ));
        }

        let scaler = scaler
            .map(|s| -> Result<Scaler, ModelError> {
                let mean = fixed(&model_name, "scaler.mean", s.mean)?;
                let scale = fixed(&model_name, "scaler.scale", s.scale)?;
                if let Some(i) = scale.iter().position(|v| *v == 0.0) {
                    return Err(ModelError::invalid(
                        &model_name,
                        format!("scaler.scale is zero for feature '{}'", FEATURES[i]),
                    ));
                }
                Ok(Scaler { mean, scale })
            })
            .transpose()?;

        Ok(Self {
            name: model_name,
            coefficients,
            intercept,
            scaler,
            threshold,
        })
    }

    /// Decision threshold on the positive-class probability.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Linear decision value `w·x + b` after optional standardisation.
    fn decision(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        let mut z = self.intercept;
        for (i, (name, x)) in features.named().enumerate() {
            if !x.is_finite() {
                return Err(PredictError::NonFinite(name));
            }
            let x = match &self.scaler {
                Some(s) => (x - s.mean[i]) / s.scale[i],
                None => x,
            };
            z += self.coefficients[i] * x;
        }
        Ok(z)
    }
}

/// Converts an artifact array into a schema-sized row of finite values.
fn fixed(model: &str, field: &str, values: Vec<f64>) -> Result<[f64; FEATURE_COUNT], ModelError> {
    let len = values.len();
    let row: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
        ModelError::invalid(model, format!("{} has {} values, expected {}", field, len, FEATURE_COUNT))
    })?;
    if let Some(i) = row.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::invalid(
            model,
            format!("{} is not finite for feature '{}'", field, FEATURES[i]),
        ));
    }
    Ok(row)
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<Diagnosis, PredictError> {
        let [_, p1] = self.predict_proba(features)?;
        Ok(Diagnosis::from_class(u8::from(p1 > self.threshold)))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], PredictError> {
        let z = self.decision(features)?;
        let p1 = sigmoid(z);
        debug!(decision = z, p1, "logistic score");
        Ok([1.0 - p1, p1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact(coefficients: Vec<f64>, intercept: f64) -> serde_json::Value {
        json!({
            "model_name": "test",
            "feature_names": FEATURES,
            "coefficients": coefficients,
            "intercept": intercept,
        })
    }

    fn load(value: serde_json::Value) -> Result<LogisticModel, ModelError> {
        LogisticModel::from_json(&value.to_string())
    }

    fn row(age: f64) -> FeatureVector {
        let mut values = vec![0.0; FEATURE_COUNT];
        values[0] = age;
        FeatureVector::new(values).unwrap()
    }

    fn age_only(weight: f64, intercept: f64) -> LogisticModel {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = weight;
        load(artifact(coefficients, intercept)).unwrap()
    }

    #[test]
    fn zero_model_is_even_odds() {
        let model = load(artifact(vec![0.0; FEATURE_COUNT], 0.0)).unwrap();
        let [p0, p1] = model.predict_proba(&row(50.0)).unwrap();
        assert_eq!(p0, 0.5);
        assert_eq!(p1, 0.5);
        // 0.5 is not above the default threshold
        assert_eq!(model.predict(&row(50.0)).unwrap(), Diagnosis::Absent);
    }

    #[test]
    fn probabilities_sum_to_one_and_follow_sign() {
        let model = age_only(0.1, -5.0);

        let [p0, p1] = model.predict_proba(&row(70.0)).unwrap();
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert!(p1 > 0.5);
        assert_eq!(model.predict(&row(70.0)).unwrap(), Diagnosis::Present);

        let [_, p1] = model.predict_proba(&row(30.0)).unwrap();
        assert!(p1 < 0.5);
        assert_eq!(model.predict(&row(30.0)).unwrap(), Diagnosis::Absent);
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!((sigmoid(1.0) - 0.731_058_578_630_004_9).abs() < 1e-12);
    }

    #[test]
    fn scaler_standardises_before_linear_term() {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 1.0;
        let mut value = artifact(coefficients, 0.0);
        let mut mean = vec![0.0; FEATURE_COUNT];
        mean[0] = 50.0;
        value["scaler"] = json!({ "mean": mean, "scale": vec![10.0; FEATURE_COUNT] });
        let model = load(value).unwrap();

        // (60 - 50) / 10 = 1
        let [_, p1] = model.predict_proba(&row(60.0)).unwrap();
        assert!((p1 - sigmoid(1.0)).abs() < 1e-12);
    }

    #[test]
    fn custom_threshold_changes_class() {
        let mut value = artifact(vec![0.0; FEATURE_COUNT], 0.0);
        value["threshold"] = json!(0.4);
        let model = load(value).unwrap();
        assert_eq!(model.threshold(), 0.4);
        assert_eq!(model.predict(&row(50.0)).unwrap(), Diagnosis::Present);
    }

    #[test]
    fn rejects_non_finite_input() {
        let model = age_only(0.1, 0.0);
        let err = model.predict_proba(&row(f64::NAN)).unwrap_err();
        assert_eq!(err, PredictError::NonFinite("age"));
        assert!(model.predict(&row(f64::INFINITY)).is_err());
    }

    #[test]
    fn rejects_reordered_feature_names() {
        let mut names: Vec<&str> = FEATURES.to_vec();
        names.swap(0, 1);
        let mut value = artifact(vec![0.0; FEATURE_COUNT], 0.0);
        value["feature_names"] = json!(names);
        let err = load(value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid model artifact 'test': feature 0 is 'sex', expected 'age'"
        );
    }

    #[test]
    fn rejects_wrong_coefficient_count() {
        let err = load(artifact(vec![0.0; 17], 0.0)).unwrap_err();
        assert!(matches!(err, ModelError::Invalid { .. }));
        assert!(err.to_string().contains("coefficients has 17 values"));
    }

    #[test]
    fn rejects_zero_scale() {
        let mut value = artifact(vec![0.0; FEATURE_COUNT], 0.0);
        let mut scale = vec![1.0; FEATURE_COUNT];
        scale[3] = 0.0;
        value["scaler"] = json!({ "mean": vec![0.0; FEATURE_COUNT], "scale": scale });
        let err = load(value).unwrap_err();
        assert!(err.to_string().contains("'chol'"));
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let mut value = artifact(vec![0.0; FEATURE_COUNT], 0.0);
        value["threshold"] = json!(1.0);
        assert!(load(value).is_err());
    }

    #[test]
    fn rejects_missing_fields() {
        let err = LogisticModel::from_json(r#"{"model_name":"m"}"#).unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("model.json");
        fs::write(&path, artifact(vec![0.0; FEATURE_COUNT], 0.0).to_string()).expect("write");

        let model = LogisticModel::from_file(&path).expect("load");
        assert_eq!(model.name(), "test");
        assert_eq!(model.threshold(), 0.5);
    }

    #[test]
    fn missing_file_reports_path() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("absent.json");
        let err = LogisticModel::from_file(&path).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn bundled_artifact_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models/model.json");
        let model = LogisticModel::from_file(path).expect("bundled model");
        assert_eq!(model.name(), "logreg-uci-heart");
    }
}
