#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use heartsense_core::{FEATURES, FEATURE_COUNT};
use heartsense_model::LogisticModel;
use heartsense_server::{router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PRESENT: &str = "HAS Heart Disease";
pub const ABSENT: &str = "DOES NOT have Heart Disease";

/// 63 year old male, typical angina, flat slope, reversable defect.
pub const PATIENT: [f64; FEATURE_COUNT] = [
    63.0, 1.0, 145.0, 233.0, 1.0, 150.0, 0.0, 2.3, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0,
];

/// Router over the artifact shipped in `models/`.
pub fn bundled_app() -> Router {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models/model.json");
    let model = LogisticModel::from_file(path).expect("bundled model");
    router(Arc::new(AppState::new(model)))
}

/// Router over a model that ignores its input and scores `intercept`.
pub fn constant_app(intercept: f64) -> Router {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("model.json");
    let artifact = json!({
        "model_name": "constant",
        "feature_names": FEATURES,
        "coefficients": vec![0.0; FEATURE_COUNT],
        "intercept": intercept,
    });
    std::fs::write(&path, artifact.to_string()).expect("write");
    let model = LogisticModel::from_file(&path).expect("load");
    router(Arc::new(AppState::new(model)))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub async fn post_json(app: &Router, body: impl Into<String>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: &Router, fields: &[(&str, String)]) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k.replace(' ', "+"), v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&");
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub fn form_fields(values: &[f64]) -> Vec<(&'static str, String)> {
    FEATURES.iter().copied().zip(values.iter().map(|v| v.to_string())).collect()
}

pub fn features_body(values: &[f64]) -> String {
    json!({ "features": values }).to_string()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).expect("json body")
}

/// Asserts a 400 with a non-empty `error` message and returns the message.
pub async fn expect_error(response: Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let message = body["error"].as_str().expect("error string").to_string();
    assert!(!message.is_empty());
    message
}
