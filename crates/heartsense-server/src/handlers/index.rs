//! Landing page with the feature entry form.

use axum::response::Html;

use crate::error::AppError;
use crate::pages;

/// Serves the HTML form that posts to `/predict`.
pub async fn index() -> Result<Html<String>, AppError> {
    pages::index().map(Html)
}
