//! Shared server state.

use heartsense_core::Classifier;

/// State shared by all handlers.
///
/// Holds the classifier loaded at startup. It is never mutated, so handlers
/// read it concurrently without locking.
pub struct AppState {
    model: Box<dyn Classifier>,
}

impl AppState {
    pub fn new(model: impl Classifier + 'static) -> Self {
        Self { model: Box::new(model) }
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }
}
