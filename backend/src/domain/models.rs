//! Repository bundle shared with HTTP handlers.

use std::sync::Arc;

use super::ports::MovieRepository;

/// Every persistence port the application uses, behind trait objects so
/// handlers stay independent of the concrete store.
#[derive(Clone)]
pub struct Models {
    pub movies: Arc<dyn MovieRepository>,
}

impl Models {
    /// Bundle the given repositories.
    pub fn new(movies: Arc<dyn MovieRepository>) -> Self {
        Self { movies }
    }
}
