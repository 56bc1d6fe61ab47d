//! Shared application state
//!
//! Cloned into every request; both collaborators sit behind `Arc` so the
//! clone is cheap.

use std::sync::Arc;

use crate::domain::{Clock, SystemClock};
use crate::repository::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn Repository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State backed by the given repository and the UTC wall clock
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
