//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use quiz_core::generator::Generator;
use quiz_core::ports::TestStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TestStore>,
    pub generator: Generator,
}

impl AppState {
    pub fn new(store: Arc<dyn TestStore>, generator: Generator) -> Self {
        Self { store, generator }
    }
}
