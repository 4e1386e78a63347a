//! crates/quiz_core/src/ports.rs
//!
//! Defines the service contracts (traits) the quiz core depends on.
//! The language-model API and the test store live behind these traits so the
//! core stays independent of HTTP clients and the filesystem.

use crate::domain::{Test, TestSummary};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The language-model collaborator. Treated as unreliable by the generator.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends a single prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> PortResult<String>;
}

/// Key-value storage for generated tests, keyed by `Test::id`.
#[async_trait]
pub trait TestStore: Send + Sync {
    /// Stores a test under its id. Overwrites an existing entry with the same id.
    async fn put(&self, test: &Test) -> PortResult<()>;

    /// Returns `PortError::NotFound` when no test has this id.
    async fn get(&self, id: u32) -> PortResult<Test>;

    /// Summaries of every stored test, newest first.
    async fn list_all(&self) -> PortResult<Vec<TestSummary>>;
}

/// Orders summaries newest first, breaking ties by id so listings are stable.
pub fn sort_newest_first(summaries: &mut [TestSummary]) {
    summaries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
