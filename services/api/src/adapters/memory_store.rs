//! services/api/src/adapters/memory_store.rs
//!
//! An in-process `TestStore`. Used by the integration tests and selectable at
//! runtime with `TEST_STORE=memory`.

use async_trait::async_trait;
use quiz_core::domain::{Test, TestSummary};
use quiz_core::ports::{sort_newest_first, PortError, PortResult, TestStore};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryTestStore {
    tests: RwLock<BTreeMap<u32, Test>>,
}

impl InMemoryTestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tests.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tests.read().await.is_empty()
    }
}

#[async_trait]
impl TestStore for InMemoryTestStore {
    async fn put(&self, test: &Test) -> PortResult<()> {
        self.tests.write().await.insert(test.id, test.clone());
        Ok(())
    }

    async fn get(&self, id: u32) -> PortResult<Test> {
        self.tests
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Test {} not found", id)))
    }

    async fn list_all(&self) -> PortResult<Vec<TestSummary>> {
        let mut summaries: Vec<TestSummary> =
            self.tests.read().await.values().map(Test::summary).collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }
}
