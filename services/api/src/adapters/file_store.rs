//! services/api/src/adapters/file_store.rs
//!
//! This module contains the filesystem adapter, the concrete implementation of
//! the `TestStore` port used in production. Every test is written once as a
//! pretty-printed JSON file named `test_{id}.json` inside a single directory.

use async_trait::async_trait;
use quiz_core::domain::{Test, TestSummary};
use quiz_core::ports::{sort_newest_first, PortError, PortResult, TestStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const FILE_PREFIX: &str = "test_";
const FILE_EXTENSION: &str = ".json";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A directory-backed store that implements the `TestStore` port.
#[derive(Clone, Debug)]
pub struct FileTestStore {
    dir: PathBuf,
}

impl FileTestStore {
    /// Creates a new `FileTestStore` rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the backing directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        info!("Tests are stored in {}", self.dir.display());
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: u32) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}{FILE_EXTENSION}"))
    }

    async fn read_test(path: &Path) -> PortResult<Test> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PortError::NotFound(format!("{} not found", path.display())),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            PortError::Unexpected(format!("{} is not a valid test: {}", path.display(), e))
        })
    }
}

fn is_test_file(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_EXTENSION)
}

//=========================================================================================
// `TestStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl TestStore for FileTestStore {
    async fn put(&self, test: &Test) -> PortResult<()> {
        let json = serde_json::to_string_pretty(test)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let path = self.path_for(test.id);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        info!("Test saved to {}", path.display());
        Ok(())
    }

    async fn get(&self, id: u32) -> PortResult<Test> {
        Self::read_test(&self.path_for(id))
            .await
            .map_err(|e| match e {
                PortError::NotFound(_) => PortError::NotFound(format!("Test {} not found", id)),
                other => other,
            })
    }

    async fn list_all(&self) -> PortResult<Vec<TestSummary>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
        {
            let file_name = entry.file_name();
            if !file_name.to_str().is_some_and(is_test_file) {
                continue;
            }
            match Self::read_test(&entry.path()).await {
                Ok(test) => summaries.push(test.summary()),
                Err(e) => warn!("Skipping unreadable test file: {}", e),
            }
        }

        sort_newest_first(&mut summaries);
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use quiz_core::domain::{Difficulty, Question};
    use tempfile::TempDir;

    fn sample_test(id: u32, minutes_ago: i64) -> Test {
        Test {
            id,
            name: format!("Test {id}"),
            questions: vec![Question {
                question: "2+2?".to_string(),
                options: ["3".to_string(), "4".to_string(), "5".to_string()],
                correct_answer: 1,
            }],
            topic: "arithmetic".to_string(),
            difficulty: Difficulty::Easy,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FileTestStore::new(dir.path());
        let test = sample_test(123456, 0);

        store.put(&test).await.unwrap();
        let loaded = store.get(123456).await.unwrap();

        assert_eq!(loaded, test);
        assert!(dir.path().join("test_123456.json").exists());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileTestStore::new(dir.path());

        let err = store.get(999999).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_all_is_newest_first_and_skips_junk() {
        let dir = TempDir::new().unwrap();
        let store = FileTestStore::new(dir.path());
        store.put(&sample_test(111111, 10)).await.unwrap();
        store.put(&sample_test(222222, 0)).await.unwrap();
        tokio::fs::write(dir.path().join("test_333333.json"), "{ not json")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "ignore me")
            .await
            .unwrap();

        let summaries = store.list_all().await.unwrap();

        let ids: Vec<u32> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![222222, 111111]);
        assert_eq!(summaries[0].question_count, 1);
    }

    #[tokio::test]
    async fn ensure_dir_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileTestStore::new(dir.path().join("a").join("b"));

        store.ensure_dir().await.unwrap();

        assert!(store.dir().is_dir());
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
