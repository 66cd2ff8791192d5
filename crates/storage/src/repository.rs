use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::model::{NewResultRecord, ResultRecord};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("remote store returned {status}: {message}")]
    Remote { status: u16, message: String },
}

/// Record store for quiz results.
///
/// Append-only: results are inserted once and listed in full. The store, not
/// the caller, assigns `created_at`.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Persist one completed attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn insert_result(&self, record: &NewResultRecord) -> Result<(), StorageError>;

    /// List every stored result, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the results cannot be read.
    async fn list_results(&self) -> Result<Vec<ResultRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    clock: Clock,
    results: Arc<Mutex<Vec<ResultRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::system())
    }

    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Insert with an explicit timestamp, bypassing the clock.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_result_at(
        &self,
        record: &NewResultRecord,
        created_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len())
            .map_err(|_| StorageError::Serialization("id overflow".into()))?
            + 1;
        guard.push(record.clone().into_persisted(Some(id), created_at));
        Ok(id)
    }

    /// Store a row as-is, e.g. a legacy row without a normalized name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn push_persisted(&self, record: ResultRecord) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record);
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn insert_result(&self, record: &NewResultRecord) -> Result<(), StorageError> {
        self.insert_result_at(record, self.clock.now())?;
        Ok(())
    }

    async fn list_results(&self) -> Result<Vec<ResultRecord>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut out = guard.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }
}

/// Holds the result repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self {
            results: Arc::new(InMemoryRepository::with_clock(clock)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::QuizId;
    use quiz_core::time::fixed_now;

    fn new_record(user: &str, percentage: u8) -> NewResultRecord {
        NewResultRecord {
            user_name: user.into(),
            normalized_user_name: quiz_core::normalize_name(user),
            quiz_id: QuizId::new("quiz1"),
            quiz_title: "Quiz 1".into(),
            score: u32::from(percentage) / 10,
            total_questions: 10,
            percentage,
        }
    }

    #[tokio::test]
    async fn store_assigns_timestamp_and_lists_newest_first() {
        let repo = InMemoryRepository::with_clock(Clock::fixed(fixed_now()));
        repo.insert_result(&new_record("Ann", 50)).await.unwrap();
        repo.insert_result_at(&new_record("Bob", 70), fixed_now() + Duration::hours(1))
            .unwrap();
        repo.insert_result(&new_record("Cid", 90)).await.unwrap();

        let listed = repo.list_results().await.unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Cid", "Ann"]);
        assert_eq!(listed[2].created_at, fixed_now());
        assert_eq!(listed[2].normalized_user_name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn storage_in_memory_starts_empty() {
        let storage = Storage::in_memory(Clock::fixed(fixed_now()));
        assert!(storage.results.list_results().await.unwrap().is_empty());
    }
}
