//! The record store as seen by the rest of the app.
//!
//! Wraps whichever repository is configured and folds every failure into
//! [`StoreError`]. A store that could not be set up is still a value: it
//! answers every call with `StoreError::Unavailable` so the quiz flow keeps
//! working without persistence.

use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{NewResultRecord, ResultRecord};
use storage::{ResultRepository, SqliteRepository, Storage};

use crate::config::{StoreBackend, StoreSettings};
use crate::error::StoreError;

#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn ResultRepository>),
    Unavailable(String),
}

#[derive(Clone)]
pub struct RecordStore {
    backend: Backend,
}

impl RecordStore {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self {
            backend: Backend::Ready(results),
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.results))
    }

    /// A store that rejects every call with the given reason.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unavailable(reason.into()),
        }
    }

    /// Open the configured backend.
    ///
    /// Never fails: setup problems are logged and yield an unavailable store.
    pub async fn connect(settings: &StoreSettings, clock: Clock) -> Self {
        match settings.backend {
            StoreBackend::Memory => Self::from_storage(&Storage::in_memory(clock)),
            StoreBackend::Sqlite => match open_sqlite(&settings.db_url, clock).await {
                Ok(repo) => Self::new(Arc::new(repo)),
                Err(reason) => {
                    tracing::warn!(db_url = %settings.db_url, %reason, "sqlite record store unavailable");
                    Self::unavailable(reason)
                }
            },
            StoreBackend::Rest => {
                let Some(config) = settings.rest.clone() else {
                    tracing::warn!("remote record store not configured; results will not be saved");
                    return Self::unavailable("remote store URL or key is not configured");
                };
                match Storage::rest(config) {
                    Ok(storage) => Self::from_storage(&storage),
                    Err(err) => {
                        tracing::warn!(error = %err, "remote record store unavailable");
                        Self::unavailable(err.to_string())
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    #[must_use]
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            Backend::Ready(_) => None,
            Backend::Unavailable(reason) => Some(reason),
        }
    }

    fn repository(&self) -> Result<&Arc<dyn ResultRepository>, StoreError> {
        match &self.backend {
            Backend::Ready(repo) => Ok(repo),
            Backend::Unavailable(reason) => Err(StoreError::Unavailable(reason.clone())),
        }
    }

    /// Append one completed attempt. The store assigns `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when no backend is configured and
    /// `StoreError::OperationFailed` when the backend rejects the insert.
    pub async fn insert(&self, record: &NewResultRecord) -> Result<(), StoreError> {
        let repo = self.repository()?;
        repo.insert_result(record).await.map_err(|err| {
            tracing::error!(quiz_id = %record.quiz_id, error = %err, "failed to save quiz result");
            StoreError::from(err)
        })
    }

    /// Every stored result, in whatever order the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when no backend is configured and
    /// `StoreError::OperationFailed` when the backend cannot be read.
    pub async fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let repo = self.repository()?;
        let records = repo.list_results().await.map_err(|err| {
            tracing::error!(error = %err, "failed to load quiz results");
            StoreError::from(err)
        })?;
        tracing::debug!(count = records.len(), "loaded quiz results");
        Ok(records)
    }
}

async fn open_sqlite(db_url: &str, clock: Clock) -> Result<SqliteRepository, String> {
    let repo = SqliteRepository::connect(db_url)
        .await
        .map_err(|e| e.to_string())?
        .with_clock(clock);
    repo.migrate().await.map_err(|e| e.to_string())?;
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizId;
    use quiz_core::time::fixed_now;

    fn record() -> NewResultRecord {
        NewResultRecord {
            user_name: "Ann".into(),
            normalized_user_name: "Ann".into(),
            quiz_id: QuizId::new("quiz1"),
            quiz_title: "Quiz 1".into(),
            score: 1,
            total_questions: 2,
            percentage: 50,
        }
    }

    #[tokio::test]
    async fn unavailable_store_rejects_every_call() {
        let store = RecordStore::unavailable("no url");
        assert!(!store.is_available());
        assert_eq!(store.unavailable_reason(), Some("no url"));
        assert_eq!(
            store.insert(&record()).await,
            Err(StoreError::Unavailable("no url".into()))
        );
        assert!(matches!(
            store.list_all().await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn rest_without_credentials_is_unavailable() {
        let settings = StoreSettings::default();
        let store = RecordStore::connect(&settings, Clock::fixed(fixed_now())).await;
        assert!(!store.is_available());
    }

    #[tokio::test]
    async fn memory_backend_roundtrips() {
        let settings = StoreSettings {
            backend: StoreBackend::Memory,
            ..StoreSettings::default()
        };
        let store = RecordStore::connect(&settings, Clock::fixed(fixed_now())).await;
        store.insert(&record()).await.unwrap();
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].created_at, fixed_now());
    }

    #[tokio::test]
    async fn sqlite_backend_uses_in_memory_database() {
        let settings = StoreSettings {
            backend: StoreBackend::Sqlite,
            db_url: "sqlite:file:memdb_record_store?mode=memory&cache=shared".into(),
            rest: None,
        };
        let store = RecordStore::connect(&settings, Clock::fixed(fixed_now())).await;
        assert!(store.is_available());
        store.insert(&record()).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
