use std::fmt;

use quiz_core::model::NewResultRecord;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::record_store::RecordStore;

/// Background save of a completed attempt.
///
/// The quiz is finished whether or not this succeeds. Await
/// [`PersistHandle::outcome`] to learn how the save went, or drop the handle to
/// let it run detached.
pub struct PersistHandle {
    state: PersistState,
}

enum PersistState {
    Running(JoinHandle<Result<(), StoreError>>),
    Finished(Result<(), StoreError>),
}

impl PersistHandle {
    pub(crate) fn spawn(store: RecordStore, record: NewResultRecord) -> Self {
        if !store.is_available() {
            let reason = store.unavailable_reason().unwrap_or_default().to_owned();
            tracing::warn!(quiz_id = %record.quiz_id, %reason, "result not saved: record store unavailable");
            return Self::finished(Err(StoreError::Unavailable(reason)));
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::error!(quiz_id = %record.quiz_id, "result not saved: no async runtime");
            return Self::finished(Err(StoreError::Unavailable(
                "no async runtime to save the result".into(),
            )));
        };

        let task = runtime.spawn(async move {
            let outcome = store.insert(&record).await;
            if outcome.is_ok() {
                tracing::info!(
                    quiz_id = %record.quiz_id,
                    percentage = record.percentage,
                    "quiz result saved"
                );
            }
            outcome
        });
        Self {
            state: PersistState::Running(task),
        }
    }

    fn finished(outcome: Result<(), StoreError>) -> Self {
        Self {
            state: PersistState::Finished(outcome),
        }
    }

    /// Wait for the save to finish.
    ///
    /// # Errors
    ///
    /// Returns the `StoreError` from the insert, or `StoreError::OperationFailed`
    /// if the background task was cancelled or panicked.
    pub async fn outcome(self) -> Result<(), StoreError> {
        match self.state {
            PersistState::Finished(outcome) => outcome,
            PersistState::Running(task) => match task.await {
                Ok(outcome) => outcome,
                Err(join) => {
                    tracing::error!(error = %join, "result save task failed");
                    Err(StoreError::OperationFailed(join.to_string()))
                }
            },
        }
    }
}

impl fmt::Debug for PersistHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            PersistState::Running(_) => "running",
            PersistState::Finished(Ok(())) => "saved",
            PersistState::Finished(Err(_)) => "failed",
        };
        f.debug_struct("PersistHandle").field("state", &state).finish()
    }
}
