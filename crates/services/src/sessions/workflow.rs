use std::sync::Arc;

use quiz_core::model::{NewResultRecord, QuizCatalog, QuizId, QuizListing, ResultFeedback};
use quiz_core::{QuizSession, Step};

use super::persist::PersistHandle;
use crate::error::QuizServiceError;
use crate::record_store::RecordStore;

/// A quiz that has just been finished.
#[derive(Debug)]
pub struct CompletedQuiz {
    pub record: NewResultRecord,
    pub feedback: ResultFeedback,
    pub persistence: PersistHandle,
}

/// Outcome of moving past a confirmed question.
#[derive(Debug)]
pub enum Advance {
    Next { index: usize },
    Completed(CompletedQuiz),
}

/// Starts quiz sessions from the catalog and saves finished attempts.
#[derive(Clone)]
pub struct QuizService {
    catalog: Arc<QuizCatalog>,
    store: RecordStore,
}

impl QuizService {
    #[must_use]
    pub fn new(catalog: Arc<QuizCatalog>, store: RecordStore) -> Self {
        Self { catalog, store }
    }

    #[must_use]
    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn listings(&self) -> Vec<QuizListing> {
        self.catalog.listings()
    }

    /// Start a session for `quiz_id` taken by `taker_name`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::UnknownQuiz` if the id is not in the catalog and
    /// `QuizServiceError::Session` if the name is blank.
    pub fn start(&self, quiz_id: &str, taker_name: &str) -> Result<QuizSession, QuizServiceError> {
        let quiz = self
            .catalog
            .get(quiz_id)
            .ok_or_else(|| QuizServiceError::UnknownQuiz(QuizId::new(quiz_id)))?;
        let session = QuizSession::start(quiz, taker_name)?;
        tracing::debug!(quiz_id, questions = quiz.question_count(), "quiz session started");
        Ok(session)
    }

    /// Advance the session. On completion the record is handed to the store in
    /// the background; the returned [`CompletedQuiz`] is usable immediately.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Session` when the session is not showing
    /// feedback, including a repeat call after completion.
    pub fn advance(&self, session: &mut QuizSession) -> Result<Advance, QuizServiceError> {
        match session.advance()? {
            Step::Next { index } => Ok(Advance::Next { index }),
            Step::Completed(record) => {
                let feedback = ResultFeedback::for_percentage(record.percentage);
                tracing::info!(
                    quiz_id = %record.quiz_id,
                    score = record.score,
                    total = record.total_questions,
                    "quiz completed"
                );
                let persistence = PersistHandle::spawn(self.store.clone(), record.clone());
                Ok(Advance::Completed(CompletedQuiz {
                    record,
                    feedback,
                    persistence,
                }))
            }
        }
    }
}
