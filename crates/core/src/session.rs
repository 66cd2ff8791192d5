//! One taker working through one quiz, one question at a time.
//!
//! Each question goes select → confirm → advance. Confirmation is one-shot:
//! after it the choice is frozen until `advance` moves on. Advancing past the
//! last question emits the [`NewResultRecord`] exactly once and leaves the
//! session in `Completed`, which rejects every further call.

use std::fmt;

use thiserror::Error;

use crate::model::{NewResultRecord, Question, Quiz, QuizId};
use crate::name::{display_name, normalize_name};
use crate::score::percentage;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid state: cannot {action} while {phase}")]
    InvalidState {
        action: &'static str,
        phase: &'static str,
    },
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where the session is within the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingSelection,
    AwaitingConfirmation { selected: usize },
    Feedback { selected: usize, correct: bool },
    Completed,
}

impl SessionState {
    fn phase(self) -> &'static str {
        match self {
            Self::AwaitingSelection => "awaiting a selection",
            Self::AwaitingConfirmation { .. } => "awaiting confirmation",
            Self::Feedback { .. } => "showing feedback",
            Self::Completed => "completed",
        }
    }
}

/// What the taker sees right after confirming an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_index: usize,
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// Result of `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Moved to the question at this index.
    Next { index: usize },
    /// The last question was passed; the attempt is final.
    Completed(NewResultRecord),
}

/// Progress snapshot, e.g. for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub current_index: usize,
    pub score: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of confirmed questions, 0..=100.
    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        let answered = u32::try_from(self.answered).unwrap_or(u32::MAX);
        let total = u32::try_from(self.total).unwrap_or(u32::MAX);
        percentage(answered, total)
    }
}

/// `A`, `B`, … label for an option index.
#[must_use]
pub fn option_label(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or_else(|| (index + 1).to_string(), |i| char::from(b'A' + i).to_string())
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Mutable state of a single quiz attempt.
///
/// Holds its own copy of the questions, so later catalog changes cannot leak in.
pub struct QuizSession {
    quiz_id: QuizId,
    quiz_title: String,
    questions: Vec<Question>,
    taker_name: String,
    normalized_name: String,
    current: usize,
    score: u32,
    state: SessionState,
}

impl QuizSession {
    /// Start an attempt at `quiz` for `taker_name`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` when the name is empty after normalization.
    pub fn start(quiz: &Quiz, taker_name: &str) -> Result<Self, SessionError> {
        let normalized_name = normalize_name(taker_name);
        if normalized_name.is_empty() {
            return Err(SessionError::InvalidInput(
                "taker name cannot be blank".into(),
            ));
        }

        Ok(Self {
            quiz_id: quiz.id().clone(),
            quiz_title: quiz.title().to_owned(),
            questions: quiz.questions().to_vec(),
            taker_name: display_name(taker_name).to_owned(),
            normalized_name,
            current: 0,
            score: 0,
            state: SessionState::AwaitingSelection,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    #[must_use]
    pub fn taker_name(&self) -> &str {
        &self.taker_name
    }

    #[must_use]
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Completed)
    }

    /// Question currently on screen, `None` once completed.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        self.questions.get(self.current)
    }

    /// Tentative choice for the current question, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            SessionState::AwaitingConfirmation { selected }
            | SessionState::Feedback { selected, .. } => Some(selected),
            SessionState::AwaitingSelection | SessionState::Completed => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answered = match self.state {
            SessionState::Completed => self.questions.len(),
            SessionState::Feedback { .. } => self.current + 1,
            _ => self.current,
        };
        SessionProgress {
            total: self.questions.len(),
            answered,
            current_index: self.current,
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// Pick an option for the current question. Re-selecting before
    /// confirmation replaces the previous choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` after confirmation or completion, and
    /// `SessionError::InvalidInput` for an index outside the options.
    pub fn select_option(&mut self, index: usize) -> Result<(), SessionError> {
        match self.state {
            SessionState::AwaitingSelection | SessionState::AwaitingConfirmation { .. } => {}
            other => return Err(invalid_state("select an option", other)),
        }

        let len = self.questions[self.current].options().len();
        if index >= len {
            return Err(SessionError::InvalidInput(format!(
                "option {index} out of range for {len} options"
            )));
        }

        self.state = SessionState::AwaitingConfirmation { selected: index };
        Ok(())
    }

    /// Lock in the selected option and score it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` when nothing is selected or the
    /// question was already confirmed. Nothing changes in that case.
    pub fn confirm_answer(&mut self) -> Result<AnswerFeedback, SessionError> {
        let SessionState::AwaitingConfirmation { selected } = self.state else {
            return Err(invalid_state("confirm an answer", self.state));
        };

        let question = &self.questions[self.current];
        let correct = question.is_correct(selected);
        if correct {
            self.score += 1;
        }
        self.state = SessionState::Feedback { selected, correct };

        Ok(AnswerFeedback {
            question_index: self.current,
            selected,
            correct_index: question.answer_index(),
            is_correct: correct,
            explanation: question.explanation().to_owned(),
        })
    }

    /// Move past a confirmed question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the current question has been
    /// confirmed. In particular a second call after completion fails and does
    /// not produce another record.
    pub fn advance(&mut self) -> Result<Step, SessionError> {
        let SessionState::Feedback { .. } = self.state else {
            return Err(invalid_state("advance", self.state));
        };

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.state = SessionState::AwaitingSelection;
            return Ok(Step::Next {
                index: self.current,
            });
        }

        self.state = SessionState::Completed;
        Ok(Step::Completed(self.build_record()))
    }

    fn build_record(&self) -> NewResultRecord {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        NewResultRecord {
            user_name: self.taker_name.clone(),
            normalized_user_name: self.normalized_name.clone(),
            quiz_id: self.quiz_id.clone(),
            quiz_title: self.quiz_title.clone(),
            score: self.score,
            total_questions: total,
            percentage: percentage(self.score, total),
        }
    }
}

fn invalid_state(action: &'static str, state: SessionState) -> SessionError {
    SessionError::InvalidState {
        action,
        phase: state.phase(),
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
