use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuizId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz id cannot be empty")]
    EmptyId,

    #[error("quiz {quiz_id} has an empty title")]
    EmptyTitle { quiz_id: QuizId },

    #[error("quiz {quiz_id} has no questions")]
    NoQuestions { quiz_id: QuizId },

    #[error("quiz {quiz_id}, question {question}: needs at least 2 options, got {len}")]
    TooFewOptions {
        quiz_id: QuizId,
        question: usize,
        len: usize,
    },

    #[error("quiz {quiz_id}, question {question}: answer index {answer} out of range for {len} options")]
    AnswerOutOfRange {
        quiz_id: QuizId,
        question: usize,
        answer: usize,
        len: usize,
    },

    #[error("duplicate quiz id: {0}")]
    DuplicateId(QuizId),
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub answer: usize,
    #[serde(default)]
    pub explanation: String,
}

/// Unvalidated quiz as it appears in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDraft {
    pub id: QuizId,
    pub title: String,
    pub questions: Vec<QuestionDraft>,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Always holds at least two options and an answer index that points into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    answer_index: usize,
    explanation: String,
}

impl Question {
    fn from_draft(quiz_id: &QuizId, position: usize, draft: QuestionDraft) -> Result<Self, QuizError> {
        let len = draft.options.len();
        if len < 2 {
            return Err(QuizError::TooFewOptions {
                quiz_id: quiz_id.clone(),
                question: position,
                len,
            });
        }
        if draft.answer >= len {
            return Err(QuizError::AnswerOutOfRange {
                quiz_id: quiz_id.clone(),
                question: position,
                answer: draft.answer,
                len,
            });
        }

        Ok(Self {
            text: draft.question,
            options: draft.options,
            answer_index: draft.answer,
            explanation: draft.explanation,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.answer_index
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A titled, ordered list of questions. Question order is presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    questions: Vec<Question>,
}

impl Quiz {
    /// Validate a draft into a quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the id or title is blank, there are no questions,
    /// or any question has fewer than two options or an out-of-range answer.
    pub fn from_draft(draft: QuizDraft) -> Result<Self, QuizError> {
        if draft.id.is_blank() {
            return Err(QuizError::EmptyId);
        }
        if draft.title.trim().is_empty() {
            return Err(QuizError::EmptyTitle { quiz_id: draft.id });
        }
        if draft.questions.is_empty() {
            return Err(QuizError::NoQuestions { quiz_id: draft.id });
        }

        let questions = draft
            .questions
            .into_iter()
            .enumerate()
            .map(|(position, q)| Question::from_draft(&draft.id, position, q))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: draft.id,
            title: draft.title,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Home-page entry for a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizListing {
    pub id: QuizId,
    pub title: String,
    pub question_count: usize,
}

/// Read-only set of quizzes, kept in canonical display order.
#[derive(Debug, Clone, Default)]
pub struct QuizCatalog {
    quizzes: Vec<Quiz>,
    index: HashMap<QuizId, usize>,
}

impl QuizCatalog {
    /// Build a catalog; the given order becomes the canonical order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::DuplicateId` if two quizzes share an id.
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self, QuizError> {
        let mut seen = HashSet::with_capacity(quizzes.len());
        for quiz in &quizzes {
            if !seen.insert(quiz.id.clone()) {
                return Err(QuizError::DuplicateId(quiz.id.clone()));
            }
        }

        let index = quizzes
            .iter()
            .enumerate()
            .map(|(i, quiz)| (quiz.id.clone(), i))
            .collect();
        Ok(Self { quizzes, index })
    }

    /// Validate every draft and build a catalog.
    ///
    /// # Errors
    ///
    /// Returns the first `QuizError` encountered.
    pub fn from_drafts(drafts: Vec<QuizDraft>) -> Result<Self, QuizError> {
        let quizzes = drafts
            .into_iter()
            .map(Quiz::from_draft)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(quizzes)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Quiz> {
        self.index.get(id).map(|&i| &self.quizzes[i])
    }

    #[must_use]
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    #[must_use]
    pub fn canonical_order(&self) -> Vec<QuizId> {
        self.quizzes.iter().map(|q| q.id.clone()).collect()
    }

    #[must_use]
    pub fn listings(&self) -> Vec<QuizListing> {
        self.quizzes
            .iter()
            .map(|q| QuizListing {
                id: q.id.clone(),
                title: q.title.clone(),
                question_count: q.question_count(),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: usize, options: &[&str]) -> QuestionDraft {
        QuestionDraft {
            question: "Q".into(),
            options: options.iter().map(|s| (*s).to_string()).collect(),
            answer,
            explanation: "because".into(),
        }
    }

    fn draft(id: &str, questions: Vec<QuestionDraft>) -> QuizDraft {
        QuizDraft {
            id: QuizId::new(id),
            title: format!("Title {id}"),
            questions,
        }
    }

    #[test]
    fn valid_draft_builds_quiz() {
        let quiz = Quiz::from_draft(draft("quiz1", vec![question(1, &["a", "b", "c"])])).unwrap();
        assert_eq!(quiz.question_count(), 1);
        assert_eq!(quiz.questions()[0].answer_index(), 1);
        assert!(quiz.questions()[0].is_correct(1));
        assert!(!quiz.questions()[0].is_correct(0));
    }

    #[test]
    fn rejects_single_option() {
        let err = Quiz::from_draft(draft("quiz1", vec![question(0, &["only"])])).unwrap_err();
        assert!(matches!(err, QuizError::TooFewOptions { len: 1, .. }));
    }

    #[test]
    fn rejects_answer_out_of_range() {
        let err = Quiz::from_draft(draft("quiz1", vec![question(2, &["a", "b"])])).unwrap_err();
        assert!(matches!(
            err,
            QuizError::AnswerOutOfRange {
                answer: 2,
                len: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_quiz_without_questions() {
        let err = Quiz::from_draft(draft("quiz1", Vec::new())).unwrap_err();
        assert!(matches!(err, QuizError::NoQuestions { .. }));
    }

    #[test]
    fn catalog_keeps_order_and_rejects_duplicates() {
        let catalog = QuizCatalog::from_drafts(vec![
            draft("quiz2", vec![question(0, &["a", "b"])]),
            draft("quiz1", vec![question(0, &["a", "b"]), question(1, &["a", "b"])]),
        ])
        .unwrap();
        assert_eq!(
            catalog.canonical_order(),
            vec![QuizId::new("quiz2"), QuizId::new("quiz1")]
        );
        assert_eq!(catalog.get("quiz1").unwrap().question_count(), 2);
        assert!(catalog.get("quiz9").is_none());
        assert_eq!(catalog.listings()[1].question_count, 2);

        let err = QuizCatalog::from_drafts(vec![
            draft("quiz1", vec![question(0, &["a", "b"])]),
            draft("quiz1", vec![question(0, &["a", "b"])]),
        ])
        .unwrap_err();
        assert_eq!(err, QuizError::DuplicateId(QuizId::new("quiz1")));
    }

    #[test]
    fn draft_parses_catalog_json_shape() {
        let json = r#"{
            "id": "quiz1",
            "title": "Basics",
            "questions": [
                { "question": "2 + 2?", "options": ["3", "4"], "answer": 1, "explanation": "four" }
            ]
        }"#;
        let parsed: QuizDraft = serde_json::from_str(json).unwrap();
        let quiz = Quiz::from_draft(parsed).unwrap();
        assert_eq!(quiz.questions()[0].text(), "2 + 2?");
        assert_eq!(quiz.questions()[0].explanation(), "four");
    }
}
