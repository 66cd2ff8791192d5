use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::QuizId;
use crate::name::normalize_name;

//
// ─── NEW RESULT ────────────────────────────────────────────────────────────────
//

/// Outcome of one completed attempt, before the store stamps it.
///
/// Only a finished `QuizSession` produces these, so `score <= total_questions`
/// and `total_questions > 0` hold by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResultRecord {
    pub user_name: String,
    pub normalized_user_name: String,
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u8,
}

impl NewResultRecord {
    /// Attach the store-assigned timestamp.
    #[must_use]
    pub fn into_persisted(self, id: Option<i64>, created_at: DateTime<Utc>) -> ResultRecord {
        ResultRecord {
            id,
            user_name: self.user_name,
            normalized_user_name: Some(self.normalized_user_name),
            quiz_id: self.quiz_id,
            quiz_title: self.quiz_title,
            score: self.score,
            total_questions: self.total_questions,
            percentage: self.percentage,
            created_at,
        }
    }
}

//
// ─── PERSISTED RESULT ──────────────────────────────────────────────────────────
//

/// A result as read back from the store.
///
/// `normalized_user_name` may be missing on older rows; use [`ResultRecord::grouping_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_name: String,
    #[serde(default)]
    pub normalized_user_name: Option<String>,
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u8,
    pub created_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Stored key when present and non-empty, otherwise recomputed from `user_name`.
    #[must_use]
    pub fn grouping_key(&self) -> String {
        match self.normalized_user_name.as_deref() {
            Some(key) if !key.is_empty() => key.to_owned(),
            _ => normalize_name(&self.user_name),
        }
    }
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Verdict shown on the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFeedback {
    /// 100%.
    Perfect,
    /// 80% and above.
    Excellent,
    /// 50% and above.
    Passing,
    KeepPracticing,
}

impl ResultFeedback {
    #[must_use]
    pub fn for_percentage(percentage: u8) -> Self {
        match percentage {
            100.. => Self::Perfect,
            80..=99 => Self::Excellent,
            50..=79 => Self::Passing,
            _ => Self::KeepPracticing,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect! Every principle is fully understood.",
            Self::Excellent => "Excellent! Review the few misses and you are there.",
            Self::Passing => "Passed, but some areas are still fuzzy. Review them.",
            Self::KeepPracticing => "Plenty of room to grow. Reread the material and try again.",
        }
    }
}
