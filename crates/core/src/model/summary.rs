use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::ids::QuizId;

/// Per-quiz statistics for one taker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStat {
    pub title: String,
    pub attempts: u32,
    /// Best percentage across all attempts.
    pub highest_score: u8,
}

/// Colour band for a proficiency value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProficiencyBand {
    /// No quiz attempted, no band.
    None,
    Low,
    Mid,
    High,
}

impl ProficiencyBand {
    /// Band for `proficiency` given how many distinct quizzes back it.
    ///
    /// A taker with attempts always gets a band, even at 0%.
    #[must_use]
    pub fn classify(proficiency: u8, attempted_quizzes: usize) -> Self {
        if attempted_quizzes == 0 {
            return Self::None;
        }
        match proficiency {
            80.. => Self::High,
            50..=79 => Self::Mid,
            _ => Self::Low,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

/// Dashboard summary for one normalized taker name.
///
/// Derived on every aggregation run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub normalized_user_name: String,
    /// `user_name` of the most recent attempt.
    pub display_name: String,
    pub total_attempts: u32,
    pub last_attempt_at: DateTime<Utc>,
    pub per_quiz: BTreeMap<QuizId, QuizStat>,
    /// Rounded mean of `highest_score` over attempted quizzes only.
    pub overall_proficiency: u8,
}

impl UserSummary {
    #[must_use]
    pub fn band(&self) -> ProficiencyBand {
        ProficiencyBand::classify(self.overall_proficiency, self.per_quiz.len())
    }

    #[must_use]
    pub fn quiz(&self, id: &str) -> Option<&QuizStat> {
        self.per_quiz.get(id)
    }
}
