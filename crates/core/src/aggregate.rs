//! Dashboard aggregation over the full result history.
//!
//! Input order does not affect the aggregates. It only decides which
//! `user_name` wins when two attempts of one taker share the latest timestamp
//! (the first one seen is kept).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::model::{QuizId, QuizStat, ResultRecord, UserSummary};
use crate::score::rounded_mean;

struct UserAccumulator {
    key: String,
    display_name: String,
    last_attempt_at: DateTime<Utc>,
    total_attempts: u32,
    per_quiz: BTreeMap<QuizId, QuizStat>,
}

impl UserAccumulator {
    fn new(key: String, first: &ResultRecord) -> Self {
        Self {
            key,
            display_name: first.user_name.clone(),
            last_attempt_at: first.created_at,
            total_attempts: 0,
            per_quiz: BTreeMap::new(),
        }
    }

    fn push(&mut self, record: &ResultRecord) {
        self.total_attempts = self.total_attempts.saturating_add(1);

        if record.created_at > self.last_attempt_at {
            self.last_attempt_at = record.created_at;
            self.display_name.clone_from(&record.user_name);
        }

        let stat = self
            .per_quiz
            .entry(record.quiz_id.clone())
            .or_insert_with(|| QuizStat {
                title: record.quiz_title.clone(),
                attempts: 0,
                highest_score: 0,
            });
        stat.attempts = stat.attempts.saturating_add(1);
        stat.highest_score = stat.highest_score.max(record.percentage);
    }

    fn finish(self) -> UserSummary {
        let overall_proficiency =
            rounded_mean(self.per_quiz.values().map(|s| s.highest_score)).unwrap_or(0);
        UserSummary {
            normalized_user_name: self.key,
            display_name: self.display_name,
            total_attempts: self.total_attempts,
            last_attempt_at: self.last_attempt_at,
            per_quiz: self.per_quiz,
            overall_proficiency,
        }
    }
}

/// Build one summary per normalized taker name.
///
/// Records whose grouping key is empty are skipped. The result is ordered by
/// most recent attempt first, then by normalized name. An empty input gives an
/// empty list.
#[must_use]
pub fn aggregate(records: &[ResultRecord]) -> Vec<UserSummary> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut users: Vec<UserAccumulator> = Vec::new();

    for record in records {
        let key = record.grouping_key();
        if key.is_empty() {
            continue;
        }

        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                users.push(UserAccumulator::new(key.clone(), record));
                slots.insert(key, users.len() - 1);
                users.len() - 1
            }
        };
        users[slot].push(record);
    }

    let mut summaries: Vec<UserSummary> = users.into_iter().map(UserAccumulator::finish).collect();
    summaries.sort_by(|a, b| {
        b.last_attempt_at
            .cmp(&a.last_attempt_at)
            .then_with(|| a.normalized_user_name.cmp(&b.normalized_user_name))
    });
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProficiencyBand;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn record(user: &str, quiz: &str, percentage: u8, minutes: i64) -> ResultRecord {
        ResultRecord {
            id: None,
            user_name: user.into(),
            normalized_user_name: Some(crate::name::normalize_name(user)),
            quiz_id: QuizId::new(quiz),
            quiz_title: format!("Title {quiz}"),
            score: u32::from(percentage) / 10,
            total_questions: 10,
            percentage,
            created_at: fixed_now() + Duration::minutes(minutes),
        }
    }

    #[test]
    fn best_score_per_quiz_and_proficiency() {
        let records = vec![
            record("A", "quiz1", 80, 0),
            record("A", "quiz1", 60, 1),
            record("A", "quiz2", 40, 2),
        ];
        let summaries = aggregate(&records);
        assert_eq!(summaries.len(), 1);

        let a = &summaries[0];
        assert_eq!(a.total_attempts, 3);
        assert_eq!(a.quiz("quiz1").unwrap().highest_score, 80);
        assert_eq!(a.quiz("quiz1").unwrap().attempts, 2);
        assert_eq!(a.quiz("quiz2").unwrap().highest_score, 40);
        assert_eq!(a.quiz("quiz2").unwrap().attempts, 1);
        assert_eq!(a.overall_proficiency, 60);
        assert_eq!(a.band(), ProficiencyBand::Mid);
    }

    #[test]
    fn unattempted_quiz_is_absent_not_zero() {
        let records = vec![record("A", "quiz1", 90, 0), record("A", "quiz2", 70, 1)];
        let a = &aggregate(&records)[0];
        assert!(a.quiz("quiz3").is_none());
        assert_eq!(a.overall_proficiency, 80);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn spelling_variants_group_together_and_latest_name_wins() {
        let mut early = record("山田 太郎", "quiz1", 50, 0);
        early.normalized_user_name = None;
        let late = record("山田　太郎", "quiz2", 100, 5);
        let middle = record("山田太郎", "quiz1", 70, 3);

        let summaries = aggregate(&[early, late.clone(), middle]);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.normalized_user_name, "山田太郎");
        assert_eq!(s.display_name, "山田　太郎");
        assert_eq!(s.last_attempt_at, late.created_at);
        assert_eq!(s.total_attempts, 3);
        assert_eq!(s.quiz("quiz1").unwrap().highest_score, 70);
    }

    #[test]
    fn records_with_empty_key_are_discarded() {
        let mut blank = record("   ", "quiz1", 100, 0);
        blank.normalized_user_name = Some(String::new());
        let summaries = aggregate(&[blank, record("B", "quiz1", 20, 1)]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].normalized_user_name, "B");
        assert_eq!(summaries[0].band(), ProficiencyBand::Low);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let records = vec![
            record("A", "quiz1", 80, 0),
            record("B", "quiz1", 30, 4),
            record("A", "quiz2", 90, 2),
            record("C", "quiz1", 100, 4),
            record("B", "quiz3", 60, 1),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = aggregate(&records);
        let backward = aggregate(&reversed);
        assert_eq!(forward, backward);

        let order: Vec<_> = forward
            .iter()
            .map(|s| s.normalized_user_name.as_str())
            .collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn latest_timestamp_tie_keeps_first_seen_name() {
        let first = record("Ann", "quiz1", 10, 0);
        let mut second = record("Ann", "quiz2", 20, 0);
        second.user_name = " Ann ".into();
        let s = &aggregate(&[first, second])[0];
        assert_eq!(s.display_name, "Ann");
    }
}
