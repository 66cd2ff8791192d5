//! Learner progress dashboard: one row per taker, one column per quiz.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::aggregate;
use quiz_core::model::{ProficiencyBand, QuizCatalog, QuizId, UserSummary};

use crate::error::StoreError;
use crate::record_store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardColumn {
    pub quiz_id: QuizId,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizCell {
    pub highest_score: u8,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    pub normalized_user_name: String,
    pub display_name: String,
    pub total_attempts: u32,
    pub last_attempt_at: DateTime<Utc>,
    /// Aligned with [`Dashboard::columns`]; `None` means never attempted.
    pub cells: Vec<Option<QuizCell>>,
    pub proficiency: u8,
    pub band: ProficiencyBand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub columns: Vec<DashboardColumn>,
    pub rows: Vec<DashboardRow>,
}

impl Dashboard {
    /// Lay summaries out against the catalog's quiz order.
    ///
    /// Results for quizzes missing from the catalog still count toward
    /// proficiency but get no column. With an empty catalog the columns come
    /// from the quizzes seen in the summaries instead.
    #[must_use]
    pub fn build(catalog: &QuizCatalog, summaries: &[UserSummary]) -> Self {
        let columns = if catalog.is_empty() {
            columns_from_summaries(summaries)
        } else {
            catalog
                .quizzes()
                .iter()
                .map(|quiz| DashboardColumn {
                    quiz_id: quiz.id().clone(),
                    title: quiz.title().to_owned(),
                })
                .collect()
        };

        let rows = summaries
            .iter()
            .map(|summary| DashboardRow {
                normalized_user_name: summary.normalized_user_name.clone(),
                display_name: summary.display_name.clone(),
                total_attempts: summary.total_attempts,
                last_attempt_at: summary.last_attempt_at,
                cells: columns
                    .iter()
                    .map(|column| {
                        summary.quiz(column.quiz_id.as_str()).map(|stat| QuizCell {
                            highest_score: stat.highest_score,
                            attempts: stat.attempts,
                        })
                    })
                    .collect(),
                proficiency: summary.overall_proficiency,
                band: summary.band(),
            })
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn columns_from_summaries(summaries: &[UserSummary]) -> Vec<DashboardColumn> {
    let mut seen: BTreeMap<&QuizId, &str> = BTreeMap::new();
    for summary in summaries {
        for (quiz_id, stat) in &summary.per_quiz {
            seen.entry(quiz_id).or_insert(stat.title.as_str());
        }
    }
    seen.into_iter()
        .map(|(quiz_id, title)| DashboardColumn {
            quiz_id: quiz_id.clone(),
            title: title.to_owned(),
        })
        .collect()
}

/// Loads the full result history and aggregates it for display.
#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<QuizCatalog>,
    store: RecordStore,
}

impl DashboardService {
    #[must_use]
    pub fn new(catalog: Arc<QuizCatalog>, store: RecordStore) -> Self {
        Self { catalog, store }
    }

    /// Per-taker summaries over every stored result.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the results cannot be listed.
    pub async fn summaries(&self) -> Result<Vec<UserSummary>, StoreError> {
        let records = self.store.list_all().await?;
        Ok(aggregate(&records))
    }

    /// Build the dashboard table.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the results cannot be listed.
    pub async fn load(&self) -> Result<Dashboard, StoreError> {
        let summaries = self.summaries().await?;
        let dashboard = Dashboard::build(&self.catalog, &summaries);
        tracing::debug!(
            users = dashboard.rows.len(),
            quizzes = dashboard.columns.len(),
            "dashboard built"
        );
        Ok(dashboard)
    }
}
