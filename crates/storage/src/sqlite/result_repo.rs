use chrono::{DateTime, Utc};
use quiz_core::model::{NewResultRecord, ResultRecord};

use super::{SqliteRepository, mapping::map_result_row};
use crate::repository::{ResultRepository, StorageError};

impl SqliteRepository {
    /// Insert with an explicit `created_at`, returning the new row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the insert fails.
    pub async fn insert_result_at(
        &self,
        record: &NewResultRecord,
        created_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_results (
                    user_name, normalized_user_name, quiz_id, quiz_title,
                    score, total_questions, percentage, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(&record.user_name)
        .bind(&record.normalized_user_name)
        .bind(record.quiz_id.as_str())
        .bind(&record.quiz_title)
        .bind(i64::from(record.score))
        .bind(i64::from(record.total_questions))
        .bind(i64::from(record.percentage))
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }
}

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn insert_result(&self, record: &NewResultRecord) -> Result<(), StorageError> {
        let id = self.insert_result_at(record, self.clock.now()).await?;
        tracing::debug!(id, quiz_id = %record.quiz_id, "inserted quiz result");
        Ok(())
    }

    async fn list_results(&self) -> Result<Vec<ResultRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, user_name, normalized_user_name, quiz_id, quiz_title,
                    score, total_questions, percentage, created_at
                FROM quiz_results
                ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }
}
