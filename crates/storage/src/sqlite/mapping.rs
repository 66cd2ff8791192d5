use quiz_core::model::{QuizId, ResultRecord};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn percentage_from_i64(v: i64) -> Result<u8, StorageError> {
    u8::try_from(v)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| StorageError::Serialization(format!("invalid percentage: {v}")))
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<ResultRecord, StorageError> {
    Ok(ResultRecord {
        id: Some(row.try_get("id").map_err(ser)?),
        user_name: row.try_get("user_name").map_err(ser)?,
        normalized_user_name: row.try_get("normalized_user_name").map_err(ser)?,
        quiz_id: QuizId::new(row.try_get::<String, _>("quiz_id").map_err(ser)?),
        quiz_title: row.try_get("quiz_title").map_err(ser)?,
        score: u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?,
        total_questions: u32_from_i64(
            "total_questions",
            row.try_get::<i64, _>("total_questions").map_err(ser)?,
        )?,
        percentage: percentage_from_i64(row.try_get::<i64, _>("percentage").map_err(ser)?)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
