use chrono::Duration;
use quiz_core::Clock;
use quiz_core::model::{NewResultRecord, QuizId};
use quiz_core::time::fixed_now;
use storage::{ResultRepository, SqliteRepository};

fn new_record(user: &str, quiz: &str, score: u32, total: u32) -> NewResultRecord {
    NewResultRecord {
        user_name: user.into(),
        normalized_user_name: quiz_core::normalize_name(user),
        quiz_id: QuizId::new(quiz),
        quiz_title: format!("Title {quiz}"),
        score,
        total_questions: total,
        percentage: quiz_core::score::percentage(score, total),
    }
}

#[tokio::test]
async fn sqlite_roundtrip_assigns_created_at_and_orders_newest_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_results?mode=memory&cache=shared")
        .await
        .expect("connect")
        .with_clock(Clock::fixed(fixed_now()));
    repo.migrate().await.expect("migrate");

    repo.insert_result(&new_record("山田 太郎", "quiz1", 7, 9))
        .await
        .unwrap();
    repo.insert_result_at(
        &new_record("Alice", "quiz2", 1, 2),
        fixed_now() + Duration::minutes(30),
    )
    .await
    .unwrap();

    let rows = repo.list_results().await.expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].user_name, "Alice");
    assert_eq!(rows[0].percentage, 50);
    assert_eq!(rows[1].user_name, "山田 太郎");
    assert_eq!(rows[1].normalized_user_name.as_deref(), Some("山田太郎"));
    assert_eq!(rows[1].percentage, 78);
    assert_eq!(rows[1].created_at, fixed_now());
    assert!(rows[1].id.is_some());
}

#[tokio::test]
async fn sqlite_migration_is_idempotent_and_tolerates_missing_normalized_name() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_legacy?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.migrate().await.expect("second migrate is a no-op");

    sqlx::query(
        r"
            INSERT INTO quiz_results (
                user_name, normalized_user_name, quiz_id, quiz_title,
                score, total_questions, percentage, created_at
            )
            VALUES ('Bob', NULL, 'quiz3', 'Quiz 3', 2, 4, 50, ?1)
        ",
    )
    .bind(fixed_now())
    .execute(repo.pool())
    .await
    .unwrap();

    let rows = repo.list_results().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].normalized_user_name, None);
    assert_eq!(rows[0].grouping_key(), "Bob");
}

#[tokio::test]
async fn sqlite_rejects_score_above_total() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_checks?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut bad = new_record("Eve", "quiz1", 3, 3);
    bad.score = 4;
    assert!(repo.insert_result(&bad).await.is_err());
    assert!(repo.list_results().await.unwrap().is_empty());
}
