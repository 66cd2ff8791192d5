use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use quiz_core::model::{NewResultRecord, QuizId};
use serde_json::{Value, json};
use storage::{RestConfig, RestRepository, ResultRepository, StorageError};

const API_KEY: &str = "anon-test-key";

#[derive(Clone, Default)]
struct MockTable {
    rows: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok());
    apikey == Some(API_KEY) && bearer == Some(format!("Bearer {API_KEY}").as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid API key" })),
    )
        .into_response()
}

async fn insert_rows(
    State(table): State<MockTable>,
    headers: HeaderMap,
    Json(body): Json<Vec<Value>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut rows = table.rows.lock().unwrap();
    for mut row in body {
        let id = rows.len() + 1;
        row["id"] = json!(id);
        row["created_at"] = json!(format!("2024-01-0{id}T10:00:00.123456+00:00"));
        rows.push(row);
    }
    StatusCode::CREATED.into_response()
}

async fn list_rows(State(table): State<MockTable>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut rows = table.rows.lock().unwrap().clone();
    rows.reverse();
    Json(rows).into_response()
}

async fn spawn_mock() -> (String, MockTable) {
    let table = MockTable::default();
    let app = Router::new()
        .route("/rest/v1/quiz_results", get(list_rows).post(insert_rows))
        .with_state(table.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}"), table)
}

fn new_record(user: &str, quiz: &str, score: u32) -> NewResultRecord {
    NewResultRecord {
        user_name: user.into(),
        normalized_user_name: quiz_core::normalize_name(user),
        quiz_id: QuizId::new(quiz),
        quiz_title: format!("Title {quiz}"),
        score,
        total_questions: 4,
        percentage: quiz_core::score::percentage(score, 4),
    }
}

#[tokio::test]
async fn insert_then_list_round_trips_through_postgrest() {
    let (base_url, table) = spawn_mock().await;
    let repo = RestRepository::new(RestConfig::new(&base_url, API_KEY)).unwrap();

    repo.insert_result(&new_record("山田 太郎", "quiz1", 3))
        .await
        .unwrap();
    repo.insert_result(&new_record("Alice", "quiz2", 4))
        .await
        .unwrap();

    let stored = table.rows.lock().unwrap().clone();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["normalized_user_name"], "山田太郎");
    assert_eq!(stored[0]["total_questions"], 4);
    assert_eq!(stored[0]["percentage"], 75);

    let listed = repo.list_results().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].user_name, "Alice");
    assert_eq!(listed[0].percentage, 100);
    assert_eq!(listed[1].quiz_id, QuizId::new("quiz1"));
    assert!(listed[0].created_at > listed[1].created_at);
}

#[tokio::test]
async fn remote_error_message_is_surfaced() {
    let (base_url, _table) = spawn_mock().await;
    let repo = RestRepository::new(RestConfig::new(&base_url, "wrong-key")).unwrap();

    let err = repo.list_results().await.unwrap_err();
    match err {
        StorageError::Remote { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = repo
        .insert_result(&new_record("Bob", "quiz1", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Remote { status: 401, .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let repo =
        RestRepository::new(RestConfig::new(format!("http://127.0.0.1:{port}"), API_KEY)).unwrap();
    let err = repo.list_results().await.unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));
}
