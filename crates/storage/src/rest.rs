//! PostgREST adapter (the REST interface Supabase exposes for a table).

use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{NewResultRecord, ResultRecord};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::repository::{ResultRepository, Storage, StorageError};

pub const DEFAULT_TABLE: &str = "quiz_results";

/// Endpoint and key for the remote table.
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl RestConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.into(),
            timeout: Duration::from_secs(10),
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }
}

#[derive(Clone)]
pub struct RestRepository {
    client: Client,
    config: RestConfig,
}

impl RestRepository {
    /// Build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the client cannot be constructed.
    pub fn new(config: RestConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: String,
}

async fn ensure_success(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RemoteErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    Err(StorageError::Remote {
        status: status.as_u16(),
        message,
    })
}

fn connection(e: reqwest::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl ResultRepository for RestRepository {
    async fn insert_result(&self, record: &NewResultRecord) -> Result<(), StorageError> {
        let response = self
            .authed(self.client.post(self.config.table_url()))
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(connection)?;
        ensure_success(response).await?;
        tracing::debug!(quiz_id = %record.quiz_id, "inserted quiz result remotely");
        Ok(())
    }

    async fn list_results(&self) -> Result<Vec<ResultRecord>, StorageError> {
        let response = self
            .authed(self.client.get(self.config.table_url()))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(connection)?;
        let body = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(connection)?;
        let rows: Vec<ResultRecord> =
            serde_json::from_str(&body).map_err(|e| StorageError::Serialization(e.to_string()))?;
        tracing::debug!(count = rows.len(), "listed remote quiz results");
        Ok(rows)
    }
}

impl Storage {
    /// Build a `Storage` backed by a PostgREST endpoint.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the HTTP client cannot be built.
    pub fn rest(config: RestConfig) -> Result<Self, StorageError> {
        let results: Arc<dyn ResultRepository> = Arc::new(RestRepository::new(config)?);
        Ok(Self { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_tolerates_trailing_slash() {
        let config = RestConfig::new("https://example.supabase.co/", "key");
        assert_eq!(
            config.table_url(),
            "https://example.supabase.co/rest/v1/quiz_results"
        );
    }
}
