use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{StorageError, truncate_body},
    model::{HabitRecord, NewHabit},
};

use super::HabitStore;

pub const HABIT_TABLE: &str = "habit_item";

/// Client for the habit table behind a hosted PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct RestHabitStore {
    table_url: String,
    api_key: String,
    http: Client,
}

#[derive(Debug, Serialize)]
struct CompletedPatch {
    completed: bool,
}

impl RestHabitStore {
    /// `project_url` is the project root, e.g. `https://abcd.supabase.co`.
    pub fn new(project_url: &str, api_key: String) -> Self {
        Self {
            table_url: table_url(project_url),
            api_key,
            http: Client::new(),
        }
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    fn returning(&self, req: RequestBuilder) -> RequestBuilder {
        self.authorized(req).header("Prefer", "return=representation")
    }
}

fn table_url(project_url: &str) -> String {
    format!("{}/rest/v1/{HABIT_TABLE}", project_url.trim_end_matches('/'))
}

async fn read_rows<T: DeserializeOwned>(res: Response) -> Result<Vec<T>, StorageError> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(StorageError::Status {
            status: status.as_u16(),
            message: truncate_body(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl HabitStore for RestHabitStore {
    async fn list(&self) -> Result<Vec<HabitRecord>, StorageError> {
        tracing::debug!(table = HABIT_TABLE, "Listing habits");

        let res = self
            .authorized(self.http.get(&self.table_url))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let rows: Vec<HabitRecord> = read_rows(res).await?;
        tracing::debug!(count = rows.len(), "Fetched habits");
        Ok(rows)
    }

    async fn create(&self, habit: NewHabit) -> Result<HabitRecord, StorageError> {
        let res = self
            .returning(self.http.post(&self.table_url))
            .json(&habit)
            .send()
            .await?;

        let created = read_rows::<HabitRecord>(res)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Parse("insert returned no rows".to_string()))?;

        tracing::info!(id = created.id, label = %created.label, "Created habit");
        Ok(created)
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<HabitRecord, StorageError> {
        let res = self
            .returning(self.http.patch(&self.table_url))
            .query(&[("id", format!("eq.{id}"))])
            .json(&CompletedPatch { completed })
            .send()
            .await?;

        let updated = read_rows::<HabitRecord>(res)
            .await?
            .into_iter()
            .next()
            .ok_or(StorageError::NotFound(id))?;

        tracing::debug!(id, completed, "Updated habit");
        Ok(updated)
    }
}
