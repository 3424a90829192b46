use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::TimeSource;
use crate::model::{Me, Project, TimeEntry};

pub struct TogglSource {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl TogglSource {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: basic_auth(username, password),
            client: reqwest::Client::new(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET toggl");

        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .with_context(|| format!("Toggl request to {path} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Toggl request to {path} failed with status [{}]", status.as_u16());
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse Toggl response from {path}"))
    }
}

pub(crate) fn basic_auth(username: &str, password: &str) -> String {
    let creds = format!("{username}:{password}");
    let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
    format!("Basic {encoded}")
}

/// Toggl wraps single resources in a `data` envelope.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[async_trait]
impl TimeSource for TogglSource {
    async fn get_me(&self) -> Result<Me> {
        let me: Envelope<Me> = self.get("/me", &[]).await?;
        Ok(me.data)
    }

    async fn get_time_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        let query = [
            ("start_date", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("end_date", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        let entries: Vec<TimeEntry> = self.get("/time_entries", &query).await?;
        tracing::debug!(count = entries.len(), "fetched time entries");
        Ok(entries)
    }

    async fn get_project(&self, id: u64) -> Result<Project> {
        let project: Envelope<Project> = self.get(&format!("/projects/{id}"), &[]).await?;
        Ok(project.data)
    }
}
