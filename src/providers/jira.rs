use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use super::toggl::basic_auth;
use super::TicketSink;

pub const WORK_LOG_FOOTER: &str = "Added automatically by toggl-sync";

pub struct JiraSink {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraSink {
    pub fn new(server_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: format!("{}/rest/api/latest", server_url.trim_end_matches('/')),
            auth_header: basic_auth(username, password),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct WorkLogEntry {
    comment: String,
    time_spent_seconds: i64,
}

impl WorkLogEntry {
    fn new(duration_seconds: i64, description: Option<&str>) -> Self {
        let comment = match description {
            Some(text) => format!("{text}\n{WORK_LOG_FOOTER}"),
            None => WORK_LOG_FOOTER.to_string(),
        };
        Self {
            comment,
            time_spent_seconds: duration_seconds,
        }
    }
}

#[async_trait]
impl TicketSink for JiraSink {
    async fn log_work(
        &self,
        ticket: &str,
        duration_seconds: i64,
        description: Option<&str>,
    ) -> Result<()> {
        let entry = WorkLogEntry::new(duration_seconds, description);
        let url = format!(
            "{}/issue/{}/worklog",
            self.base_url,
            urlencoding::encode(ticket)
        );
        tracing::debug!(%url, ticket, duration_seconds, "POST jira worklog");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&entry)
            .send()
            .await
            .with_context(|| format!("Request to log work for ticket [{ticket}] failed"))?;

        if resp.status() != StatusCode::CREATED {
            bail!(
                "Request to log work for ticket [{ticket}] failed with status [{}]",
                resp.status().as_u16()
            );
        }
        Ok(())
    }
}
