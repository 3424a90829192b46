pub mod jira;
pub mod toggl;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::model::{Me, Project, TimeEntry};

/// Where tracked time comes from.
#[async_trait]
pub trait TimeSource: Send + Sync {
    async fn get_me(&self) -> Result<Me>;
    /// Entries started in `[start, end)`, in the order the source returns them.
    async fn get_time_entries(&self, start: DateTime<Utc>, end: DateTime<Utc>)
        -> Result<Vec<TimeEntry>>;
    async fn get_project(&self, id: u64) -> Result<Project>;
}

/// Where work logs are posted.
#[async_trait]
pub trait TicketSink: Send + Sync {
    /// Post `duration_seconds` against `ticket`. A `description` is attached as
    /// free-text context for overhead work; project work carries none.
    async fn log_work(
        &self,
        ticket: &str,
        duration_seconds: i64,
        description: Option<&str>,
    ) -> Result<()>;
}

#[cfg(test)]
pub mod tests;

pub fn create_time_source(config: &AppConfig) -> toggl::TogglSource {
    let (username, password) = config.toggl.credentials();
    toggl::TogglSource::new(config.toggl.server_url(), &username, &password)
}

pub fn create_ticket_sink(config: &AppConfig) -> jira::JiraSink {
    jira::JiraSink::new(
        &config.jira.server_url,
        &config.jira.username,
        &config.jira.password,
    )
}
