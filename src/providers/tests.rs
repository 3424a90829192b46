use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::{TicketSink, TimeSource};
use crate::model::{Me, Project, TimeEntry};

/// A time source serving a fixed day of entries and recording what was asked of it.
pub struct MockSource {
    entries: Vec<TimeEntry>,
    projects: HashMap<u64, String>,
    pub project_calls: Arc<Mutex<Vec<u64>>>,
    pub windows: Arc<Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>>,
    fail_fetch: bool,
}

impl MockSource {
    pub fn new(entries: Vec<TimeEntry>) -> Self {
        Self {
            entries,
            projects: HashMap::new(),
            project_calls: Arc::new(Mutex::new(Vec::new())),
            windows: Arc::new(Mutex::new(Vec::new())),
            fail_fetch: false,
        }
    }

    pub fn with_project(mut self, id: u64, name: &str) -> Self {
        self.projects.insert(id, name.to_string());
        self
    }

    pub fn with_fetch_failure(mut self) -> Self {
        self.fail_fetch = true;
        self
    }
}

#[async_trait]
impl TimeSource for MockSource {
    async fn get_me(&self) -> Result<Me> {
        Ok(Me {
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
        })
    }

    async fn get_time_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        if self.fail_fetch {
            anyhow::bail!("Toggl unreachable");
        }
        self.windows.lock().unwrap().push((start, end));
        Ok(self.entries.clone())
    }

    async fn get_project(&self, id: u64) -> Result<Project> {
        self.project_calls.lock().unwrap().push(id);
        match self.projects.get(&id) {
            Some(name) => Ok(Project {
                id,
                name: name.clone(),
            }),
            None => anyhow::bail!("Project {id} not found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedWork {
    pub ticket: String,
    pub duration_seconds: i64,
    pub description: Option<String>,
}

/// A ticket sink that records every call and rejects configured tickets.
pub struct MockSink {
    pub calls: Arc<Mutex<Vec<LoggedWork>>>,
    rejected: HashSet<String>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            rejected: HashSet::new(),
        }
    }

    pub fn rejecting(mut self, ticket: &str) -> Self {
        self.rejected.insert(ticket.to_string());
        self
    }
}

#[async_trait]
impl TicketSink for MockSink {
    async fn log_work(
        &self,
        ticket: &str,
        duration_seconds: i64,
        description: Option<&str>,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(LoggedWork {
            ticket: ticket.to_string(),
            duration_seconds,
            description: description.map(String::from),
        });
        if self.rejected.contains(ticket) {
            anyhow::bail!("Request to log work for ticket [{ticket}] failed with status [404]");
        }
        Ok(())
    }
}

pub fn make_entry(id: u64, description: &str, duration_seconds: i64, pid: u64) -> TimeEntry {
    let start = Utc.with_ymd_and_hms(2020, 5, 8, 9, 0, 0).unwrap();
    TimeEntry {
        id,
        project_id: Some(pid),
        description: description.to_string(),
        duration_seconds,
        start,
        stop: Some(start + chrono::Duration::seconds(duration_seconds.max(0))),
        tags: vec![],
    }
}

#[tokio::test]
async fn mock_source_looks_up_known_projects() {
    let source = MockSource::new(vec![]).with_project(5, "Team Sync");
    let project = source.get_project(5).await.unwrap();
    assert_eq!(project.name, "Team Sync");
    assert!(source.get_project(6).await.is_err());
    assert_eq!(source.project_calls.lock().unwrap().as_slice(), &[5, 6]);
}

#[tokio::test]
async fn mock_sink_records_rejected_calls_too() {
    let sink = MockSink::new().rejecting("BAD-1");
    assert!(sink.log_work("PROJ-1", 60, None).await.is_ok());
    let err = sink.log_work("BAD-1", 60, Some("x")).await.unwrap_err();
    assert!(err.to_string().contains("BAD-1"));
    assert_eq!(sink.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn trait_objects_are_usable_behind_references() {
    let source: &dyn TimeSource = &MockSource::new(vec![make_entry(1, "PROJ-1", 60, 0)]);
    let start = Utc.with_ymd_and_hms(2020, 5, 8, 0, 0, 0).unwrap();
    let entries = source
        .get_time_entries(start, start + chrono::Duration::days(1))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].project(), None);
}
