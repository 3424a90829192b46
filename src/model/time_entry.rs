use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked interval as returned by Toggl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    /// Toggl reports entries without a project either with no `pid` or with `pid: 0`.
    #[serde(rename = "pid", default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub description: String,
    /// Negative while the timer is still running.
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TimeEntry {
    pub fn project(&self) -> Option<u64> {
        self.project_id.filter(|id| *id != 0)
    }

    pub fn is_running(&self) -> bool {
        self.duration_seconds < 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Me {
    #[serde(rename = "fullname", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_toggl_entry() {
        let json = r#"{
            "id": 42,
            "pid": 5,
            "description": "Standup",
            "duration": 900,
            "start": "2020-05-08T09:00:00+00:00",
            "stop": "2020-05-08T09:15:00+00:00",
            "tags": ["meeting"]
        }"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.project(), Some(5));
        assert_eq!(entry.duration_seconds, 900);
        assert_eq!(entry.tags, vec!["meeting".to_string()]);
        assert!(!entry.is_running());
    }

    #[test]
    fn zero_or_missing_pid_means_no_project() {
        let zero = r#"{"id":1,"pid":0,"description":"x","duration":1,"start":"2020-05-08T09:00:00Z"}"#;
        let missing = r#"{"id":2,"duration":1,"start":"2020-05-08T09:00:00Z"}"#;
        let zero: TimeEntry = serde_json::from_str(zero).unwrap();
        let missing: TimeEntry = serde_json::from_str(missing).unwrap();
        assert_eq!(zero.project(), None);
        assert_eq!(missing.project(), None);
        assert_eq!(missing.description, "");
    }

    #[test]
    fn running_entry_has_negative_duration() {
        let json = r#"{"id":3,"description":"PROJ-1","duration":-1588928400,"start":"2020-05-08T09:00:00Z"}"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_running());
        assert_eq!(entry.stop, None);
    }
}
