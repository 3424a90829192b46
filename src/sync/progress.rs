use std::fmt;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::model::SyncOutcome;

/// Operator-facing progress, emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Identity { full_name: String, email: String },
    Fetched { date: NaiveDate, count: usize },
    Entry { description: String, duration_seconds: i64 },
    Invalid(String),
    DryRun,
    Outcome { description: String, outcome: SyncOutcome },
    MappingsSaved,
    Finished(RunSummary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub logged: usize,
    pub planned: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Logged { .. } => self.logged += 1,
            SyncOutcome::Planned { .. } => self.planned += 1,
            SyncOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Identity { full_name, email } => {
                write!(f, "User details: Name = {full_name}, Email = {email}")
            }
            Progress::Fetched { date, count } => {
                write!(f, "== Time Entries Summary for {date} ({count}) ==")
            }
            Progress::Entry {
                description,
                duration_seconds,
            } => write!(f, "Entry: {description} || Duration (s): {duration_seconds}"),
            Progress::Invalid(message) => write!(f, "Invalid: {message}"),
            Progress::DryRun => write!(f, "Dry run: nothing will be logged on Jira"),
            Progress::Outcome {
                description,
                outcome,
            } => write!(f, "[{description}] {outcome}"),
            Progress::MappingsSaved => write!(f, "Overhead mappings saved"),
            Progress::Finished(summary) => write!(
                f,
                "Done: {} logged, {} planned, {} skipped",
                summary.logged, summary.planned, summary.skipped
            ),
        }
    }
}

pub type ProgressSender = mpsc::UnboundedSender<Progress>;

/// Prints progress lines as they arrive until every sender is dropped.
pub async fn print_progress(mut rx: mpsc::UnboundedReceiver<Progress>) {
    while let Some(progress) = rx.recv().await {
        println!("{progress}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome_kind() {
        let mut summary = RunSummary::default();
        summary.record(&SyncOutcome::Logged {
            duration_seconds: 60,
            ticket: "PROJ-1".into(),
        });
        summary.record(&SyncOutcome::Skipped {
            reason: "nope".into(),
        });
        summary.record(&SyncOutcome::Skipped {
            reason: "nope".into(),
        });
        assert_eq!(
            summary,
            RunSummary {
                logged: 1,
                planned: 0,
                skipped: 2
            }
        );
    }

    #[test]
    fn outcome_line_names_entry_and_ticket() {
        let line = Progress::Outcome {
            description: "Standup".into(),
            outcome: SyncOutcome::Logged {
                duration_seconds: 900,
                ticket: "OPS-1".into(),
            },
        }
        .to_string();
        assert_eq!(line, "[Standup] logged 900s on [OPS-1]");
    }
}
