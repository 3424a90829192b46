use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::classifier::is_project_work;
use super::error::SyncError;
use super::progress::{Progress, ProgressSender, RunSummary};
use super::resolver::OverheadResolver;
use super::validator::validate;
use crate::mapping::MappingStore;
use crate::model::{SyncOutcome, TimeEntry};
use crate::prompt::InteractivePrompt;
use crate::providers::{TicketSink, TimeSource};

/// One reconciliation pass over a day of time entries.
pub struct SyncEngine<'a> {
    ticket_prefix: String,
    source: &'a dyn TimeSource,
    sink: &'a dyn TicketSink,
    resolver: OverheadResolver<'a>,
    progress: ProgressSender,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        ticket_prefix: impl Into<String>,
        source: &'a dyn TimeSource,
        sink: &'a dyn TicketSink,
        store: &'a mut dyn MappingStore,
        prompt: &'a mut dyn InteractivePrompt,
        progress: ProgressSender,
    ) -> Self {
        Self {
            ticket_prefix: ticket_prefix.into(),
            source,
            sink,
            resolver: OverheadResolver::new(source, store, prompt),
            progress,
        }
    }

    /// Sync every entry started on `date` (`YYYY-MM-DD`, UTC).
    ///
    /// Fetch and validation failures abort before anything is posted. Once
    /// submission starts, each entry succeeds or fails on its own and the run
    /// itself succeeds. With `dry_run` nothing is posted and learned mappings
    /// are not persisted.
    pub async fn sync(&mut self, date: &str, dry_run: bool) -> Result<RunSummary, SyncError> {
        let day = parse_date(date)?;
        let (start, end) = day_window(day);
        self.resolver.clear_cache();

        let me = self
            .source
            .get_me()
            .await
            .map_err(|e| SyncError::FetchFailed(format!("{e:#}")))?;
        self.emit(Progress::Identity {
            full_name: me.full_name,
            email: me.email,
        });

        let entries = self
            .source
            .get_time_entries(start, end)
            .await
            .map_err(|e| SyncError::FetchFailed(format!("{e:#}")))?;
        tracing::info!(%day, count = entries.len(), "fetched time entries");
        self.emit(Progress::Fetched {
            date: day,
            count: entries.len(),
        });
        for entry in &entries {
            self.emit(Progress::Entry {
                description: entry.description.clone(),
                duration_seconds: entry.duration_seconds,
            });
        }

        let report = validate(&entries, &self.ticket_prefix);
        if !report.ok {
            for message in &report.messages {
                self.emit(Progress::Invalid(message.clone()));
            }
            return Err(SyncError::ValidationFailed(report.messages));
        }

        if dry_run {
            self.emit(Progress::DryRun);
        }

        let mut summary = RunSummary::default();
        for entry in &entries {
            let outcome = self.process_entry(entry, dry_run).await;
            summary.record(&outcome);
            self.emit(Progress::Outcome {
                description: entry.description.clone(),
                outcome,
            });
        }

        if !dry_run {
            self.resolver
                .store_mut()
                .persist()
                .map_err(|e| SyncError::PersistFailed(format!("{e:#}")))?;
            self.emit(Progress::MappingsSaved);
        }

        tracing::info!(
            logged = summary.logged,
            planned = summary.planned,
            skipped = summary.skipped,
            "sync finished"
        );
        self.emit(Progress::Finished(summary));
        Ok(summary)
    }

    /// Per-entry errors stop here.
    async fn process_entry(&mut self, entry: &TimeEntry, dry_run: bool) -> SyncOutcome {
        match self.try_entry(entry, dry_run).await {
            Ok(outcome) => outcome,
            Err(err) => {
                debug_assert!(!err.is_fatal());
                tracing::warn!(entry = entry.id, error = %err, "entry skipped");
                SyncOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn try_entry(&mut self, entry: &TimeEntry, dry_run: bool) -> Result<SyncOutcome, SyncError> {
        if entry.is_running() {
            return Ok(SyncOutcome::Skipped {
                reason: "timer is still running".into(),
            });
        }

        let (ticket, description) = if is_project_work(entry, &self.ticket_prefix) {
            (entry.description.clone(), None)
        } else {
            let ticket = self.resolver.resolve(entry).await?;
            (ticket, Some(entry.description.as_str()))
        };

        if dry_run {
            return Ok(SyncOutcome::Planned {
                duration_seconds: entry.duration_seconds,
                ticket,
            });
        }

        self.sink
            .log_work(&ticket, entry.duration_seconds, description)
            .await
            .map_err(|e| SyncError::SubmissionFailed(format!("{e:#}")))?;

        Ok(SyncOutcome::Logged {
            duration_seconds: entry.duration_seconds,
            ticket,
        })
    }

    fn emit(&self, progress: Progress) {
        // A closed receiver only means nobody is watching.
        let _ = self.progress.send(progress);
    }
}

pub fn parse_date(date: &str) -> Result<NaiveDate, SyncError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| SyncError::InvalidDate(date.to_string()))
}

/// `[00:00:00 on day, 00:00:00 the day after)` in UTC.
pub fn day_window(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + chrono::Duration::days(1))
}
