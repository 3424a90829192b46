use std::fmt;

/// Identifier of the Jira issue a work log is posted against.
pub type TicketKey = String;

/// Result of validating a whole day of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub messages: Vec<String>,
}

/// What happened to one entry during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Logged {
        duration_seconds: i64,
        ticket: TicketKey,
    },
    /// Dry-run only: the work log that would have been posted.
    Planned {
        duration_seconds: i64,
        ticket: TicketKey,
    },
    Skipped {
        reason: String,
    },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Logged {
                duration_seconds,
                ticket,
            } => write!(f, "logged {duration_seconds}s on [{ticket}]"),
            SyncOutcome::Planned {
                duration_seconds,
                ticket,
            } => write!(f, "would log {duration_seconds}s on [{ticket}]"),
            SyncOutcome::Skipped { reason } => write!(f, "no time logged: {reason}"),
        }
    }
}
