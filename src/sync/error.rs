use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("invalid date [{0}]; expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("error retrieving data from Toggl: {0}")]
    FetchFailed(String),

    #[error("{} time entries cannot be logged; fix them in Toggl and run again", .0.len())]
    ValidationFailed(Vec<String>),

    #[error("could not look up project [{project_id}]: {reason}")]
    ProjectLookupFailed { project_id: u64, reason: String },

    #[error("no ticket provided for project [{project}]: {reason}")]
    PromptFailed { project: String, reason: String },

    #[error("{0}")]
    SubmissionFailed(String),

    #[error("could not save overhead mappings: {0}")]
    PersistFailed(String),
}

impl SyncError {
    /// Fatal errors abort the run; the rest are scoped to one entry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidDate(_)
                | SyncError::FetchFailed(_)
                | SyncError::ValidationFailed(_)
                | SyncError::PersistFailed(_)
        )
    }
}
