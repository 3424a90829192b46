pub mod outcome;
pub mod time_entry;

pub use outcome::{SyncOutcome, TicketKey, ValidationReport};
pub use time_entry::{Me, Project, TimeEntry};
