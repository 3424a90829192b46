use std::fmt;

use super::classifier::is_project_work;
use crate::model::{TimeEntry, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryProblem {
    EmptyDescription,
    UnresolvableEntry,
}

impl fmt::Display for EntryProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryProblem::EmptyDescription => write!(f, "description is empty"),
            EntryProblem::UnresolvableEntry => {
                write!(f, "description has no ticket and the entry has no project")
            }
        }
    }
}

pub fn check_entry(entry: &TimeEntry, ticket_prefix: &str) -> Option<EntryProblem> {
    if entry.description.trim().is_empty() {
        Some(EntryProblem::EmptyDescription)
    } else if !is_project_work(entry, ticket_prefix) && entry.project().is_none() {
        Some(EntryProblem::UnresolvableEntry)
    } else {
        None
    }
}

/// One message per failing entry, in input order.
pub fn validate(entries: &[TimeEntry], ticket_prefix: &str) -> ValidationReport {
    let messages: Vec<String> = entries
        .iter()
        .filter_map(|entry| {
            check_entry(entry, ticket_prefix).map(|problem| {
                format!(
                    "Entry {} [{}] started {}: {problem}",
                    entry.id,
                    entry.description,
                    entry.start.format("%H:%M")
                )
            })
        })
        .collect();

    ValidationReport {
        ok: messages.is_empty(),
        messages,
    }
}
