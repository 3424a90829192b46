use crate::model::TimeEntry;

/// Project work carries its ticket key as the description, e.g. `PROJ-12`.
/// Exact, case-sensitive prefix match.
pub fn is_project_work(entry: &TimeEntry, ticket_prefix: &str) -> bool {
    entry.description.starts_with(ticket_prefix)
}
