use std::collections::HashMap;

use super::error::SyncError;
use crate::mapping::MappingStore;
use crate::model::{Project, TicketKey, TimeEntry};
use crate::prompt::InteractivePrompt;
use crate::providers::TimeSource;

/// Finds the ticket overhead work is logged against, asking the operator the
/// first time a project is seen without a mapping.
pub struct OverheadResolver<'a> {
    source: &'a dyn TimeSource,
    store: &'a mut dyn MappingStore,
    prompt: &'a mut dyn InteractivePrompt,
    /// Project id -> ticket, for the current run only.
    cache: HashMap<u64, TicketKey>,
}

impl<'a> OverheadResolver<'a> {
    pub fn new(
        source: &'a dyn TimeSource,
        store: &'a mut dyn MappingStore,
        prompt: &'a mut dyn InteractivePrompt,
    ) -> Self {
        Self {
            source,
            store,
            prompt,
            cache: HashMap::new(),
        }
    }

    pub async fn resolve(&mut self, entry: &TimeEntry) -> Result<TicketKey, SyncError> {
        let project_id = entry
            .project()
            .ok_or_else(|| SyncError::ProjectLookupFailed {
                project_id: 0,
                reason: "entry has no project".into(),
            })?;

        if let Some(ticket) = self.cache.get(&project_id) {
            return Ok(ticket.clone());
        }

        let project = self
            .source
            .get_project(project_id)
            .await
            .map_err(|e| SyncError::ProjectLookupFailed {
                project_id,
                reason: format!("{e:#}"),
            })?;

        let ticket = match self.store.get(&project.name).filter(|t| !t.is_empty()) {
            Some(ticket) => ticket,
            None => self.request_mapping(entry, &project)?,
        };

        self.cache.insert(project_id, ticket.clone());
        Ok(ticket)
    }

    fn request_mapping(
        &mut self,
        entry: &TimeEntry,
        project: &Project,
    ) -> Result<TicketKey, SyncError> {
        let question = format!(
            "Time entry [{}] belongs to project [{}], which has no ticket yet. \
             Which ticket should receive this type of work?",
            entry.description, project.name
        );
        let answer = self
            .prompt
            .request_line(&question)
            .map_err(|e| SyncError::PromptFailed {
                project: project.name.clone(),
                reason: format!("{e:#}"),
            })?;

        let ticket = answer.trim().to_string();
        if ticket.is_empty() {
            // Accepted as-is; the next run asks again since empty mappings are ignored on lookup.
            tracing::warn!(project = %project.name, "empty ticket accepted as overhead mapping");
        }
        self.store.set(&project.name, &ticket);
        tracing::info!(project = %project.name, %ticket, "learned overhead mapping");
        Ok(ticket)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn store_mut(&mut self) -> &mut dyn MappingStore {
        &mut *self.store
    }
}
