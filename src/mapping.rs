use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{self, AppConfig};

/// Durable overhead mapping: project name -> ticket key.
pub trait MappingStore: Send {
    fn get(&self, project: &str) -> Option<String>;
    /// In-memory only until [`MappingStore::persist`].
    fn set(&mut self, project: &str, ticket: &str);
    fn entries(&self) -> Vec<(String, String)>;
    fn persist(&mut self) -> Result<()>;
}

/// Keeps mappings in the `[jira.overhead]` table of the config document and
/// writes the whole document back on persist.
pub struct ConfigMappingStore {
    path: PathBuf,
    config: AppConfig,
}

impl ConfigMappingStore {
    pub fn new(path: PathBuf, config: AppConfig) -> Self {
        Self { path, config }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config = config::load_config(path)?;
        Ok(Self::new(path.to_path_buf(), config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingStore for ConfigMappingStore {
    fn get(&self, project: &str) -> Option<String> {
        self.config.jira.overhead.get(project).cloned()
    }

    fn set(&mut self, project: &str, ticket: &str) {
        self.config
            .jira
            .overhead
            .insert(project.to_string(), ticket.to_string());
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.config
            .jira
            .overhead
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn persist(&mut self) -> Result<()> {
        config::save_config(&self.path, &self.config)
    }
}
