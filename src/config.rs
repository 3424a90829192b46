use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TOGGL_USERNAME_ENV: &str = "TOGGL_USERNAME";
pub const TOGGL_PASSWORD_ENV: &str = "TOGGL_PASSWORD";

const DEFAULT_TOGGL_URL: &str = "https://api.track.toggl.com/api/v8";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub toggl: TogglConfig,
    #[serde(default)]
    pub jira: JiraConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TogglConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraConfig {
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Ticket prefix: descriptions starting with it are logged directly.
    #[serde(default)]
    pub project_key: String,
    /// Overhead project name -> ticket key.
    #[serde(default)]
    pub overhead: BTreeMap<String, String>,
}

impl TogglConfig {
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_TOGGL_URL)
    }

    /// Credentials from the file, falling back to `TOGGL_USERNAME` / `TOGGL_PASSWORD`.
    /// The fallback is never written back on save.
    pub fn credentials(&self) -> (String, String) {
        (
            non_empty_or_env(&self.username, TOGGL_USERNAME_ENV),
            non_empty_or_env(&self.password, TOGGL_PASSWORD_ENV),
        )
    }
}

fn non_empty_or_env(value: &str, var: &str) -> String {
    if value.trim().is_empty() {
        std::env::var(var).unwrap_or_default()
    } else {
        value.to_string()
    }
}

impl AppConfig {
    /// Names of required settings that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let (toggl_user, toggl_pass) = self.toggl.credentials();
        let checks = [
            ("toggl.username", toggl_user.as_str()),
            ("toggl.password", toggl_pass.as_str()),
            ("jira.server_url", self.jira.server_url.as_str()),
            ("jira.username", self.jira.username.as_str()),
            ("jira.password", self.jira.password.as_str()),
            ("jira.project_key", self.jira.project_key.as_str()),
        ];
        checks
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".toggl-sync")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        bail!(
            "No configuration file exists at {}. Please, run 'toggl-sync configure' to create one",
            path.display()
        );
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Writes the whole document, creating the file and its directory if absent.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    restrict_permissions(path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[toggl]
username = "me@example.com"
password = "secret"

[jira]
server_url = "https://jira.example.com"
username = "me"
password = "hunter2"
project_key = "PROJ"

[jira.overhead]
"Team Sync" = "OPS-1"
"#;

    #[test]
    fn parses_nested_overhead_table() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.jira.project_key, "PROJ");
        assert_eq!(
            config.jira.overhead.get("Team Sync"),
            Some(&"OPS-1".to_string())
        );
        assert_eq!(config.toggl.server_url(), DEFAULT_TOGGL_URL);
        assert!(config.missing_fields().is_empty());
    }

    #[test]
    fn missing_fields_lists_blank_jira_settings() {
        let config: AppConfig = toml::from_str(
            r#"
[toggl]
username = "u"
password = "p"

[jira]
server_url = "https://jira.example.com"
"#,
        )
        .unwrap();
        assert_eq!(
            config.missing_fields(),
            vec!["jira.username", "jira.password", "jira.project_key"]
        );
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("No configuration file"));
        assert!(err.to_string().contains("toggl-sync configure"));
    }

    #[test]
    fn save_then_load_preserves_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();

        save_config(&path, &config).unwrap();
        let reloaded = load_config(&path).unwrap();

        assert_eq!(reloaded, config);
    }
}
