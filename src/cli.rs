use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::config;
use crate::mapping::{ConfigMappingStore, MappingStore};
use crate::prompt::{InteractivePrompt, StdinPrompt};
use crate::providers;
use crate::sync::{print_progress, SyncEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sync { date: Option<String>, dry_run: bool },
    Configure,
    Mappings,
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Parse CLI args.
///
/// Supported forms:
///   toggl-sync [sync] [--date 2020-05-08] [--dry-run]
///   toggl-sync configure
///   toggl-sync mappings
///   toggl-sync version
///   toggl-sync help
/// `--config <path>` and `-v/--verbose` are accepted anywhere.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut subcommand: Option<&str> = None;
    let mut date = None;
    let mut dry_run = false;
    let mut config = None;
    let mut verbose = false;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--date" => {
                i += 1;
                match args.get(i) {
                    Some(value) => date = Some(value.clone()),
                    None => bail!("Missing value for --date flag"),
                }
            }
            "-c" | "--config" => {
                i += 1;
                match args.get(i) {
                    Some(value) => config = Some(PathBuf::from(value)),
                    None => bail!("Missing value for --config flag"),
                }
            }
            "-n" | "--dry-run" => dry_run = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => subcommand = Some("help"),
            arg @ ("sync" | "configure" | "mappings" | "version" | "help") if subcommand.is_none() => {
                subcommand = Some(arg)
            }
            other => bail!("Unexpected argument [{other}]. Run 'toggl-sync help' for usage"),
        }
        i += 1;
    }

    let command = match subcommand.unwrap_or("sync") {
        "sync" => Command::Sync { date, dry_run },
        "configure" => Command::Configure,
        "mappings" => Command::Mappings,
        "version" => Command::Version,
        _ => Command::Help,
    };

    Ok(Cli {
        command,
        config,
        verbose,
    })
}

pub async fn run(cli: Cli) -> Result<()> {
    let path = cli.config.unwrap_or_else(config::config_path);
    match cli.command {
        Command::Sync { date, dry_run } => handle_sync(path, date, dry_run).await,
        Command::Configure => handle_configure(&path, &mut StdinPrompt),
        Command::Mappings => handle_mappings(path),
        Command::Version => {
            println!("toggl-sync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

async fn handle_sync(path: PathBuf, date: Option<String>, dry_run: bool) -> Result<()> {
    let mut store = ConfigMappingStore::load(&path)?;
    println!("Configuration read from: {}", path.display());

    let missing = store.config().missing_fields();
    if !missing.is_empty() {
        bail!(
            "Configuration file is invalid; missing {}. Please, run 'toggl-sync configure' to fix it",
            missing.join(", ")
        );
    }

    let source = providers::create_time_source(store.config());
    let sink = providers::create_ticket_sink(store.config());
    let ticket_prefix = store.config().jira.project_key.clone();
    let mut prompt = StdinPrompt;

    let date = match date {
        Some(date) => date,
        None => prompt.request_line("Introduce a date to fetch time entries (e.g. 2020-05-08)")?,
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let mut engine = SyncEngine::new(ticket_prefix, &source, &sink, &mut store, &mut prompt, tx);

    // Same task: progress is printed whenever the engine waits on the network,
    // so lines stay in order with the operator prompts.
    let run = async move {
        let result = engine.sync(&date, dry_run).await;
        drop(engine);
        result
    };
    let (result, ()) = tokio::join!(run, print_progress(rx));

    let summary = result?;
    if summary.skipped > 0 {
        tracing::warn!(skipped = summary.skipped, "some entries were not logged");
    }
    Ok(())
}

/// Ask for every required setting and write the config file. An empty answer
/// keeps the current value; overhead mappings already in the file are kept.
fn handle_configure(path: &Path, prompt: &mut dyn InteractivePrompt) -> Result<()> {
    let mut config = if path.exists() {
        config::load_config(path)?
    } else {
        config::AppConfig::default()
    };

    ask(prompt, "Toggl username", &mut config.toggl.username, false)?;
    ask(prompt, "Toggl password", &mut config.toggl.password, true)?;
    ask(prompt, "Jira server URL", &mut config.jira.server_url, false)?;
    ask(prompt, "Jira username", &mut config.jira.username, false)?;
    ask(prompt, "Jira password", &mut config.jira.password, true)?;
    ask(
        prompt,
        "Jira project key (ticket prefix)",
        &mut config.jira.project_key,
        false,
    )?;

    let missing = config.missing_fields();
    if !missing.is_empty() {
        bail!("Configuration not saved; missing {}", missing.join(", "));
    }

    config::save_config(path, &config)?;
    println!("Configuration saved to: {}", path.display());
    Ok(())
}

fn ask(
    prompt: &mut dyn InteractivePrompt,
    label: &str,
    value: &mut String,
    secret: bool,
) -> Result<()> {
    let question = match (value.is_empty(), secret) {
        (true, _) => label.to_string(),
        (false, true) => format!("{label} [unchanged]"),
        (false, false) => format!("{label} [{value}]"),
    };
    let answer = prompt.request_line(&question)?;
    let answer = answer.trim();
    if !answer.is_empty() {
        *value = answer.to_string();
    }
    Ok(())
}

fn handle_mappings(path: PathBuf) -> Result<()> {
    let store = ConfigMappingStore::load(&path)?;
    let entries = store.entries();
    if entries.is_empty() {
        println!("No overhead mappings in {}", store.path().display());
        return Ok(());
    }
    for (project, ticket) in entries {
        println!("{project} -> {ticket}");
    }
    Ok(())
}

pub fn print_help() {
    println!("toggl-sync — log a day of Toggl time entries as Jira work logs\n");
    println!("USAGE:");
    println!("  toggl-sync [sync]   Sync one day of time entries");
    println!("  toggl-sync configure Create or update the config file");
    println!("  toggl-sync mappings List overhead project -> ticket mappings");
    println!("  toggl-sync version  Print the version");
    println!();
    println!("OPTIONS:");
    println!("  -d, --date <YYYY-MM-DD>  Day to sync (asked for when omitted)");
    println!("  -n, --dry-run            Show what would be logged without logging it");
    println!("  -c, --config <path>      Config file (default ~/.toggl-sync/config.toml)");
    println!("  -v, --verbose            Debug logging (or set TOGGL_SYNC_LOG)");
    println!();
    println!("EXAMPLES:");
    println!("  toggl-sync --date 2020-05-08");
    println!("  toggl-sync --date 2020-05-08 --dry-run");
}
