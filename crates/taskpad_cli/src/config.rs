//! Command-line surface and resolved shell configuration.
//!
//! # Invariants
//! - Every path in `ShellConfig` is absolute.
//! - The log directory defaults to `<db dir>/logs`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use taskpad_core::{default_log_level, TaskFilter, DEFAULT_SLOT_KEY};

const DEFAULT_DB_FILE: &str = "taskpad.sqlite3";
const DEFAULT_PAGE_FILE: &str = "taskpad.html";

#[derive(Parser, Debug)]
#[command(name = "taskpad")]
#[command(about = "Minimal task list with a durable local slot")]
#[command(version)]
pub struct Cli {
    /// SQLite file holding the task slot.
    #[arg(long, env = "TASKPAD_DB", default_value = DEFAULT_DB_FILE)]
    pub db: PathBuf,
    /// Slot key inside the database.
    #[arg(long, env = "TASKPAD_SLOT", default_value = DEFAULT_SLOT_KEY)]
    pub slot: String,
    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "TASKPAD_LOG_LEVEL")]
    pub log_level: Option<String>,
    /// Directory for rolling log files.
    #[arg(long, env = "TASKPAD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
    /// Rewrite this HTML page after every command.
    #[arg(long)]
    pub page: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task; words are joined with spaces.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip completion of a task by id or unique id prefix.
    Toggle { id: String },
    /// Delete a task after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// Print tasks under a filter.
    List {
        #[arg(long, value_parser = parse_filter, default_value = "all")]
        filter: TaskFilter,
    },
    /// Print summary counters.
    Stats,
    /// Write the HTML page and print its path.
    Render {
        #[arg(long, value_parser = parse_filter, default_value = "all")]
        filter: TaskFilter,
    },
    /// Interactive session reading commands from stdin.
    Shell,
}

pub fn parse_filter(value: &str) -> Result<TaskFilter, String> {
    value.parse::<TaskFilter>().map_err(|err| err.to_string())
}

/// Fully resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub db_path: PathBuf,
    pub slot_key: String,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub page_path: Option<PathBuf>,
}

impl ShellConfig {
    /// Resolves CLI values against `cwd`.
    pub fn resolve(cli: &Cli, cwd: &Path) -> anyhow::Result<Self> {
        let slot_key = cli.slot.trim().to_string();
        if slot_key.is_empty() {
            anyhow::bail!("slot key cannot be empty");
        }

        let db_path = absolutize(&cli.db, cwd);
        let db_dir = db_path
            .parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("db path `{}` has no parent", db_path.display()))?;
        let log_dir = cli
            .log_dir
            .as_deref()
            .map(|dir| absolutize(dir, cwd))
            .unwrap_or_else(|| db_dir.join("logs"));

        Ok(Self {
            db_path,
            slot_key,
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
            page_path: cli.page.as_deref().map(|page| absolutize(page, cwd)),
        })
    }

    /// Page target for `render`: `--page`, else next to the database.
    pub fn render_target(&self) -> PathBuf {
        self.page_path.clone().unwrap_or_else(|| {
            self.db_path
                .parent()
                .map(|dir| dir.join(DEFAULT_PAGE_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PAGE_FILE))
        })
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, ShellConfig};
    use clap::Parser;
    use std::path::Path;
    use taskpad_core::TaskFilter;

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let cli = Cli::try_parse_from(["taskpad", "--db", "data/tasks.db", "stats"]).unwrap();
        let config = ShellConfig::resolve(&cli, Path::new("/home/me")).unwrap();

        assert_eq!(config.db_path, Path::new("/home/me/data/tasks.db"));
        assert_eq!(config.log_dir, Path::new("/home/me/data/logs"));
        assert_eq!(config.render_target(), Path::new("/home/me/data/taskpad.html"));
        assert_eq!(config.slot_key, "simpleTasks");
    }

    #[test]
    fn unknown_filter_is_rejected_at_parse_time() {
        let err = Cli::try_parse_from(["taskpad", "list", "--filter", "done"]).unwrap_err();
        assert!(err.to_string().contains("unsupported filter"));
    }

    #[test]
    fn add_joins_words() {
        let cli = Cli::try_parse_from(["taskpad", "add", "buy", "milk"]).unwrap();
        match cli.command {
            Command::Add { text } => assert_eq!(text.join(" "), "buy milk"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_filter_parses() {
        let cli = Cli::try_parse_from(["taskpad", "list", "--filter", "pending"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List {
                filter: TaskFilter::Pending
            }
        ));
    }

    #[test]
    fn blank_slot_is_rejected() {
        let cli = Cli::try_parse_from(["taskpad", "--slot", " ", "stats"]).unwrap();
        assert!(ShellConfig::resolve(&cli, Path::new("/tmp")).is_err());
    }
}
