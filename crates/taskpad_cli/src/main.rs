//! Terminal entry point for taskpad.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the slot database.
//! - Construct store, persistence and renderer and hand them to `TaskApp`.
//! - Run one command (or an interactive session) through the app.

mod config;
mod shell;

use anyhow::Context;
use clap::Parser;
use config::{Cli, Command, ShellConfig};
use log::{info, warn};
use shell::{print_stats, print_tasks, report_outcome, resolve_id, run_shell, TerminalUi};
use std::io::{self, Write};
use std::path::Path;
use taskpad_core::db::open_db;
use taskpad_core::{
    init_logging, PageSurface, SlotRepository, SqliteSlotRepository, TaskApp, TaskPersistence,
    UiEvent, ViewRenderer,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = ShellConfig::resolve(&cli, &cwd)?;

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    // Logs are diagnostics only; a broken log dir must not block the task list.
    if let Err(reason) = start_logging(&config) {
        eprintln!("warning: logging disabled: {reason}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let persistence =
        TaskPersistence::with_key(SqliteSlotRepository::new(&conn), config.slot_key.clone());
    let mut app = TaskApp::start(persistence, ViewRenderer::new(PageSurface::new()));

    let stdin = io::stdin();
    let mut ui = TerminalUi::new(stdin.lock(), io::stdout());
    run_command(cli.command, &config, &mut app, &mut ui)
}

fn start_logging(config: &ShellConfig) -> Result<(), String> {
    let Some(log_dir) = config.log_dir.to_str() else {
        return Err(format!(
            "log dir `{}` is not valid UTF-8",
            config.log_dir.display()
        ));
    };
    init_logging(&config.log_level, log_dir)
}

fn run_command<R, I, O>(
    command: Command,
    config: &ShellConfig,
    app: &mut TaskApp<R, PageSurface>,
    ui: &mut TerminalUi<I, O>,
) -> anyhow::Result<()>
where
    R: SlotRepository,
    I: io::BufRead,
    O: Write,
{
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&command)
    );

    let event = match command {
        Command::Add { text } => UiEvent::Add(text.join(" ")),
        Command::Toggle { id } => UiEvent::Toggle(resolve_id(app, &id)),
        Command::Delete { id, yes } => {
            let id = resolve_id(app, &id);
            ui.set_assume_yes(yes);
            let outcome = app.dispatch(UiEvent::Delete(id), ui);
            report_outcome(ui.output(), &outcome)?;
            return write_page(config.page_path.as_deref(), app);
        }
        Command::List { filter } => {
            app.set_filter(filter);
            print_tasks(ui.output(), &app.filtered_view())?;
            return Ok(());
        }
        Command::Stats => {
            print_stats(ui.output(), &app.surface().stats)?;
            return Ok(());
        }
        Command::Render { filter } => {
            app.set_filter(filter);
            let target = config.render_target();
            write_page(Some(target.as_path()), app)?;
            writeln!(ui.output(), "{}", target.display())?;
            return Ok(());
        }
        Command::Shell => {
            let page_path = config.page_path.clone();
            run_shell(app, ui, |app| {
                if let Err(err) = write_page(page_path.as_deref(), app) {
                    warn!("event=page_write module=cli status=error error={err}");
                }
            })?;
            return Ok(());
        }
    };

    let outcome = app.dispatch(event, ui);
    report_outcome(ui.output(), &outcome)?;
    write_page(config.page_path.as_deref(), app)
}

fn write_page<R: SlotRepository>(
    path: Option<&Path>,
    app: &TaskApp<R, PageSurface>,
) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    std::fs::write(path, app.surface().to_page())
        .with_context(|| format!("failed to write page `{}`", path.display()))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::Toggle { .. } => "toggle",
        Command::Delete { .. } => "delete",
        Command::List { .. } => "list",
        Command::Stats => "stats",
        Command::Render { .. } => "render",
        Command::Shell => "shell",
    }
}

#[cfg(test)]
mod tests {
    use super::start_logging;
    use crate::config::ShellConfig;
    use std::path::PathBuf;

    #[cfg(unix)]
    #[test]
    fn non_utf8_log_dir_reports_why_logging_is_off() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let config = ShellConfig {
            db_path: PathBuf::from("/tmp/taskpad.sqlite3"),
            slot_key: "simpleTasks".to_string(),
            log_level: "info".to_string(),
            log_dir: PathBuf::from(OsStr::from_bytes(b"/tmp/logs-\xff")),
            page_path: None,
        };

        let reason = start_logging(&config).unwrap_err();
        assert!(reason.contains("not valid UTF-8"));
    }
}
