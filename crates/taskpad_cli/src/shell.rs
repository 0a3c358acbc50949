//! Terminal UI shell over `TaskApp`.
//!
//! # Responsibility
//! - Provide blocking alert/confirm prompts on a terminal.
//! - Parse interactive commands into `UiEvent` messages.
//! - Print the filtered list and stats after each cycle.

use std::io::{self, BufRead, Write};
use taskpad_core::{
    EventOutcome, Interaction, SlotRepository, Task, TaskApp, TaskFilter, TaskId, TaskStats,
    UiEvent, ViewSurface,
};

const SHORT_ID_CHARS: usize = 8;
const SHELL_HELP: &str = "commands: add <text> | toggle <id> | delete <id> | filter <all|completed|pending> | list | stats | help | quit";

/// Terminal prompts backed by any line reader and writer.
pub struct TerminalUi<I: BufRead, O: Write> {
    input: I,
    output: O,
    assume_yes: bool,
}

impl<I: BufRead, O: Write> TerminalUi<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self {
            input,
            output,
            assume_yes: false,
        }
    }

    /// Answers every confirmation with yes without prompting.
    pub fn set_assume_yes(&mut self, assume_yes: bool) {
        self.assume_yes = assume_yes;
    }

    /// Reads one line without its terminator; `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn output(&mut self) -> &mut O {
        &mut self.output
    }
}

impl<I: BufRead, O: Write> Interaction for TerminalUi<I, O> {
    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.output, "! {message}");
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let _ = write!(self.output, "{message} [y/N] ");
        let _ = self.output.flush();
        match self.read_line() {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

/// One parsed interactive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Toggle(String),
    Delete(String),
    Filter(TaskFilter),
    List,
    Stats,
    Help,
    Quit,
}

/// Parses one interactive line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        // Blank text still reaches the app so the user gets the notice.
        "add" | "a" => ShellCommand::Add(rest.to_string()),
        "toggle" | "t" => ShellCommand::Toggle(require_arg(verb, rest)?),
        "delete" | "rm" => ShellCommand::Delete(require_arg(verb, rest)?),
        "filter" | "f" => ShellCommand::Filter(rest.parse().map_err(|err| format!("{err}"))?),
        "list" | "ls" => ShellCommand::List,
        "stats" => ShellCommand::Stats,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(Some(command))
}

fn require_arg(verb: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        return Err(format!("`{verb}` needs a task id"));
    }
    Ok(rest.to_string())
}

/// Resolves a typed id or unique prefix; unknown input passes through so
/// the app treats it as a lookup miss.
pub fn resolve_id<R: SlotRepository, V: ViewSurface>(app: &TaskApp<R, V>, typed: &str) -> TaskId {
    app.store()
        .resolve_id(typed)
        .unwrap_or_else(|| TaskId::from(typed.trim()))
}

/// Runs the interactive loop until `quit` or end of input.
pub fn run_shell<R, V, I, O>(
    app: &mut TaskApp<R, V>,
    ui: &mut TerminalUi<I, O>,
    mut after_cycle: impl FnMut(&TaskApp<R, V>),
) -> io::Result<()>
where
    R: SlotRepository,
    V: ViewSurface,
    I: BufRead,
    O: Write,
{
    writeln!(ui.output(), "{SHELL_HELP}")?;
    loop {
        write!(ui.output(), "> ")?;
        ui.output().flush()?;
        let Some(line) = ui.read_line()? else {
            return Ok(());
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(ui.output(), "{message}")?;
                continue;
            }
        };

        let event = match command {
            ShellCommand::Quit => return Ok(()),
            ShellCommand::Help => {
                writeln!(ui.output(), "{SHELL_HELP}")?;
                continue;
            }
            ShellCommand::List => {
                print_tasks(ui.output(), &app.filtered_view())?;
                continue;
            }
            ShellCommand::Stats => {
                print_stats(ui.output(), &taskpad_core::compute_stats(app.store().tasks()))?;
                continue;
            }
            ShellCommand::Add(text) => UiEvent::Add(text),
            ShellCommand::Toggle(id) => UiEvent::Toggle(resolve_id(app, &id)),
            ShellCommand::Delete(id) => UiEvent::Delete(resolve_id(app, &id)),
            ShellCommand::Filter(filter) => UiEvent::SetFilter(filter),
        };

        let outcome = app.dispatch(event, ui);
        report_outcome(ui.output(), &outcome)?;
        if changes_view(&outcome) {
            print_tasks(ui.output(), &app.filtered_view())?;
            after_cycle(app);
        }
    }
}

fn changes_view(outcome: &EventOutcome) -> bool {
    matches!(
        outcome,
        EventOutcome::Added(_)
            | EventOutcome::Toggled(_)
            | EventOutcome::Deleted(_)
            | EventOutcome::FilterChanged(_)
    )
}

/// Prints a one-line summary of a dispatched event.
pub fn report_outcome(out: &mut impl Write, outcome: &EventOutcome) -> io::Result<()> {
    match outcome {
        EventOutcome::Added(id) => writeln!(out, "added {}", short_id(id)),
        EventOutcome::Toggled(id) => writeln!(out, "toggled {}", short_id(id)),
        EventOutcome::Deleted(id) => writeln!(out, "deleted {}", short_id(id)),
        EventOutcome::FilterChanged(filter) => writeln!(out, "filter: {filter}"),
        // The alert already told the user; misses and declines stay quiet.
        EventOutcome::Rejected(_) | EventOutcome::Declined | EventOutcome::Ignored => Ok(()),
    }
}

pub fn print_tasks(out: &mut impl Write, tasks: &[&Task]) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "(no tasks)");
    }
    for task in tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        writeln!(
            out,
            "[{mark}] {:<width$}  {}  ({})",
            short_id(&task.id),
            task.text,
            task.created_at.format("%Y-%m-%d %H:%M"),
            width = SHORT_ID_CHARS,
        )?;
    }
    Ok(())
}

pub fn print_stats(out: &mut impl Write, stats: &TaskStats) -> io::Result<()> {
    writeln!(
        out,
        "total={} completed={} pending={} progress={}",
        stats.total,
        stats.completed,
        stats.pending,
        stats.progress_width()
    )
}

fn short_id(id: &TaskId) -> String {
    id.as_str().chars().take(SHORT_ID_CHARS).collect()
}
