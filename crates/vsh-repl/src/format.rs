//! Output formatting for the REPL.
//!
//! Command results arrive as plain newline-terminated text. Listings also
//! carry structured entries, which are coloured when stdout is a terminal.

use std::io::IsTerminal;

use vsh_types::{DirEntry, ExecResult};

/// Where output is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputContext {
    /// A terminal: colours allowed.
    Interactive,
    /// A pipe or file: plain text only.
    Piped,
}

/// Detect the output context based on terminal state.
pub fn detect_context() -> OutputContext {
    if std::io::stdout().is_terminal() {
        OutputContext::Interactive
    } else {
        OutputContext::Piped
    }
}

/// Format a result for display.
pub fn format_result(result: &ExecResult, context: OutputContext) -> String {
    match (&result.listing, context) {
        (Some(entries), OutputContext::Interactive) if result.ok() && colors_enabled() => {
            format_listing(entries)
        }
        _ => result.display(),
    }
}

fn format_listing(entries: &[DirEntry]) -> String {
    let names: Vec<String> = entries.iter().map(colorize_entry).collect();
    format!("{}\n", names.join("  "))
}

/// Colour directories blue and bold; files stay plain.
fn colorize_entry(entry: &DirEntry) -> String {
    use owo_colors::OwoColorize;

    let name = entry.display_name();
    if entry.is_dir() {
        name.blue().bold().to_string()
    } else {
        name
    }
}

/// `NO_COLOR` (any value) and `TERM=dumb` turn colour off.
fn colors_enabled() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    !std::env::var("TERM").is_ok_and(|t| t == "dumb")
}
