//! vsh REPL: interactive front end for the vsh kernel.
//!
//! Handles:
//! - the startup banner (debug parameters, diagnostics, motd)
//! - startup script replay
//! - line editing and history via rustyline
//! - result formatting
//!
//! Everything a user types goes straight to the kernel; there are no
//! front-end meta-commands.

pub mod format;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::runtime::Runtime;

use vsh_kernel::{
    CommandSource, ExecResult, Kernel, KernelConfig, SCRIPT_ERROR_PREFIX, Script, ScriptEvent,
};

use format::OutputContext;

/// Shown in the banner for options that were not given.
const NOT_SET: &str = "(none)";

/// REPL state: a kernel plus the runtime that drives it.
pub struct Repl {
    kernel: Kernel,
    runtime: Runtime,
    script: Option<PathBuf>,
    context: OutputContext,
}

impl Repl {
    /// Create a REPL over an empty VFS.
    pub fn new() -> Result<Self> {
        Self::with_config(KernelConfig::new())
    }

    /// Create a REPL with a custom kernel configuration.
    pub fn with_config(config: KernelConfig) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let kernel = Kernel::new(config);

        Ok(Self {
            kernel,
            runtime,
            script: None,
            context: OutputContext::Piped,
        })
    }

    /// Replay `path` before the first prompt.
    pub fn with_script(mut self, path: Option<PathBuf>) -> Self {
        self.script = path;
        self
    }

    /// Choose how results are rendered.
    pub fn with_context(mut self, context: OutputContext) -> Self {
        self.context = context;
        self
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn prompt(&self) -> String {
        self.runtime.block_on(self.kernel.prompt())
    }

    /// Debug parameters, startup diagnostics and the motd.
    pub fn banner(&self) -> String {
        let config = self.kernel.config();
        let mut out = String::from("# Debug parameters\n");
        out.push_str(&format!("VFS path   : {}\n", display_opt(config.vfs_path.as_deref())));
        out.push_str(&format!("Log (XML)  : {}\n", display_opt(config.audit_log.as_deref())));
        out.push_str(&format!("Startup script: {}\n", display_opt(self.script.as_deref())));
        out.push_str(&"-".repeat(40));
        out.push('\n');

        for diagnostic in self.kernel.diagnostics() {
            out.push_str(diagnostic);
            out.push('\n');
        }
        if let Some(motd) = self.kernel.motd() {
            out.push_str(motd);
            out.push('\n');
        }
        out
    }

    /// Replay the startup script, returning the transcript it produced.
    ///
    /// Each command is echoed after the prompt it ran under, followed by its
    /// output, exactly as if typed.
    pub fn replay_script(&mut self) -> String {
        let Some(path) = self.script.clone() else {
            return String::new();
        };

        let script = match Script::read(&path) {
            Ok(script) => script,
            Err(e) => {
                tracing::warn!(error = %e, "startup script skipped");
                return format!("{SCRIPT_ERROR_PREFIX} {e}\n");
            }
        };

        let context = self.context;
        let mut transcript = String::new();
        self.runtime.block_on(self.kernel.run_script(&script, &mut |event| match event {
            ScriptEvent::Comment(text) => {
                transcript.push_str(text);
                transcript.push('\n');
            }
            ScriptEvent::Command { prompt, line, result } => {
                transcript.push_str(&format!("{prompt}{line}\n"));
                transcript.push_str(&format::format_result(&result, context));
            }
        }));
        transcript
    }

    /// Process a single line of input.
    ///
    /// Returns `None` for blank input, otherwise the formatted output (which
    /// may be empty, e.g. after a successful `cd`).
    pub fn process_line(&mut self, line: &str) -> Option<String> {
        let result = self.execute(line)?;
        Some(format::format_result(&result, self.context))
    }

    /// Run a line and return the raw result.
    pub fn execute(&mut self, line: &str) -> Option<ExecResult> {
        self.runtime
            .block_on(self.kernel.execute(line, CommandSource::Interactive))
    }

    /// True once `exit` has run.
    pub fn exit_requested(&self) -> bool {
        self.runtime.block_on(self.kernel.exit_scheduled())
    }

    /// Block until a pending `exit` completes.
    pub fn wait_for_exit(&self) {
        self.runtime.block_on(self.kernel.wait_for_exit());
    }
}

fn display_opt(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| NOT_SET.to_string())
}

/// History file under the platform data dir.
fn history_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.data_dir().join("vsh").join("history.txt"))
}

/// Save REPL history to disk.
fn save_history(rl: &mut Editor<(), DefaultHistory>, history_path: &Option<PathBuf>) {
    if let Some(path) = history_path {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!("Failed to create history directory: {}", e);
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

/// Run the REPL until `exit`, EOF or a read error.
pub fn run(config: KernelConfig, script: Option<PathBuf>) -> Result<()> {
    let mut repl = Repl::with_config(config)?
        .with_script(script)
        .with_context(format::detect_context());

    print!("{}", repl.banner());
    print!("{}", repl.replay_script());

    if repl.exit_requested() {
        repl.wait_for_exit();
        return Ok(());
    }

    let mut rl: Editor<(), DefaultHistory> =
        Editor::new().context("Failed to create editor")?;

    let history_path = history_path();
    if let Some(ref path) = history_path
        && let Err(e) = rl.load_history(path)
    {
        // Missing history is expected on first run
        let is_not_found = matches!(
            &e,
            ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        );
        if !is_not_found {
            tracing::warn!("Failed to load history: {}", e);
        }
    }

    loop {
        let prompt = repl.prompt();

        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty()
                    && let Err(e) = rl.add_history_entry(line.as_str())
                {
                    tracing::warn!("Failed to add history entry: {}", e);
                }

                if let Some(output) = repl.process_line(&line) {
                    print!("{output}");
                }

                if repl.exit_requested() {
                    repl.wait_for_exit();
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    save_history(&mut rl, &history_path);

    Ok(())
}
