//! The Kernel: owns the VFS, the working directory, and the command set.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                     Kernel                      │
//! │  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │ ToolRegistry │  │ ExecContext (VFS, cwd,   │ │
//! │  │  (builtins)  │  │   pending exit)          │ │
//! │  └──────────────┘  └──────────────────────────┘ │
//! │  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │  Identity    │  │ AuditLog (optional)      │ │
//! │  └──────────────┘  └──────────────────────────┘ │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Startup never fails: a VFS that cannot be read or parsed leaves an empty
//! root, and an audit log that cannot be opened is skipped. Both become
//! [`Kernel::diagnostics`] for the front end to print.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

use vsh_types::{AuditRecord, CommandSource, ExecResult};

use crate::audit::{AuditLog, timestamp_now};
use crate::error::ShellError;
use crate::identity::Identity;
use crate::script::{Script, ScriptEvent, ScriptLine};
use crate::tools::{ExecContext, ToolRegistry, ToolSchema, register_builtins};
use crate::vfs::{self, Directory, FileData, Node};

/// Name of the root file printed as message of the day.
pub const MOTD_FILE: &str = "motd";

/// Configuration for kernel initialization.
#[derive(Debug, Clone, Default)]
pub struct KernelConfig {
    /// XML document describing the VFS. `None` starts with an empty root.
    pub vfs_path: Option<PathBuf>,

    /// XML audit log. `None` disables auditing.
    pub audit_log: Option<PathBuf>,

    /// Prompt and audit identity. `None` discovers it from the environment.
    pub identity: Option<Identity>,
}

impl KernelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vfs(mut self, path: impl Into<PathBuf>) -> Self {
        self.vfs_path = Some(path.into());
        self
    }

    pub fn with_audit_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_log = Some(path.into());
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }
}

/// A shell session over a virtual filesystem.
pub struct Kernel {
    config: KernelConfig,
    identity: Identity,
    root: Arc<Node>,
    tools: ToolRegistry,
    ctx: Mutex<ExecContext>,
    audit: Option<AuditLog>,
    audit_failures: AtomicUsize,
    diagnostics: Vec<String>,
}

impl Kernel {
    /// Build a kernel, loading the VFS and opening the audit log named in
    /// `config`.
    pub fn new(config: KernelConfig) -> Self {
        let mut diagnostics = Vec::new();

        let root = match vfs::load(config.vfs_path.as_deref()) {
            Ok(report) => {
                if !report.duplicates.is_empty() {
                    tracing::info!(count = report.duplicates.len(), "duplicate VFS names replaced");
                }
                if report.unnamed > 0 {
                    tracing::info!(count = report.unnamed, "skipped VFS elements without a name");
                }
                if !report.slashed.is_empty() {
                    tracing::info!(count = report.slashed.len(), "VFS names containing '/'");
                }
                report.root
            }
            Err(e) => {
                tracing::warn!(error = %e, "VFS load failed, starting with an empty root");
                diagnostics.push(format!("[VFS ERROR] {e}"));
                Directory::new()
            }
        };

        Self::assemble(root, config, diagnostics)
    }

    /// Build a kernel over an already constructed tree. `config.vfs_path`
    /// is ignored.
    pub fn with_root(root: Directory, config: KernelConfig) -> Self {
        Self::assemble(root, config, Vec::new())
    }

    /// Kernel with an empty root, discovered identity and no audit log.
    pub fn transient() -> Self {
        Self::with_root(Directory::new(), KernelConfig::default())
    }

    fn assemble(root: Directory, config: KernelConfig, mut diagnostics: Vec<String>) -> Self {
        let audit = config
            .audit_log
            .as_ref()
            .and_then(|path| match AuditLog::open(path) {
                Ok(log) => Some(log),
                Err(e) => {
                    tracing::warn!(error = %e, "audit log disabled");
                    diagnostics.push(format!("[LOG ERROR] {e}"));
                    None
                }
            });

        let identity = config.identity.clone().unwrap_or_else(Identity::discover);

        let mut tools = ToolRegistry::new();
        register_builtins(&mut tools);

        let root = Arc::new(Node::Directory(root));
        let ctx = ExecContext::with_shared(Arc::clone(&root));

        tracing::debug!(user = %identity.user, host = %identity.host, "kernel ready");

        Self {
            config,
            identity,
            root,
            tools,
            ctx: Mutex::new(ctx),
            audit,
            audit_failures: AtomicUsize::new(0),
            diagnostics,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Startup problems, one human-readable line each.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Text of `~/motd`, if the root has a text file by that name.
    pub fn motd(&self) -> Option<&str> {
        self.root
            .as_dir()
            .and_then(|dir| dir.get(MOTD_FILE))
            .and_then(Node::as_file)
            .and_then(FileData::as_text)
    }

    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools.schemas()
    }

    /// Current working directory as `~/a/b`.
    pub async fn cwd(&self) -> String {
        self.ctx.lock().await.cwd.to_string()
    }

    /// Prompt string: `user@host:cwd$ `.
    pub async fn prompt(&self) -> String {
        let cwd = self.cwd().await;
        format!("{}@{}:{}$ ", self.identity.user, self.identity.host, cwd)
    }

    /// Execute one command line.
    ///
    /// Returns `None` for blank input. Otherwise the command is audited
    /// (before it runs) and dispatched. Command failures are carried in the
    /// returned [`ExecResult`].
    #[tracing::instrument(level = "info", skip(self, source), fields(source = %source))]
    pub async fn execute(&self, line: &str, source: CommandSource) -> Option<ExecResult> {
        let mut words = line.split_whitespace();
        let command = words.next()?;
        let args: Vec<String> = words.map(str::to_string).collect();

        let mut ctx = self.ctx.lock().await;
        self.record(command, &args, &ctx.cwd.to_string(), source);

        let result = match self.tools.get(command) {
            Some(tool) => tool.execute(args.into_iter().collect(), &mut *ctx).await,
            None => ShellError::UnknownCommand(command.to_string()).into(),
        };

        if !result.ok() {
            tracing::debug!(command, code = result.code, err = %result.err, "command failed");
        }
        Some(result)
    }

    /// Replay a script, reporting each line through `on_event`.
    ///
    /// Returns the number of commands executed.
    pub async fn run_script(
        &self,
        script: &Script,
        on_event: &mut dyn FnMut(ScriptEvent<'_>),
    ) -> usize {
        let mut executed = 0;
        for line in script.lines() {
            match line {
                ScriptLine::Comment(text) => on_event(ScriptEvent::Comment(text)),
                ScriptLine::Command(cmd) => {
                    let prompt = self.prompt().await;
                    if let Some(result) = self.execute(cmd, CommandSource::Script).await {
                        executed += 1;
                        on_event(ScriptEvent::Command {
                            prompt,
                            line: cmd,
                            result,
                        });
                    }
                }
            }
        }
        tracing::debug!(executed, "script finished");
        executed
    }

    /// True once `exit` has run and termination is pending.
    pub async fn exit_scheduled(&self) -> bool {
        self.ctx.lock().await.exit_scheduled()
    }

    /// Wait for a pending termination to elapse. Returns immediately when
    /// none is pending.
    pub async fn wait_for_exit(&self) {
        let task = self.ctx.lock().await.take_exit_task();
        if let Some(task) = task
            && let Err(e) = task.await
            && !e.is_cancelled()
        {
            tracing::warn!(error = %e, "exit task failed");
        }
    }

    /// Cancel a pending termination. Returns true if one was pending.
    pub async fn cancel_exit(&self) -> bool {
        self.ctx.lock().await.cancel_exit()
    }

    /// Number of commands whose audit record could not be written.
    pub fn audit_failures(&self) -> usize {
        self.audit_failures.load(Ordering::Relaxed)
    }

    fn record(&self, command: &str, args: &[String], cwd: &str, source: CommandSource) {
        let Some(log) = &self.audit else {
            return;
        };
        let record = AuditRecord {
            user: self.identity.user.clone(),
            host: self.identity.host.clone(),
            timestamp: timestamp_now(),
            command: command.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_string(),
            source,
        };
        if let Err(e) = log.append(&record) {
            self.audit_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, "failed to write audit record");
        }
    }
}
