//! vsh CLI entry point.
//!
//! Usage:
//!   vsh                                  # Empty VFS, interactive
//!   vsh --vfs tree.xml                   # Load a VFS
//!   vsh --vfs tree.xml --log audit.xml   # Also audit every command
//!   vsh --script setup.txt               # Replay a script first

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use vsh_kernel::KernelConfig;
use vsh_kernel::tools::{ToolRegistry, register_builtins};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    vfs: Option<PathBuf>,
    log: Option<PathBuf>,
    script: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Run(Options),
    Help,
    Version,
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Action::Run(options)) => options,
        Ok(Action::Help) => {
            print_help();
            return Ok(ExitCode::SUCCESS);
        }
        Ok(Action::Version) => {
            println!(
                "vsh {} ({} {})",
                env!("CARGO_PKG_VERSION"),
                env!("VSH_GIT_HASH"),
                env!("VSH_BUILD_DATE")
            );
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run 'vsh --help' for usage.");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut config = KernelConfig::new();
    if let Some(path) = options.vfs {
        config = config.with_vfs(path);
    }
    if let Some(path) = options.log {
        config = config.with_audit_log(path);
    }

    vsh_repl::run(config, options.script).context("REPL failed")?;
    Ok(ExitCode::SUCCESS)
}

fn parse_args(args: &[String]) -> Result<Action> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };

        let slot = match flag {
            "-h" | "--help" => return Ok(Action::Help),
            "-V" | "--version" => return Ok(Action::Version),
            "--vfs" => &mut options.vfs,
            "--log" => &mut options.log,
            "--script" => &mut options.script,
            other => bail!("Unknown option: {other}"),
        };

        let value = match inline {
            Some(value) => value,
            None => iter
                .next()
                .cloned()
                .with_context(|| format!("{flag} requires a path"))?,
        };
        *slot = Some(PathBuf::from(value));
    }

    Ok(Action::Run(options))
}

fn print_help() {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry);
    let commands: String = registry
        .schemas()
        .iter()
        .map(|s| format!("  {:<30}{}\n", s.usage, s.description))
        .collect();

    println!(
        r#"vsh v{}: a read-only shell over an XML virtual filesystem

Usage:
  vsh [OPTIONS]

Options:
  --vfs <path>                 XML document describing the VFS
  --log <path>                 Append an XML audit record per command
  --script <path>              Replay commands before the first prompt
  -h, --help                   Show this help
  -V, --version                Show version

Commands:
{commands}
Environment:
  RUST_LOG                     Log level (e.g. RUST_LOG=vsh_kernel=debug)
  NO_COLOR, TERM=dumb          Disable coloured listings
"#,
        env!("CARGO_PKG_VERSION")
    );
}
