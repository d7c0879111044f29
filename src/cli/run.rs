// src/cli/run.rs
// Run a single shell command with prompts confirmed on this terminal

use anyhow::Result;
use fileflow::config::{ConfirmPolicy, EnvConfig};
use fileflow::mcp::elicitation::{ElicitationClient, confirmer_for};
use fileflow::runner::{ABORT_LINE, CommandInvocation, CommandRunner, EchoMode, RunnerError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Exit status used when Ctrl-C stops the command (128 + SIGINT)
const INTERRUPTED_EXIT: i32 = 130;

/// Run `command` in `dir` (default: current directory) and exit with its status
pub async fn run_command(
    dir: Option<PathBuf>,
    confirm: Option<String>,
    command: String,
) -> Result<()> {
    let config = EnvConfig::load();
    let policy = match confirm {
        Some(raw) => raw.parse::<ConfirmPolicy>().map_err(anyhow::Error::msg)?,
        None => config.command.confirm,
    };

    let runner = terminal_runner(policy, config.command.prompt_settle);

    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let invocation = CommandInvocation::new(dir, command);

    let run = match runner.run_until(&invocation, ctrl_c()).await {
        Ok(run) => run,
        Err(RunnerError::Interrupted) => std::process::exit(INTERRUPTED_EXIT),
        Err(e) => return Err(e.into()),
    };
    if run.aborted() {
        println!("{}", ABORT_LINE);
        std::process::exit(1);
    }

    info!(exit_code = ?run.exit_code(), "Command exited");
    match run.exit_code() {
        Some(0) => Ok(()),
        Some(code) => std::process::exit(code),
        // Killed by a signal
        None => std::process::exit(1),
    }
}

/// Runner for a human at a terminal: output to stdout, child in the
/// terminal's foreground process group
fn terminal_runner(policy: ConfirmPolicy, settle: std::time::Duration) -> CommandRunner {
    // No MCP peer here; elicitation is never available so auto falls back to the terminal
    let client = ElicitationClient::new(Arc::new(RwLock::new(None)));
    CommandRunner::new(confirmer_for(policy, client))
        .with_echo(EchoMode::Stdout)
        .with_settle(settle)
        .with_own_process_group(false)
}

/// Resolves on Ctrl-C; never resolves if the handler can't be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
