// src/runner/mod.rs
// Interactive command runner: streams shell output and intercepts yes/no prompts

pub mod decision;
pub mod prompt;
pub mod shell;

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::ChildStdin;
use tracing::{debug, info, warn};

pub use decision::{
    ConfirmationRequest, Confirmer, Decision, FixedConfirmer, TerminalConfirmer, parse_answer,
};
pub use prompt::{PROMPT_TRIGGERS, detect_prompt};

/// Final line appended when the operator declines a prompt
pub const ABORT_LINE: &str = "Command aborted by user.";

/// Message reported when the working directory is unusable
pub const MISSING_DIRECTORY: &str = "Directory does not exist";

/// How long a partial line must sit idle before it is checked for a prompt
pub const DEFAULT_PROMPT_SETTLE: Duration = Duration::from_millis(250);

/// Errors from spawning or driving a command
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Directory does not exist")]
    MissingDirectory(PathBuf),

    #[error("failed to spawn command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to set up command pipes: {0}")]
    Pipe(#[source] std::io::Error),

    #[error("failed to read command output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to wait for command: {0}")]
    Wait(#[source] std::io::Error),

    #[error("output reader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("command interrupted")]
    Interrupted,
}

/// One command execution request
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub working_directory: PathBuf,
    pub command_line: String,
}

impl CommandInvocation {
    pub fn new(working_directory: impl Into<PathBuf>, command_line: impl Into<String>) -> Self {
        Self {
            working_directory: working_directory.into(),
            command_line: command_line.into(),
        }
    }
}

/// Where command output is mirrored while it streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EchoMode {
    /// Write to this process's stdout
    Stdout,
    /// Emit through tracing (stderr); stdout may carry a protocol
    #[default]
    Log,
    Off,
}

impl FromStr for EchoMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "log" => Ok(Self::Log),
            "off" | "none" => Ok(Self::Off),
            other => Err(format!(
                "unknown echo mode '{}' (expected stdout, log, off)",
                other
            )),
        }
    }
}

/// A prompt seen during a run and what was answered
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PromptRecord {
    pub trigger: String,
    pub line: String,
    pub decision: Decision,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Child exited on its own; `None` when killed by a signal
    Exited(Option<i32>),
    /// Operator declined a prompt and the child was killed
    Aborted,
}

/// Captured result of a run
#[derive(Debug, Clone)]
pub struct CommandRun {
    pub lines: Vec<String>,
    pub prompts: Vec<PromptRecord>,
    pub outcome: RunOutcome,
}

impl CommandRun {
    /// Output exactly as emitted, plus the abort line when declined
    pub fn output(&self) -> String {
        self.lines.concat()
    }

    pub fn aborted(&self) -> bool {
        self.outcome == RunOutcome::Aborted
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.outcome {
            RunOutcome::Exited(code) => code,
            RunOutcome::Aborted => None,
        }
    }
}

/// Resolved echo destination handed to the pump
#[derive(Clone)]
enum EchoSink {
    Writer(Arc<Mutex<dyn Write + Send>>),
    Log,
    Off,
}

impl From<EchoMode> for EchoSink {
    fn from(mode: EchoMode) -> Self {
        match mode {
            EchoMode::Stdout => Self::Writer(Arc::new(Mutex::new(std::io::stdout()))),
            EchoMode::Log => Self::Log,
            EchoMode::Off => Self::Off,
        }
    }
}

/// Spawns shell commands and answers their confirmation prompts
#[derive(Clone)]
pub struct CommandRunner {
    confirmer: Arc<dyn Confirmer>,
    echo: EchoSink,
    settle: Duration,
    own_group: bool,
}

impl CommandRunner {
    pub fn new(confirmer: Arc<dyn Confirmer>) -> Self {
        Self {
            confirmer,
            echo: EchoMode::default().into(),
            settle: DEFAULT_PROMPT_SETTLE,
            own_group: true,
        }
    }

    pub fn with_echo(mut self, echo: EchoMode) -> Self {
        self.echo = echo.into();
        self
    }

    /// Mirror output into `writer` instead of an `EchoMode` destination
    pub fn with_echo_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.echo = EchoSink::Writer(Arc::new(Mutex::new(writer)));
        self
    }

    /// Whether the shell leads its own process group (default: yes).
    ///
    /// Turn off when a human at a terminal drives the run: the child then
    /// shares the terminal's foreground group.
    pub fn with_own_process_group(mut self, own_group: bool) -> Self {
        self.own_group = own_group;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Run a command to completion or until the operator declines a prompt.
    pub async fn run(&self, invocation: &CommandInvocation) -> Result<CommandRun, RunnerError> {
        self.run_until(invocation, std::future::pending()).await
    }

    /// Like `run`, but kills the command and returns `Interrupted` once
    /// `interrupt` completes.
    pub async fn run_until<F>(
        &self,
        invocation: &CommandInvocation,
        interrupt: F,
    ) -> Result<CommandRun, RunnerError>
    where
        F: Future<Output = ()>,
    {
        let dir = &invocation.working_directory;
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(RunnerError::MissingDirectory(dir.clone())),
        }

        let start = Instant::now();
        info!(
            dir = %dir.display(),
            command = %invocation.command_line,
            confirmer = self.confirmer.name(),
            "Running command"
        );

        let shell::SpawnedShell {
            mut child,
            stdin,
            output,
        } = shell::spawn(dir, &invocation.command_line, self.own_group)?;

        let pump = Pump {
            reader: BufReader::new(output),
            stdin,
            confirmer: self.confirmer.clone(),
            echo: self.echo.clone(),
            settle: self.settle,
            command: invocation.command_line.clone(),
            lines: Vec::new(),
            prompts: Vec::new(),
        };

        tokio::pin!(interrupt);
        let mut pump_task = tokio::spawn(pump.run());

        let joined = tokio::select! {
            joined = &mut pump_task => Some(joined),
            () = &mut interrupt => None,
        };
        let pumped = match joined {
            Some(Ok(Ok(pumped))) => pumped,
            Some(Ok(Err(e))) => {
                shell::terminate(&mut child, self.own_group).await;
                return Err(e);
            }
            Some(Err(e)) => {
                shell::terminate(&mut child, self.own_group).await;
                return Err(RunnerError::Join(e));
            }
            None => {
                pump_task.abort();
                shell::terminate(&mut child, self.own_group).await;
                warn!(command = %invocation.command_line, "Command interrupted");
                return Err(RunnerError::Interrupted);
            }
        };

        let PumpResult {
            mut lines,
            prompts,
            declined,
        } = pumped;

        let outcome = if declined {
            shell::terminate(&mut child, self.own_group).await;
            lines.push(ABORT_LINE.to_string());
            RunOutcome::Aborted
        } else {
            let waited = tokio::select! {
                status = child.wait() => Some(status),
                () = &mut interrupt => None,
            };
            let Some(status) = waited else {
                shell::terminate(&mut child, self.own_group).await;
                warn!(command = %invocation.command_line, "Command interrupted");
                return Err(RunnerError::Interrupted);
            };
            RunOutcome::Exited(status.map_err(RunnerError::Wait)?.code())
        };

        info!(
            outcome = ?outcome,
            lines = lines.len(),
            prompts = prompts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Command finished"
        );

        Ok(CommandRun {
            lines,
            prompts,
            outcome,
        })
    }
}

struct PumpResult {
    lines: Vec<String>,
    prompts: Vec<PromptRecord>,
    declined: bool,
}

/// Reads the merged output stream, one task per run
struct Pump<R> {
    reader: BufReader<R>,
    stdin: ChildStdin,
    confirmer: Arc<dyn Confirmer>,
    echo: EchoSink,
    settle: Duration,
    command: String,
    lines: Vec<String>,
    prompts: Vec<PromptRecord>,
}

impl<R: AsyncRead + Unpin> Pump<R> {
    async fn run(mut self) -> Result<PumpResult, RunnerError> {
        let mut pending: Vec<u8> = Vec::new();
        // Bytes of `pending` already checked for a trigger while idle
        let mut inspected = 0usize;
        let mut declined = false;

        loop {
            // read_until keeps partial bytes in `pending` when the timeout fires
            let read = tokio::time::timeout(
                self.settle,
                self.reader.read_until(b'\n', &mut pending),
            )
            .await;

            match read {
                Ok(Ok(0)) => {
                    if !pending.is_empty() {
                        let line = take_line(&mut pending);
                        declined = !self.accept_line(line).await;
                    }
                    break;
                }
                Ok(Ok(_)) => {
                    if pending.last() == Some(&b'\n') {
                        inspected = 0;
                        let line = take_line(&mut pending);
                        if !self.accept_line(line).await {
                            declined = true;
                            break;
                        }
                    }
                }
                Ok(Err(e)) => return Err(RunnerError::Io(e)),
                Err(_idle) => {
                    if pending.len() > inspected {
                        inspected = pending.len();
                        if detect_prompt(&String::from_utf8_lossy(&pending)).is_some() {
                            inspected = 0;
                            let line = take_line(&mut pending);
                            if !self.accept_line(line).await {
                                declined = true;
                                break;
                            }
                        }
                    }
                }
            }
        }

        debug!(lines = self.lines.len(), declined, "Output pump finished");
        Ok(PumpResult {
            lines: self.lines,
            prompts: self.prompts,
            declined,
        })
    }

    /// Record a line and answer it if it is a prompt. Returns false on decline.
    async fn accept_line(&mut self, line: String) -> bool {
        self.echo_line(&line);
        let Some(trigger) = detect_prompt(&line) else {
            self.lines.push(line);
            return true;
        };
        self.lines.push(line.clone());

        let request = ConfirmationRequest {
            command: self.command.clone(),
            line,
            trigger,
        };
        let decision = self.confirmer.confirm(&request).await;
        info!(trigger, decision = ?decision, "Prompt answered");

        if let Err(e) = self.reply(decision).await {
            // Child may have exited or closed stdin already
            debug!(error = %e, "Could not deliver prompt answer");
        }

        self.prompts.push(PromptRecord {
            trigger: trigger.to_string(),
            line: request.line,
            decision,
        });

        decision.is_approved()
    }

    async fn reply(&mut self, decision: Decision) -> std::io::Result<()> {
        self.stdin.write_all(decision.reply()).await?;
        self.stdin.flush().await
    }

    fn echo_line(&self, line: &str) {
        match &self.echo {
            EchoSink::Writer(writer) => {
                let Ok(mut out) = writer.lock() else {
                    warn!("Echo writer poisoned, dropping output line");
                    return;
                };
                if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
                    warn!(error = %e, "Failed to echo command output");
                }
            }
            EchoSink::Log => {
                info!(target: "fileflow::output", "{}", line.trim_end_matches(['\r', '\n']));
            }
            EchoSink::Off => {}
        }
    }
}

fn take_line(pending: &mut Vec<u8>) -> String {
    let bytes = std::mem::take(pending);
    String::from_utf8_lossy(&bytes).into_owned()
}
