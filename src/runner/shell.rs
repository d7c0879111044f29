// src/runner/shell.rs
// Shell spawning with a single merged stdout+stderr stream

use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, ChildStdin, Command};

use super::RunnerError;

/// Read half of the combined output stream
#[cfg(unix)]
pub type MergedOutput = tokio::net::unix::pipe::Receiver;

#[cfg(windows)]
pub type MergedOutput = tokio::process::ChildStdout;

/// A freshly spawned shell with its I/O handles detached
pub struct SpawnedShell {
    pub child: Child,
    pub stdin: ChildStdin,
    pub output: MergedOutput,
}

/// Build the platform shell command for `command_line`.
///
/// With `own_group` the shell leads a new process group so an abort reaches
/// every descendant. Without it the shell stays in the caller's (foreground)
/// group and can read the controlling terminal and receive its Ctrl-C.
#[cfg(unix)]
fn shell_command(command_line: &str, own_group: bool) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    if own_group {
        cmd.process_group(0);
    }
    cmd
}

#[cfg(windows)]
fn shell_command(command_line: &str, _own_group: bool) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(format!("{} 2>&1", command_line));
    cmd
}

/// Spawn `command_line` through the shell inside `dir`.
///
/// stdout and stderr share one pipe so lines keep their emission order.
#[cfg(unix)]
pub fn spawn(
    dir: &Path,
    command_line: &str,
    own_group: bool,
) -> Result<SpawnedShell, RunnerError> {
    use std::os::fd::OwnedFd;

    let (reader, writer) = std::io::pipe().map_err(RunnerError::Pipe)?;
    let stderr_writer = writer.try_clone().map_err(RunnerError::Pipe)?;

    let mut cmd = shell_command(command_line, own_group);
    cmd.current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(writer)
        .stderr(stderr_writer)
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(RunnerError::Spawn)?;
    // The command still owns our copies of the write end; EOF needs them gone
    drop(cmd);

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| RunnerError::Pipe(std::io::Error::other("child stdin not captured")))?;
    let output = tokio::net::unix::pipe::Receiver::from_owned_fd(OwnedFd::from(reader))
        .map_err(RunnerError::Pipe)?;

    Ok(SpawnedShell {
        child,
        stdin,
        output,
    })
}

#[cfg(windows)]
pub fn spawn(
    dir: &Path,
    command_line: &str,
    own_group: bool,
) -> Result<SpawnedShell, RunnerError> {
    let mut cmd = shell_command(command_line, own_group);
    cmd.current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(RunnerError::Spawn)?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| RunnerError::Pipe(std::io::Error::other("child stdin not captured")))?;
    let output = child
        .stdout
        .take()
        .ok_or_else(|| RunnerError::Pipe(std::io::Error::other("child stdout not captured")))?;

    Ok(SpawnedShell {
        child,
        stdin,
        output,
    })
}

/// Kill the shell, and its whole process group when it leads one.
pub async fn terminate(child: &mut Child, own_group: bool) {
    #[cfg(unix)]
    if own_group
        && let Some(pid) = child.id().and_then(|pid| i32::try_from(pid).ok())
    {
        // SAFETY: kill(2) has no memory-safety preconditions; the negative pid
        // targets the process group created at spawn.
        let rc = unsafe { libc::kill(-pid, libc::SIGKILL) };
        if rc != 0 {
            tracing::debug!(pid, error = %std::io::Error::last_os_error(), "Process group kill failed");
        }
    }
    #[cfg(windows)]
    let _ = own_group;

    if let Err(e) = child.kill().await {
        tracing::debug!(error = %e, "Child already gone when killing");
    }
}
