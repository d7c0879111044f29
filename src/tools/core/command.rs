// src/tools/core/command.rs
// run_command tool: interactive shell execution with prompt confirmation

use std::path::PathBuf;

use tracing::warn;

use super::ToolContext;
use crate::error::FileFlowError;
use crate::mcp::responses::{CommandData, CommandOutput, Json, Status};
use crate::runner::{CommandInvocation, CommandRunner};

/// Run `command` in `working_directory`, asking the operator whenever it prompts.
pub async fn run_command<C: ToolContext + ?Sized>(
    ctx: &C,
    working_directory: String,
    command: String,
) -> Result<Json<CommandOutput>, String> {
    let invocation = CommandInvocation::new(PathBuf::from(&working_directory), command.clone());
    let runner = CommandRunner::new(ctx.confirmer())
        .with_echo(ctx.echo_mode())
        .with_settle(ctx.prompt_settle());

    let output = match runner.run(&invocation).await {
        Ok(run) => {
            let status = if run.aborted() {
                Status::UserAborted
            } else {
                Status::Ok
            };
            let output = run.output();
            CommandOutput {
                action: "run_command".into(),
                status,
                message: output.clone(),
                data: Some(CommandData {
                    working_directory,
                    command,
                    output,
                    exit_code: run.exit_code(),
                    aborted: run.aborted(),
                    prompts: run.prompts,
                }),
            }
        }
        Err(e) => {
            let err = FileFlowError::from(e);
            warn!(dir = %working_directory, error = %err, "Command could not run");
            CommandOutput {
                action: "run_command".into(),
                status: err.status(),
                message: err.to_user_string(),
                data: None,
            }
        }
    };

    Ok(Json(output))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::{ABORT_LINE, Decision};
    use crate::tools::core::test_utils::{MockToolContext, path_arg};

    #[tokio::test]
    async fn test_echo_hello() {
        let ctx = MockToolContext::new(&[]);
        let dir = tempfile::tempdir().unwrap();
        let Json(out) = run_command(&ctx, path_arg(&dir), "echo hello".into())
            .await
            .unwrap();

        assert_eq!(out.status, Status::Ok);
        assert_eq!(out.message, "hello\n");
        let data = out.data.unwrap();
        assert_eq!(data.exit_code, Some(0));
        assert!(!data.aborted);
        assert!(data.prompts.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_message() {
        let ctx = MockToolContext::new(&[]);
        let Json(out) = run_command(&ctx, "/does/not/exist".into(), "echo hello".into())
            .await
            .unwrap();

        assert_eq!(out.status, Status::InvalidPath);
        assert_eq!(out.message, "Directory does not exist");
        assert!(out.data.is_none());
        assert_eq!(ctx.asked(), 0);
    }

    #[tokio::test]
    async fn test_rm_style_prompt_declined() {
        let ctx = MockToolContext::new(&[Decision::Decline]);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("somefile"), "keep me").unwrap();

        let Json(out) = run_command(
            &ctx,
            path_arg(&dir),
            "printf 'Remove somefile? (y/n) '; read ans; [ \"$ans\" = y ] && rm somefile".into(),
        )
        .await
        .unwrap();

        assert_eq!(out.status, Status::UserAborted);
        assert!(out.message.ends_with(ABORT_LINE));
        assert_eq!(ctx.asked(), 1);
        assert!(dir.path().join("somefile").exists());

        let data = out.data.unwrap();
        assert!(data.aborted);
        assert_eq!(data.exit_code, None);
        assert_eq!(data.prompts[0].decision, Decision::Decline);
    }

    #[tokio::test]
    async fn test_prompt_approved_continues() {
        let ctx = MockToolContext::new(&[Decision::Approve]);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("somefile"), "").unwrap();

        let Json(out) = run_command(
            &ctx,
            path_arg(&dir),
            "printf 'Remove somefile? (y/n) '; read ans; [ \"$ans\" = y ] && rm somefile && echo removed"
                .into(),
        )
        .await
        .unwrap();

        assert_eq!(out.status, Status::Ok);
        assert!(out.message.ends_with("removed\n"));
        assert!(!dir.path().join("somefile").exists());
    }

    #[tokio::test]
    async fn test_failing_command_is_still_ok_with_exit_code() {
        let ctx = MockToolContext::new(&[]);
        let dir = tempfile::tempdir().unwrap();
        let Json(out) = run_command(&ctx, path_arg(&dir), "ls no-such-entry".into())
            .await
            .unwrap();

        assert_eq!(out.status, Status::Ok);
        assert!(!out.message.is_empty(), "stderr is captured in the output");
        assert_ne!(out.data.unwrap().exit_code, Some(0));
    }
}
