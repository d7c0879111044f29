// src/runner/decision.rs
// Operator decisions for confirmation prompts

use async_trait::async_trait;
use dialoguer::Input;
use dialoguer::console::Term;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, warn};

/// Answer to a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Decline,
}

impl Decision {
    /// Bytes written to the child's stdin for this decision
    pub fn reply(self) -> &'static [u8] {
        match self {
            Decision::Approve => b"y\n",
            Decision::Decline => b"n\n",
        }
    }

    pub fn is_approved(self) -> bool {
        self == Decision::Approve
    }
}

/// Interpret free-form operator input. Only `y` / `yes` approve.
pub fn parse_answer(input: &str) -> Decision {
    let answer = input.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Decision::Approve
    } else {
        Decision::Decline
    }
}

/// A detected prompt waiting on a decision
#[derive(Debug, Clone)]
pub struct ConfirmationRequest {
    pub command: String,
    pub line: String,
    pub trigger: &'static str,
}

impl ConfirmationRequest {
    /// Human-readable question shown to the operator
    pub fn message(&self) -> String {
        format!(
            "Command `{}` is asking: {}\nAnswer yes to continue, anything else aborts the command.",
            self.command,
            self.line.trim_end()
        )
    }
}

/// Source of yes/no decisions for the command runner.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Block until a decision is available. Failures must resolve to `Decline`.
    async fn confirm(&self, request: &ConfirmationRequest) -> Decision;
}

/// Always answers the same way. Used for headless deployments.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmer {
    decision: Decision,
}

impl FixedConfirmer {
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }
}

#[async_trait]
impl Confirmer for FixedConfirmer {
    fn name(&self) -> &'static str {
        match self.decision {
            Decision::Approve => "approve",
            Decision::Decline => "deny",
        }
    }

    async fn confirm(&self, request: &ConfirmationRequest) -> Decision {
        debug!(trigger = request.trigger, decision = ?self.decision, "Fixed confirmation policy");
        self.decision
    }
}

/// Asks the operator on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

impl TerminalConfirmer {
    /// Whether an interactive terminal is attached to stderr
    pub fn is_attached() -> bool {
        Term::stderr().is_term()
    }
}

#[async_trait]
impl Confirmer for TerminalConfirmer {
    fn name(&self) -> &'static str {
        "terminal"
    }

    async fn confirm(&self, request: &ConfirmationRequest) -> Decision {
        let prompt = format!("{} (y/n)", request.line.trim_end());
        let answer = tokio::task::spawn_blocking(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text_on(&Term::stderr())
        })
        .await;

        match answer {
            Ok(Ok(text)) => parse_answer(&text),
            Ok(Err(e)) => {
                warn!(error = %e, "Terminal prompt failed, declining");
                Decision::Decline
            }
            Err(e) => {
                warn!(error = %e, "Terminal prompt task panicked, declining");
                Decision::Decline
            }
        }
    }
}
