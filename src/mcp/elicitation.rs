// src/mcp/elicitation.rs
// MCP elicitation support: ask the connected client to confirm command prompts.
//
// All call sites degrade to a decline when the client doesn't support elicitation.

use async_trait::async_trait;
use rmcp::model::{
    CreateElicitationRequestParams, ElicitationAction, ElicitationSchema, EnumSchemaBuilder,
    PrimitiveSchema,
};
use rmcp::service::{Peer, RoleServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::ConfirmPolicy;
use crate::config::env::DEFAULT_ELICITATION_TIMEOUT;
use crate::runner::{
    ConfirmationRequest, Confirmer, Decision, FixedConfirmer, TerminalConfirmer, parse_answer,
};

/// Outcome of an elicitation request, distinguishing all cases.
#[derive(Debug)]
pub enum ElicitationOutcome {
    /// User accepted and provided data
    Accepted(serde_json::Value),
    /// User explicitly declined
    Declined,
    /// User cancelled / dismissed
    Cancelled,
    /// Client doesn't support elicitation
    NotSupported,
    /// Transport or timeout error (logged at warn, treated as unavailable)
    Failed(String),
}

impl ElicitationOutcome {
    pub fn into_value(self) -> Option<serde_json::Value> {
        match self {
            Self::Accepted(v) => Some(v),
            _ => None,
        }
    }
}

/// Shared slot for the connected client, filled on the first tool call
pub type PeerSlot = Arc<RwLock<Option<Peer<RoleServer>>>>;

/// Wrapper around the MCP peer for elicitation requests.
#[derive(Clone)]
pub struct ElicitationClient {
    peer: PeerSlot,
    timeout: Duration,
}

impl ElicitationClient {
    pub fn new(peer: PeerSlot) -> Self {
        Self {
            peer,
            timeout: DEFAULT_ELICITATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if the connected client supports elicitation.
    pub async fn is_available(&self) -> bool {
        let guard = self.peer.read().await;
        guard
            .as_ref()
            .map(|p| p.supports_elicitation())
            .unwrap_or(false)
    }

    /// Send an elicitation request and map the result to an outcome.
    pub async fn request(
        &self,
        message: impl Into<String>,
        schema: ElicitationSchema,
    ) -> ElicitationOutcome {
        // Clone the peer out so the lock isn't held while the operator reads
        let peer = {
            let guard = self.peer.read().await;
            match guard.as_ref() {
                Some(p) if p.supports_elicitation() => p.clone(),
                _ => return ElicitationOutcome::NotSupported,
            }
        };

        let params = CreateElicitationRequestParams {
            meta: None,
            message: message.into(),
            requested_schema: schema,
        };

        match peer
            .create_elicitation_with_timeout(params, Some(self.timeout))
            .await
        {
            Ok(result) => match result.action {
                ElicitationAction::Accept => match result.content {
                    Some(data) => ElicitationOutcome::Accepted(data),
                    None => ElicitationOutcome::Declined,
                },
                ElicitationAction::Decline => ElicitationOutcome::Declined,
                ElicitationAction::Cancel => ElicitationOutcome::Cancelled,
            },
            Err(e) => {
                let msg = format!("Elicitation request failed: {}", e);
                warn!("{}", msg);
                ElicitationOutcome::Failed(msg)
            }
        }
    }
}

/// Build the yes/no schema used for command prompts.
pub fn confirmation_schema() -> ElicitationSchema {
    #[allow(clippy::expect_used)] // Infallible: hardcoded enum values with matching titles
    let answer_enum = EnumSchemaBuilder::new(vec!["yes".to_string(), "no".to_string()])
        .enum_titles(vec!["Yes, continue".to_string(), "No, abort".to_string()])
        .expect("enum titles count matches values")
        .description("Answer sent to the running command")
        .build();

    ElicitationSchema::builder()
        .title("Command Confirmation")
        .description("A running command is waiting for a yes/no answer.")
        .required_property("answer", PrimitiveSchema::Enum(answer_enum))
        .build_unchecked()
}

/// Map an elicitation outcome onto a prompt decision. Only an explicit "yes" approves.
pub fn decision_from_outcome(outcome: ElicitationOutcome) -> Decision {
    outcome
        .into_value()
        .as_ref()
        .and_then(|v| v.get("answer"))
        .and_then(|v| v.as_str())
        .map(parse_answer)
        .unwrap_or(Decision::Decline)
}

/// Confirms prompts through the MCP client's elicitation UI.
pub struct ElicitationConfirmer {
    client: ElicitationClient,
}

impl ElicitationConfirmer {
    pub fn new(client: ElicitationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Confirmer for ElicitationConfirmer {
    fn name(&self) -> &'static str {
        "elicit"
    }

    async fn confirm(&self, request: &ConfirmationRequest) -> Decision {
        let outcome = self
            .client
            .request(request.message(), confirmation_schema())
            .await;
        debug!(outcome = ?outcome, "Elicitation answered");
        decision_from_outcome(outcome)
    }
}

/// Picks a decision source per prompt: elicitation, then terminal, then decline.
pub struct AutoConfirmer {
    elicitation: ElicitationConfirmer,
    terminal: TerminalConfirmer,
}

impl AutoConfirmer {
    pub fn new(client: ElicitationClient) -> Self {
        Self {
            elicitation: ElicitationConfirmer::new(client),
            terminal: TerminalConfirmer,
        }
    }
}

#[async_trait]
impl Confirmer for AutoConfirmer {
    fn name(&self) -> &'static str {
        "auto"
    }

    async fn confirm(&self, request: &ConfirmationRequest) -> Decision {
        if self.elicitation.client.is_available().await {
            return self.elicitation.confirm(request).await;
        }
        if TerminalConfirmer::is_attached() {
            return self.terminal.confirm(request).await;
        }
        warn!(
            trigger = request.trigger,
            "No way to ask for confirmation (no elicitation, no terminal), declining"
        );
        Decision::Decline
    }
}

/// Build the confirmer for a configured policy
pub fn confirmer_for(policy: ConfirmPolicy, client: ElicitationClient) -> Arc<dyn Confirmer> {
    match policy {
        ConfirmPolicy::Auto => Arc::new(AutoConfirmer::new(client)),
        ConfirmPolicy::Elicit => Arc::new(ElicitationConfirmer::new(client)),
        ConfirmPolicy::Terminal => Arc::new(TerminalConfirmer),
        ConfirmPolicy::Approve => Arc::new(FixedConfirmer::new(Decision::Approve)),
        ConfirmPolicy::Deny => Arc::new(FixedConfirmer::new(Decision::Decline)),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_client() -> ElicitationClient {
        ElicitationClient::new(Arc::new(RwLock::new(None)))
    }

    fn request() -> ConfirmationRequest {
        ConfirmationRequest {
            command: "apt-get install tree".into(),
            line: "Do you want to continue? [Y/n] ".into(),
            trigger: "do you want to continue",
        }
    }

    #[test]
    fn test_confirmation_schema_has_answer_field() {
        let schema = confirmation_schema();
        let required = schema
            .required
            .as_ref()
            .expect("should have required fields");
        assert!(required.contains(&"answer".to_string()));
        assert_eq!(schema.properties.len(), 1);
    }

    #[test]
    fn test_decision_from_outcome() {
        let yes = ElicitationOutcome::Accepted(serde_json::json!({"answer": "yes"}));
        assert_eq!(decision_from_outcome(yes), Decision::Approve);

        let no = ElicitationOutcome::Accepted(serde_json::json!({"answer": "no"}));
        assert_eq!(decision_from_outcome(no), Decision::Decline);

        let missing = ElicitationOutcome::Accepted(serde_json::json!({}));
        assert_eq!(decision_from_outcome(missing), Decision::Decline);

        assert_eq!(decision_from_outcome(ElicitationOutcome::Declined), Decision::Decline);
        assert_eq!(decision_from_outcome(ElicitationOutcome::Cancelled), Decision::Decline);
        assert_eq!(
            decision_from_outcome(ElicitationOutcome::Failed("timeout".into())),
            Decision::Decline
        );
    }

    #[tokio::test]
    async fn test_no_peer_returns_not_supported() {
        let client = empty_client();
        assert!(!client.is_available().await);

        let outcome = client.request("test", confirmation_schema()).await;
        assert!(matches!(outcome, ElicitationOutcome::NotSupported));
    }

    #[tokio::test]
    async fn test_elicitation_confirmer_declines_without_peer() {
        let confirmer = ElicitationConfirmer::new(empty_client());
        assert_eq!(confirmer.confirm(&request()).await, Decision::Decline);
    }

    #[tokio::test]
    async fn test_fixed_policies() {
        let approve = confirmer_for(ConfirmPolicy::Approve, empty_client());
        assert_eq!(approve.confirm(&request()).await, Decision::Approve);

        let deny = confirmer_for(ConfirmPolicy::Deny, empty_client());
        assert_eq!(deny.confirm(&request()).await, Decision::Decline);

        assert_eq!(confirmer_for(ConfirmPolicy::Auto, empty_client()).name(), "auto");
        assert_eq!(confirmer_for(ConfirmPolicy::Elicit, empty_client()).name(), "elicit");
        assert_eq!(
            confirmer_for(ConfirmPolicy::Terminal, empty_client()).name(),
            "terminal"
        );
    }
}
