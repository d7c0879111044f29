// src/tools/core/test_utils.rs
// Shared test utilities for tool tests

use crate::runner::{ConfirmationRequest, Confirmer, Decision, EchoMode};
use crate::tools::core::ToolContext;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// ScriptedConfirmer
// ============================================================================

/// Answers prompts from a fixed queue, declining once it runs dry
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<Decision>>,
    pub asked: Mutex<Vec<ConfirmationRequest>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[Decision]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Prompt lines asked about, in order
    pub fn asked_lines(&self) -> Vec<String> {
        self.asked
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.line.clone())
            .collect()
    }
}

// ============================================================================
// SharedBuf
// ============================================================================

/// Clonable in-memory writer for capturing echoed output
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn confirm(&self, request: &ConfirmationRequest) -> Decision {
        self.asked.lock().unwrap().push(request.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Decision::Decline)
    }
}

// ============================================================================
// MockToolContext
// ============================================================================

pub struct MockToolContext {
    pub confirmer: Arc<ScriptedConfirmer>,
}

impl MockToolContext {
    pub fn new(answers: &[Decision]) -> Self {
        Self {
            confirmer: Arc::new(ScriptedConfirmer::new(answers)),
        }
    }

    pub fn asked(&self) -> usize {
        self.confirmer.asked.lock().unwrap().len()
    }
}

impl ToolContext for MockToolContext {
    fn confirmer(&self) -> Arc<dyn Confirmer> {
        self.confirmer.clone()
    }

    fn echo_mode(&self) -> EchoMode {
        EchoMode::Off
    }

    fn prompt_settle(&self) -> Duration {
        Duration::from_millis(100)
    }
}

/// Path of a temp dir as the `String` the tools take
pub fn path_arg(dir: &tempfile::TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}
