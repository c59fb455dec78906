//! Human-in-the-loop suspension points.
//!
//! Two gates exist per the pipeline design: a fixed window for the manual
//! login, and an unbounded confirmation before anything operator-facing
//! proceeds (the send stage blocks on it per account — nothing is ever
//! sent automatically). The strategy is pluggable so test harnesses can
//! answer the gates without a terminal.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use reachout_shared::{ReachoutError, Result};

/// Strategy for the two human gates.
#[async_trait]
pub trait OperatorGate: Send + Sync {
    /// Suspend for the manual-login window.
    async fn wait_for_login(&self, window: Duration);

    /// Block until the operator confirms (keypress). Unbounded.
    async fn confirm(&self, message: &str) -> Result<()>;
}

/// Interactive gate: real sleeps and a terminal prompt.
pub struct InteractiveGate;

#[async_trait]
impl OperatorGate for InteractiveGate {
    async fn wait_for_login(&self, window: Duration) {
        tokio::time::sleep(window).await;
    }

    async fn confirm(&self, message: &str) -> Result<()> {
        let message = message.to_string();
        // dialoguer blocks the thread; keep it off the async runtime.
        tokio::task::spawn_blocking(move || {
            dialoguer::Input::<String>::new()
                .with_prompt(message)
                .allow_empty(true)
                .interact_text()
                .map(|_| ())
                .map_err(|e| ReachoutError::Prompt(e.to_string()))
        })
        .await
        .map_err(|e| ReachoutError::Prompt(format!("prompt task failed: {e}")))?
    }
}

/// Test gate: answers immediately and records what it was asked.
#[derive(Default)]
pub struct ScriptedGate {
    login_waits: Mutex<Vec<Duration>>,
    confirmations: Mutex<Vec<String>>,
}

impl ScriptedGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Login windows the gate was asked to wait through.
    pub fn login_waits(&self) -> Vec<Duration> {
        self.login_waits.lock().unwrap().clone()
    }

    /// Confirmation messages shown, in order.
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperatorGate for ScriptedGate {
    async fn wait_for_login(&self, window: Duration) {
        self.login_waits.lock().unwrap().push(window);
    }

    async fn confirm(&self, message: &str) -> Result<()> {
        self.confirmations.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
