//! Boundary to the host runtime: silent session messages and UI toasts.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
    pub duration_ms: u64,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            title: "Hybrid Arch".to_string(),
            message: message.into(),
            variant: ToastVariant::Info,
            duration_ms: 6000,
        }
    }
}

/// What the plugin needs from the host.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Add `text` to the session without asking the model to reply.
    async fn inject_context(&self, session_id: &str, text: &str) -> anyhow::Result<()>;

    /// Show a transient UI notice. Callers ignore failures.
    async fn show_toast(&self, toast: &Toast) -> anyhow::Result<()>;
}

/// Something the plugin sent to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    Context { session_id: String, text: String },
    Toast(Toast),
}

/// Host that keeps every request in memory, for headless runs.
#[derive(Debug, Default)]
pub struct BufferedHost {
    messages: Mutex<Vec<HostMessage>>,
}

impl BufferedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<HostMessage> {
        match self.messages.lock() {
            Ok(mut messages) => std::mem::take(&mut *messages),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, message: HostMessage) -> anyhow::Result<()> {
        self.messages
            .lock()
            .map_err(|_| anyhow::anyhow!("host message buffer poisoned"))?
            .push(message);
        Ok(())
    }
}

#[async_trait]
impl HostClient for BufferedHost {
    async fn inject_context(&self, session_id: &str, text: &str) -> anyhow::Result<()> {
        self.push(HostMessage::Context {
            session_id: session_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn show_toast(&self, toast: &Toast) -> anyhow::Result<()> {
        self.push(HostMessage::Toast(toast.clone()))
    }
}
