//! Hook registry: subscriptions and sequential dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::HookError;
use crate::events::{HookEvent, HookOutput};

pub type HookResult = Result<Option<HookOutput>, HookError>;
pub type HookFuture = Pin<Box<dyn Future<Output = HookResult> + Send>>;

/// Async hook handler function type.
pub type HookHandler = Arc<dyn Fn(HookEvent) -> HookFuture + Send + Sync>;

/// Box an async function or closure as a [`HookHandler`].
pub fn handler<F, Fut>(f: F) -> HookHandler
where
    F: Fn(HookEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HookResult> + Send + 'static,
{
    Arc::new(move |event: HookEvent| -> HookFuture { Box::pin(f(event)) })
}

/// Manages hook subscriptions and dispatches events.
pub struct HookRegistry {
    /// Event name to handlers, in registration order. `*` matches every event.
    handlers: RwLock<HashMap<String, Vec<HookHandler>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler for a specific event type.
    pub async fn on(&self, event_type: &str, handler: HookHandler) {
        let mut handlers = self.handlers.write().await;
        handlers
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    /// Run every matching handler in order and collect their outputs.
    ///
    /// Specific handlers run before wildcard ones. The first error stops
    /// dispatch and is returned.
    pub async fn emit(&self, event: HookEvent) -> Result<Vec<HookOutput>, HookError> {
        let matching: Vec<HookHandler> = {
            let handlers = self.handlers.read().await;
            [event.name(), "*"]
                .iter()
                .filter_map(|key| handlers.get(*key))
                .flatten()
                .cloned()
                .collect()
        };

        tracing::debug!(event = event.name(), handlers = matching.len(), "Dispatching hook");

        let mut outputs = Vec::new();
        for handler in matching {
            if let Some(output) = handler(event.clone()).await? {
                outputs.push(output);
            }
        }
        Ok(outputs)
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
