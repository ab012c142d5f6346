//! Completion events emitted by handlers
//!
//! Every successful wash or add-on produces exactly one [`CompletionEvent`].
//! Where the event ends up is decided by the [`CompletionSink`] the handlers
//! were built with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::jobs::{Addon, CustomerId, WashTier};

/// The action a completion event reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "lowercase")]
pub enum ActionKind {
    Wash(WashTier),
    Addon(Addon),
}

impl ActionKind {
    pub fn kind(&self) -> &'static str {
        match self {
            ActionKind::Wash(_) => "wash",
            ActionKind::Addon(_) => "addon",
        }
    }

    /// Discriminator name without the kind suffix ("Basic", "TireShine")
    pub fn key_name(&self) -> &'static str {
        match self {
            ActionKind::Wash(tier) => tier.as_str(),
            ActionKind::Addon(addon) => addon.as_str(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key_name(), self.kind())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub action: ActionKind,
    pub customer_id: CustomerId,
    pub completed_at: DateTime<Utc>,
}

impl CompletionEvent {
    pub fn new(action: ActionKind, customer_id: CustomerId) -> Self {
        Self {
            action,
            customer_id,
            completed_at: Utc::now(),
        }
    }

    /// Fixed human-readable line that log-based monitoring matches on
    pub fn message(&self) -> String {
        format!("--> {} performed for customer {}!", self.action, self.customer_id)
    }
}

/// Destination for completion events
pub trait CompletionSink: Send + Sync {
    fn record(&self, event: CompletionEvent);
}

/// Emits completion events as `info!` records
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl CompletionSink for TracingSink {
    fn record(&self, event: CompletionEvent) {
        tracing::info!(
            action_kind = event.action.kind(),
            action = event.action.key_name(),
            customer_id = event.customer_id.get(),
            "{}",
            event.message()
        );
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CompletionEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CompletionEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<CompletionEvent> {
        self.lock().clone()
    }

    pub fn actions(&self) -> Vec<ActionKind> {
        self.lock().iter().map(|e| e.action).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(CompletionEvent::message).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl CompletionSink for RecordingSink {
    fn record(&self, event: CompletionEvent) {
        self.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerId {
        CustomerId::new(123456).unwrap()
    }

    #[test]
    fn test_wash_message() {
        let event = CompletionEvent::new(ActionKind::Wash(WashTier::ToTheMax), customer());
        assert_eq!(event.message(), "--> ToTheMax wash performed for customer 123456!");
    }

    #[test]
    fn test_addon_message() {
        let event = CompletionEvent::new(ActionKind::Addon(Addon::InteriorClean), customer());
        assert_eq!(
            event.message(),
            "--> InteriorClean addon performed for customer 123456!"
        );
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.record(CompletionEvent::new(ActionKind::Wash(WashTier::Basic), customer()));
        sink.record(CompletionEvent::new(ActionKind::Addon(Addon::TireShine), customer()));

        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.actions(),
            vec![
                ActionKind::Wash(WashTier::Basic),
                ActionKind::Addon(Addon::TireShine)
            ]
        );
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let event = CompletionEvent::new(ActionKind::Addon(Addon::TireShine), customer());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"]["kind"], "addon");
        assert_eq!(json["action"]["action"], "TireShine");
        assert_eq!(json["customer_id"], 123456);
    }
}
