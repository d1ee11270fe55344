//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tickvisor::{Event, EventKind, Subscribe, SubscriberSet};

/// Subscriber that keeps every event it receives.
#[derive(Default)]
pub struct RecordingSubscriber {
    events: Mutex<Vec<Event>>,
}

impl RecordingSubscriber {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscriber set containing only this recorder.
    pub fn set(self: &Arc<Self>) -> SubscriberSet {
        let sub: Arc<dyn Subscribe> = self.clone();
        SubscriberSet::new(vec![sub])
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn of_kind(&self, kind: EventKind) -> Vec<Event> {
        self.events().into_iter().filter(|e| e.kind == kind).collect()
    }

    /// Task names of events of `kind`, sorted.
    pub fn tasks_of(&self, kind: EventKind) -> Vec<String> {
        let mut names: Vec<String> = self
            .of_kind(kind)
            .into_iter()
            .filter_map(|e| e.task.map(|t| t.to_string()))
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl Subscribe for RecordingSubscriber {
    async fn on_event(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
