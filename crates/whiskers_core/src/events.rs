//! Per-cat event stream.
//!
//! Every state change, behavior change and lifecycle transition of a cat goes
//! through its [`EventAggregator`], which re-tags it with the cat id, hands it
//! to subscribers synchronously and queues it for polling consumers. Both paths
//! see events in emission order.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc;
use uuid::Uuid;
use whiskers_data::{Behavior, CatStateType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatEventKind {
    StateChanged {
        from: CatStateType,
        to: CatStateType,
        duration_ms: u32,
        /// Set when an unreachable request was redirected to idle.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        requested: Option<CatStateType>,
    },
    BehaviorChanged {
        from: Behavior,
        to: Behavior,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Uuid>,
    },
    Paused,
    Resumed,
    Destroyed,
}

impl CatEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            CatEventKind::StateChanged { .. } => "state_changed",
            CatEventKind::BehaviorChanged { .. } => "behavior_changed",
            CatEventKind::Paused => "paused",
            CatEventKind::Resumed => "resumed",
            CatEventKind::Destroyed => "destroyed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatEvent {
    pub cat_id: Uuid,
    /// Cat-local tick the event was emitted on.
    pub tick: u64,
    pub timestamp: String,
    #[serde(flatten)]
    pub kind: CatEventKind,
}

/// Receiver of a cat's events.
pub trait EventSink: Send {
    fn deliver(&mut self, event: &CatEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&CatEvent) + Send,
{
    fn deliver(&mut self, event: &CatEvent) {
        self(event)
    }
}

/// Forwards events into a standard channel.
pub struct ChannelSink(pub mpsc::Sender<CatEvent>);

impl EventSink for ChannelSink {
    fn deliver(&mut self, event: &CatEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.0.send(event.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct EventAggregator {
    cat_id: Uuid,
    queue: VecDeque<CatEvent>,
    subscribers: Vec<(SubscriptionId, Box<dyn EventSink>)>,
    next_subscription: u64,
    emitted: u64,
}

impl fmt::Debug for EventAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventAggregator")
            .field("cat_id", &self.cat_id)
            .field("queued", &self.queue.len())
            .field("subscribers", &self.subscribers.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

impl EventAggregator {
    pub fn new(cat_id: Uuid) -> Self {
        Self {
            cat_id,
            queue: VecDeque::with_capacity(16),
            subscribers: Vec::new(),
            next_subscription: 0,
            emitted: 0,
        }
    }

    pub fn cat_id(&self) -> Uuid {
        self.cat_id
    }

    pub fn emit(&mut self, tick: u64, kind: CatEventKind) {
        let event = CatEvent {
            cat_id: self.cat_id,
            tick,
            timestamp: Utc::now().to_rfc3339(),
            kind,
        };
        for (_, sink) in &mut self.subscribers {
            sink.deliver(&event);
        }
        self.queue.push_back(event);
        self.emitted += 1;
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(sink)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn clear_listeners(&mut self) {
        self.subscribers.clear();
    }

    /// Total events emitted over the cat's lifetime.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn peek(&self) -> impl Iterator<Item = &CatEvent> {
        self.queue.iter()
    }

    /// Removes queued events in FIFO order.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, CatEvent> {
        self.queue.drain(..)
    }
}
