//! Index change notifications.

use std::sync::mpsc;

/// A change to the index, delivered to subscribers after the mutation
/// has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An entity was indexed or re-indexed.
    Indexed {
        /// Engine id of the entity.
        id: String,
    },
    /// An entity was removed.
    Removed {
        /// Engine id of the entity.
        id: String,
    },
    /// The whole index was cleared.
    Cleared,
}

/// Fans events out to subscriber channels.
///
/// Subscribers that dropped their receiver are pruned on the next emit.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::Sender<EngineEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> mpsc::Receiver<EngineEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: EngineEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
