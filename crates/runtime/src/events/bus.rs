//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{CombatEvent, EffectEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Player actions: fights, heals, item use, revives
    Combat,
    /// Status-effect lifecycle and ticks
    Effects,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Effects(EffectEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Effects(_) => Topic::Effects,
        }
    }
}

struct Channels {
    combat: broadcast::Sender<Event>,
    effects: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Effects => &self.effects,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: slow subscribers lag
/// and drop old events instead of blocking the publisher.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                combat: broadcast::channel(capacity).0,
                effects: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gotvalis_core::{EntityId, StatusEffectKind};

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut effects = bus.subscribe(Topic::Effects);
        let mut combat = bus.subscribe(Topic::Combat);

        bus.publish(Event::Effects(EffectEvent::Removed {
            entity: EntityId::new("a"),
            kind: StatusEffectKind::Burn,
        }));

        assert!(matches!(
            effects.recv().await.unwrap(),
            Event::Effects(EffectEvent::Removed { .. })
        ));
        assert!(combat.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Effects(EffectEvent::Expired {
            entity: EntityId::new("a"),
            kinds: vec![StatusEffectKind::Poison],
        }));
    }
}
