//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{GameStateEvent, LobbyEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Executed and rejected actions, end of game
    GameState,
    /// Turn owner changes
    Turn,
    /// Seating, start and connection changes
    Lobby,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    GameState(GameStateEvent),
    Turn(TurnEvent),
    Lobby(LobbyEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::GameState(_) => Topic::GameState,
            Event::Turn(_) => Topic::Turn,
            Event::Lobby(_) => Topic::Lobby,
        }
    }
}

/// Topic-based event bus
///
/// One broadcast channel per topic. Publishing never blocks: events sent
/// while nobody listens are dropped, and slow subscribers see `Lagged`.
#[derive(Clone)]
pub struct EventBus {
    game_state: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    lobby: broadcast::Sender<Event>,
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
            game_state: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            lobby: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::GameState => &self.game_state,
            Topic::Turn => &self.turn,
            Topic::Lobby => &self.lobby,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
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
    use adrenaline_core::PlayerColor;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut turns = bus.subscribe(Topic::Turn);
        let mut lobby = bus.subscribe(Topic::Lobby);

        bus.publish(Event::Turn(TurnEvent {
            owner: PlayerColor::Blue,
            nonce: 3,
        }));

        let Event::Turn(event) = turns.recv().await.unwrap() else {
            panic!("expected a turn event");
        };
        assert_eq!(event.owner, PlayerColor::Blue);
        assert!(lobby.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Lobby(LobbyEvent::PlayerDisconnected {
            color: PlayerColor::Grey,
        }));
    }
}
