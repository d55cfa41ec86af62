//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! request handlers: seat players, send actions, query state or stream events
//! from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use adrenaline_core::{
    ActionEnvelope, ActionOutcome, ActionSet, GameSnapshot, PlayerColor, PowerupCard,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends one command and waits for the worker's reply.
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Seat a player in the lobby
    pub async fn add_player(&self, nickname: impl Into<String>, color: PlayerColor) -> Result<()> {
        let nickname = nickname.into();
        self.request(|reply| Command::AddPlayer {
            nickname,
            color,
            reply,
        })
        .await?
    }

    /// Close the lobby and open the first turn
    pub async fn start(&self) -> Result<GameSnapshot> {
        self.request(|reply| Command::Start { reply }).await?
    }

    /// Execute an action on behalf of `envelope.sender`
    ///
    /// Rejections come back as [`RuntimeError::Action`]; the game is left as
    /// it was.
    pub async fn execute_action(&self, envelope: ActionEnvelope) -> Result<ActionOutcome> {
        self.request(|reply| Command::Action { envelope, reply })
            .await?
    }

    /// Actions `color` may send right now
    pub async fn possible_actions(&self, color: PlayerColor) -> Result<ActionSet> {
        self.request(|reply| Command::PossibleActions { color, reply })
            .await?
    }

    /// The powerups in `color`'s hand, which snapshots only count
    pub async fn powerups(&self, color: PlayerColor) -> Result<Vec<PowerupCard>> {
        self.request(|reply| Command::Powerups { color, reply })
            .await?
    }

    pub async fn disconnect(&self, color: PlayerColor) -> Result<()> {
        self.request(|reply| Command::Disconnect { color, reply })
            .await?
    }

    pub async fn reconnect(&self, color: PlayerColor) -> Result<()> {
        self.request(|reply| Command::Reconnect { color, reply })
            .await?
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameSnapshot> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Executed and rejected actions, end of game
    /// - `Topic::Turn` - Turn owner changes
    /// - `Topic::Lobby` - Seating, start and connection changes
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use adrenaline_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Prompt the new turn owner
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
