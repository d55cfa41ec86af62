//! Game worker that owns the authoritative [`adrenaline_core::Game`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them one at a time
//! and publishes what happened to the [`EventBus`]. A command is fully applied,
//! turn advance included, before the next one is read, so state queries never
//! observe a half-finished action.

use tokio::sync::{mpsc, oneshot};

use adrenaline_core::{
    ActionEnvelope, ActionOutcome, ActionSet, Game, GameError, GameSnapshot, GameStatus,
    PlayerColor, PowerupCard, StructuralError,
};
use tracing::{debug, error, info, warn};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, GameStateEvent, LobbyEvent, TurnEvent};

/// Commands that can be sent to the game worker
pub enum Command {
    /// Seat a player in the lobby.
    AddPlayer {
        nickname: String,
        color: PlayerColor,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Close the lobby and open the first turn.
    Start {
        reply: oneshot::Sender<Result<GameSnapshot>>,
    },
    /// Run one player action.
    Action {
        envelope: ActionEnvelope,
        reply: oneshot::Sender<Result<ActionOutcome>>,
    },
    /// Actions currently offered to a player.
    PossibleActions {
        color: PlayerColor,
        reply: oneshot::Sender<Result<ActionSet>>,
    },
    /// A player's own powerup hand.
    Powerups {
        color: PlayerColor,
        reply: oneshot::Sender<Result<Vec<PowerupCard>>>,
    },
    Disconnect {
        color: PlayerColor,
        reply: oneshot::Sender<Result<()>>,
    },
    Reconnect {
        color: PlayerColor,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the current game state (read-only).
    QueryState {
        reply: oneshot::Sender<GameSnapshot>,
    },
}

/// Background task that processes gameplay commands.
pub struct GameWorker {
    game: Game,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl GameWorker {
    /// Creates a new game worker.
    pub fn new(game: Game, command_rx: mpsc::Receiver<Command>, event_bus: EventBus) -> Self {
        info!(
            "GameWorker initialized with {} squares, kill shots: {}",
            game.context().map.squares().count(),
            game.context().config.kill_shots
        );

        Self {
            game,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("GameWorker command channel closed, stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::AddPlayer {
                nickname,
                color,
                reply,
            } => {
                let result = self.handle_add_player(nickname, color);
                if reply.send(result).is_err() {
                    debug!("AddPlayer reply channel closed (caller dropped)");
                }
            }
            Command::Start { reply } => {
                let result = self.handle_start();
                if reply.send(result).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::Action { envelope, reply } => {
                let result = self.handle_action(envelope);
                if reply.send(result).is_err() {
                    debug!("Action reply channel closed (caller dropped)");
                }
            }
            Command::PossibleActions { color, reply } => {
                let result = self
                    .game
                    .possible_actions(color)
                    .ok_or_else(|| unknown_player(color));
                if reply.send(result).is_err() {
                    debug!("PossibleActions reply channel closed (caller dropped)");
                }
            }
            Command::Powerups { color, reply } => {
                let result = self
                    .game
                    .powerups(color)
                    .map(<[PowerupCard]>::to_vec)
                    .ok_or_else(|| unknown_player(color));
                if reply.send(result).is_err() {
                    debug!("Powerups reply channel closed (caller dropped)");
                }
            }
            Command::Disconnect { color, reply } => {
                let result = self.handle_connection(color, false);
                if reply.send(result).is_err() {
                    debug!("Disconnect reply channel closed (caller dropped)");
                }
            }
            Command::Reconnect { color, reply } => {
                let result = self.handle_connection(color, true);
                if reply.send(result).is_err() {
                    debug!("Reconnect reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.game.snapshot()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_add_player(&mut self, nickname: String, color: PlayerColor) -> Result<()> {
        if let Err(e) = self.game.add_player(nickname.clone(), color) {
            warn!(%color, code = e.error_code(), "Player not seated: {}", e);
            return Err(e.into());
        }

        info!(%color, "{} joined the game", nickname);
        self.event_bus
            .publish(Event::Lobby(LobbyEvent::PlayerJoined { nickname, color }));
        Ok(())
    }

    fn handle_start(&mut self) -> Result<GameSnapshot> {
        if let Err(e) = self.game.start() {
            warn!(code = e.error_code(), "Game not started: {}", e);
            return Err(e.into());
        }

        let snapshot = self.game.snapshot();
        if let Some(first_player) = snapshot.first_player {
            info!(%first_player, players = snapshot.players.len(), "Game started");
            self.event_bus
                .publish(Event::Lobby(LobbyEvent::GameStarted { first_player }));
        }
        self.publish_turn_change(None);
        Ok(snapshot)
    }

    /// Runs one action and publishes its outcome.
    fn handle_action(&mut self, envelope: ActionEnvelope) -> Result<ActionOutcome> {
        let owner_before = self.game.turn_owner();
        let status_before = self.game.status();
        let ActionEnvelope { sender, kind, .. } = envelope;

        match self.game.handle(&envelope) {
            Ok(outcome) => {
                info!(
                    %sender,
                    %kind,
                    nonce = outcome.nonce,
                    "Action executed: {:?}",
                    outcome.effect
                );
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionExecuted {
                        sender,
                        kind,
                        nonce: outcome.nonce,
                        effect: outcome.effect.clone(),
                    }));
                self.after_change(owner_before, status_before);
                Ok(outcome)
            }
            Err(e) => {
                let severity = e.severity();
                if severity.is_internal() {
                    error!(%sender, %kind, code = e.error_code(), "Malformed action: {}", e);
                } else {
                    warn!(
                        %sender,
                        %kind,
                        code = e.error_code(),
                        severity = severity.as_str(),
                        "Action rejected: {}",
                        e
                    );
                }
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionRejected {
                        sender,
                        kind,
                        code: e.error_code().to_owned(),
                        error: e.to_string(),
                    }));
                Err(e.into())
            }
        }
    }

    fn handle_connection(&mut self, color: PlayerColor, connected: bool) -> Result<()> {
        let owner_before = self.game.turn_owner();
        let status_before = self.game.status();
        let result = if connected {
            self.game.reconnect(color)
        } else {
            self.game.disconnect(color)
        };
        if let Err(e) = result {
            error!(%color, code = e.error_code(), "Connection change failed: {}", e);
            return Err(e.into());
        }

        let event = if connected {
            info!(%color, "Player reconnected");
            LobbyEvent::PlayerReconnected { color }
        } else {
            info!(%color, "Player disconnected");
            LobbyEvent::PlayerDisconnected { color }
        };
        self.event_bus.publish(Event::Lobby(event));
        self.after_change(owner_before, status_before);
        Ok(())
    }

    /// Publishes the turn change and the end of game a command may have caused.
    fn after_change(&self, owner_before: Option<PlayerColor>, status_before: GameStatus) {
        self.publish_turn_change(owner_before);

        if status_before != GameStatus::Ended && self.game.status() == GameStatus::Ended {
            self.publish_game_end();
        }
    }

    fn publish_turn_change(&self, owner_before: Option<PlayerColor>) {
        let owner = self.game.turn_owner();
        if owner == owner_before || !self.game.is_running() {
            return;
        }
        if let Some(owner) = owner {
            info!(%owner, nonce = self.game.nonce(), "Turn changed");
            self.event_bus.publish(Event::Turn(TurnEvent {
                owner,
                nonce: self.game.nonce(),
            }));
        }
    }

    fn publish_game_end(&self) {
        let standings = self.game.standings().to_vec();
        if let Some(winner) = standings.first() {
            info!(winner = %winner.color, points = winner.points, "Game ended");
        }
        self.event_bus
            .publish(Event::GameState(GameStateEvent::GameEnded { standings }));
    }
}

fn unknown_player(color: PlayerColor) -> RuntimeError {
    RuntimeError::Action(StructuralError::UnknownPlayer(color).into())
}
