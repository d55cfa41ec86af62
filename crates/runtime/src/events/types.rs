//! Event types for different topics.

use adrenaline_core::{ActionEffect, ActionKind, PlayerColor, Standing};
use serde::{Deserialize, Serialize};

/// Events related to game state changes (actions, failures)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// An action was executed; `nonce` is the game nonce after it.
    ActionExecuted {
        sender: PlayerColor,
        kind: ActionKind,
        nonce: u64,
        effect: ActionEffect,
    },

    /// The game refused an action and nothing changed.
    ActionRejected {
        sender: PlayerColor,
        kind: ActionKind,
        /// Stable error code of the rejection.
        code: String,
        error: String,
    },

    /// Final scoring is done.
    GameEnded { standings: Vec<Standing> },
}

/// Events related to turn management (lightweight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Player whose turn just opened
    pub owner: PlayerColor,
    pub nonce: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LobbyEvent {
    PlayerJoined { nickname: String, color: PlayerColor },
    GameStarted { first_player: PlayerColor },
    PlayerDisconnected { color: PlayerColor },
    PlayerReconnected { color: PlayerColor },
}
