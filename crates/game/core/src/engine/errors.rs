//! Error types for the lobby phase of a game.

use crate::error::{ErrorSeverity, GameError};
use crate::state::PlayerColor;

/// Errors surfaced while seating players and starting a game.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("game has already started")]
    AlreadyStarted,

    #[error("game is full ({max} players)")]
    GameFull { max: usize },

    #[error("at least {required} players are needed, found {found}")]
    NotEnoughPlayers { found: usize, required: usize },

    #[error("nickname must not be empty")]
    EmptyNickname,

    #[error("nickname '{0}' is already taken")]
    NicknameTaken(String),

    #[error("colour {0} is already taken")]
    ColorTaken(PlayerColor),

    #[error("map has no spawn square for the terminator")]
    NoTerminatorSpawn,
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoTerminatorSpawn => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyStarted => "SETUP_ALREADY_STARTED",
            Self::GameFull { .. } => "SETUP_GAME_FULL",
            Self::NotEnoughPlayers { .. } => "SETUP_NOT_ENOUGH_PLAYERS",
            Self::EmptyNickname => "SETUP_EMPTY_NICKNAME",
            Self::NicknameTaken(_) => "SETUP_NICKNAME_TAKEN",
            Self::ColorTaken(_) => "SETUP_COLOR_TAKEN",
            Self::NoTerminatorSpawn => "SETUP_NO_TERMINATOR_SPAWN",
        }
    }
}
