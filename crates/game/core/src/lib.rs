//! Rules of Adrenaline, with no I/O.
//!
//! `adrenaline-core` holds the board topology, player boards, cards, the
//! targeting validator, one transition per player verb and the turn/phase
//! machine. A match is driven through [`engine::Game`], which owns the
//! [`state::GameContext`]; the runtime and front-ends only see requests,
//! outcomes and snapshots.
pub mod action;
pub mod cards;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

#[cfg(test)]
mod testing;

pub use action::{
    ActionEnvelope, ActionError, ActionKind, ActionRequest, ActionSet, ActionTransition,
    InvalidReason, Rejection, StructuralError,
};
pub use cards::{AmmoTile, Deck, Decks, PowerupCard, PowerupKind, WeaponCard, WeaponState};
pub use config::GameConfig;
pub use engine::{ActionEffect, ActionOutcome, Game, GameSnapshot, GameStatus, SetupError, Standing};
pub use env::{GameMap, MapError, MovementRules};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    AmmoColor, AmmoQuantity, GameContext, PhaseState, PlayerColor, PlayerPosition, RoomColor,
};
