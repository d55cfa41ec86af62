//! Authoritative game state representation.
//!
//! [`GameContext`] is the one explicit owner of everything an action reads or
//! mutates. Actions receive it by reference; there is no global game.
mod actor;
mod board;
mod kill_shot;
mod phase;
mod player_board;
mod turn;
pub mod types;

pub use actor::{Actor, Hand, Terminator, UserPlayer};
pub use board::{BoardState, SquareContent};
pub use kill_shot::{KILL_TRACK_POINTS, KILL_TRACK_TAIL, KillShotTrack, KillToken};
pub use phase::{PhaseState, RoundState};
pub use player_board::{AmmoError, Adrenaline, FRENZY_POINTS, NORMAL_POINTS, PlayerBoard};
pub use turn::{FrenzyMode, TurnManager};
pub use types::{
    AmmoColor, AmmoQuantity, Direction, GeometryError, PlayerColor, PlayerPosition, RoomColor,
};

use crate::cards::Decks;
use crate::config::GameConfig;
use crate::env::GameMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameContext {
    pub config: GameConfig,
    pub map: GameMap,
    pub board: BoardState,
    pub players: Vec<UserPlayer>,
    pub terminator: Option<Terminator>,
    pub decks: Decks,
    pub kill_shots: KillShotTrack,
    pub turns: TurnManager,
}

impl GameContext {
    pub fn new(config: GameConfig, map: GameMap, decks: Decks) -> Self {
        Self {
            board: BoardState::new(&map),
            kill_shots: KillShotTrack::new(config.kill_shots),
            config,
            map,
            players: Vec::new(),
            terminator: None,
            decks,
            turns: TurnManager::default(),
        }
    }

    pub fn player(&self, color: PlayerColor) -> Option<&UserPlayer> {
        self.players.iter().find(|player| player.color() == color)
    }

    pub fn player_mut(&mut self, color: PlayerColor) -> Option<&mut UserPlayer> {
        self.players.iter_mut().find(|player| player.color() == color)
    }

    /// Any actor on the board, human or Terminator.
    pub fn actor(&self, color: PlayerColor) -> Option<&Actor> {
        self.actors().find(|actor| actor.color == color)
    }

    pub fn actor_mut(&mut self, color: PlayerColor) -> Option<&mut Actor> {
        if self.is_terminator(color) {
            return self.terminator.as_mut().map(|terminator| &mut terminator.actor);
        }
        self.player_mut(color).map(|player| &mut player.actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.players
            .iter()
            .map(|player| &player.actor)
            .chain(self.terminator.as_ref().map(|terminator| &terminator.actor))
    }

    /// Every actor with its current square, as the targeting validator wants it.
    pub fn positions(&self) -> Vec<(PlayerColor, Option<PlayerPosition>)> {
        self.actors()
            .map(|actor| (actor.color, actor.position))
            .collect()
    }

    pub fn position_of(&self, color: PlayerColor) -> Option<PlayerPosition> {
        self.actor(color).and_then(|actor| actor.position)
    }

    /// Puts an actor on `position`.
    pub fn place(&mut self, color: PlayerColor, position: PlayerPosition) {
        if let Some(actor) = self.actor_mut(color) {
            actor.position = Some(position);
        }
    }

    pub fn turn_owner(&self) -> Option<PlayerColor> {
        self.turns.turn_owner()
    }

    pub fn terminator_color(&self) -> Option<PlayerColor> {
        self.terminator.as_ref().map(|terminator| terminator.actor.color)
    }

    pub fn is_terminator(&self, color: PlayerColor) -> bool {
        self.terminator_color() == Some(color)
    }

    /// Whether the Terminator is on the board and able to act.
    pub fn terminator_present(&self) -> bool {
        self.terminator
            .as_ref()
            .is_some_and(|terminator| terminator.actor.is_spawned())
    }

    /// Draws a powerup into `color`'s hand, ignoring the hand limit.
    pub fn draw_powerup(&mut self, color: PlayerColor) -> bool {
        let Some(card) = self.decks.powerups.draw() else {
            return false;
        };
        match self.player_mut(color) {
            Some(player) => {
                player.hand.powerups.push(card);
                true
            }
            None => {
                self.decks.powerups.discard(card);
                false
            }
        }
    }
}
