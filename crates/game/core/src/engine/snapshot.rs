//! Immutable, client-facing view of a game.
//!
//! Hands are summarised for everyone except their holder: weapons are public
//! once picked, powerups are only counted.

use crate::cards::{AmmoTile, WeaponState};
use crate::state::{
    Actor, AmmoQuantity, GameContext, KillToken, PhaseState, PlayerColor, PlayerPosition,
    SquareContent, UserPlayer,
};

use super::GameStatus;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub nonce: u64,
    pub status: GameStatus,
    pub turn_owner: Option<PlayerColor>,
    pub first_player: Option<PlayerColor>,
    pub frenzy: bool,
    pub skulls: u8,
    pub kill_tokens: Vec<KillToken>,
    pub players: Vec<PlayerView>,
    pub terminator: Option<ActorView>,
    pub squares: Vec<SquareView>,
}

/// Public part of any actor's board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorView {
    pub nickname: String,
    pub color: PlayerColor,
    pub position: Option<PlayerPosition>,
    pub damage: Vec<PlayerColor>,
    pub marks: Vec<PlayerColor>,
    pub ammo: AmmoQuantity,
    pub skulls: u8,
    pub flipped: bool,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub actor: ActorView,
    pub weapons: Vec<WeaponView>,
    pub powerup_count: usize,
    pub phase: PhaseState,
    pub connected: bool,
    pub first_player: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponView {
    pub name: String,
    pub state: WeaponState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareView {
    pub position: PlayerPosition,
    /// Tile squares only.
    pub ammo_tile: Option<AmmoTile>,
    /// Spawn squares only: weapon names on sale.
    pub weapons: Vec<String>,
}

impl GameSnapshot {
    pub(super) fn capture(ctx: &GameContext, status: GameStatus, nonce: u64) -> Self {
        let squares = ctx
            .board
            .iter()
            .map(|(position, content)| match content {
                SquareContent::Tile(tile) => SquareView {
                    position,
                    ammo_tile: tile.clone(),
                    weapons: Vec::new(),
                },
                SquareContent::Spawn(weapons) => SquareView {
                    position,
                    ammo_tile: None,
                    weapons: weapons.iter().map(|weapon| weapon.name().to_owned()).collect(),
                },
            })
            .collect();

        Self {
            nonce,
            status,
            turn_owner: ctx.turn_owner(),
            first_player: ctx.turns.first_player(),
            frenzy: ctx.turns.is_frenzy(),
            skulls: ctx.kill_shots.skulls(),
            kill_tokens: ctx.kill_shots.tokens().to_vec(),
            players: ctx.players.iter().map(PlayerView::of).collect(),
            terminator: ctx
                .terminator
                .as_ref()
                .map(|terminator| ActorView::of(&terminator.actor)),
            squares,
        }
    }

    pub fn player(&self, color: PlayerColor) -> Option<&PlayerView> {
        self.players
            .iter()
            .find(|player| player.actor.color == color)
    }
}

impl ActorView {
    fn of(actor: &Actor) -> Self {
        Self {
            nickname: actor.nickname.clone(),
            color: actor.color,
            position: actor.position,
            damage: actor.board.damage().to_vec(),
            marks: actor.board.marks().to_vec(),
            ammo: actor.board.ammo(),
            skulls: actor.board.skulls(),
            flipped: actor.board.is_flipped(),
            points: actor.points,
        }
    }
}

impl PlayerView {
    fn of(player: &UserPlayer) -> Self {
        Self {
            actor: ActorView::of(&player.actor),
            weapons: player
                .hand
                .weapons
                .iter()
                .map(|weapon| WeaponView {
                    name: weapon.name().to_owned(),
                    state: weapon.state(),
                })
                .collect(),
            powerup_count: player.hand.powerups.len(),
            phase: player.phase(),
            connected: player.connected,
            first_player: player.first_player,
        }
    }
}
