use crate::cards::{PowerupCard, PowerupKind};
use crate::config::GameConfig;
use crate::env::MovementRules;
use crate::state::{GameContext, PlayerColor, PlayerPosition};

use super::{
    ActionError, ActionKind, ActionTransition, InvalidReason, Rejection, StructuralError,
    spawned_position,
};

/// Squares a Newton push may cover.
const NEWTON_RANGE: (u32, u32) = (1, 2);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerupRequest {
    /// Hand slot of the card played.
    pub powerup: usize,
    /// Player pushed by a Newton.
    pub target: Option<PlayerColor>,
    /// Landing square of a Newton push or a teleport.
    pub destination: Option<PlayerPosition>,
}

/// Plays a Newton or a Teleporter on the owner's turn, or a tagback grenade
/// right after being shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerupAction {
    actor: PlayerColor,
    request: PowerupRequest,
}

/// Board change a validated powerup makes.
enum PowerupEffect {
    Move {
        who: PlayerColor,
        to: PlayerPosition,
    },
    Mark {
        owner: PlayerColor,
    },
}

impl PowerupAction {
    pub fn new(actor: PlayerColor, request: PowerupRequest) -> Self {
        Self { actor, request }
    }

    fn card(&self, ctx: &GameContext) -> Result<PowerupCard, ActionError> {
        let player = ctx
            .player(self.actor)
            .ok_or(StructuralError::UnknownPlayer(self.actor))?;
        player
            .hand
            .powerups
            .get(self.request.powerup)
            .copied()
            .ok_or_else(|| {
                StructuralError::HandIndexOutOfBounds {
                    index: self.request.powerup,
                    len: player.hand.powerups.len(),
                }
                .into()
            })
    }

    fn plan(&self, ctx: &GameContext) -> Result<PowerupEffect, ActionError> {
        let card = self.card(ctx)?;
        let own = spawned_position(ctx, self.actor)?;
        let owner = ctx.turn_owner();

        match card.kind {
            PowerupKind::TargetingScope => Err(InvalidReason::ScopeOutsideShoot.into()),
            PowerupKind::Teleporter => {
                if owner != Some(self.actor) {
                    return Err(Rejection::NotYourTurn(self.actor).into());
                }
                if self.request.target.is_some() {
                    return Err(InvalidReason::WrongPowerup.into());
                }
                let to = self.request.destination.ok_or(InvalidReason::WrongPowerup)?;
                if !ctx.map.contains(to) {
                    return Err(Rejection::OutOfMap(to).into());
                }
                Ok(PowerupEffect::Move {
                    who: self.actor,
                    to,
                })
            }
            PowerupKind::Newton => {
                if owner != Some(self.actor) {
                    return Err(Rejection::NotYourTurn(self.actor).into());
                }
                let (Some(who), Some(to)) = (self.request.target, self.request.destination) else {
                    return Err(InvalidReason::WrongPowerup.into());
                };
                if who == self.actor {
                    return Err(InvalidReason::WrongPowerup.into());
                }
                let from = spawned_position(ctx, who)?;
                push(ctx, from, to)?;
                Ok(PowerupEffect::Move { who, to })
            }
            PowerupKind::TagbackGrenade => {
                let owner = owner.ok_or(Rejection::GameNotRunning)?;
                if owner == self.actor {
                    return Err(InvalidReason::WrongPowerup.into());
                }
                if self.request.target.is_some_and(|target| target != owner)
                    || self.request.destination.is_some()
                {
                    return Err(InvalidReason::WrongPowerup.into());
                }
                if !ctx.turns.damaged().contains(&self.actor) {
                    return Err(InvalidReason::NotDamaged.into());
                }
                let at = spawned_position(ctx, owner)?;
                if !ctx.map.is_visible(own, at) {
                    return Err(InvalidReason::TargetNotVisible.into());
                }
                Ok(PowerupEffect::Mark { owner })
            }
        }
    }
}

/// Checks a Newton push of one or two squares in a straight line.
fn push(ctx: &GameContext, from: PlayerPosition, to: PlayerPosition) -> Result<(), ActionError> {
    if !ctx.map.contains(to) {
        return Err(Rejection::OutOfMap(to).into());
    }
    let direction = from
        .direction_to(to)
        .map_err(|_| InvalidReason::NotAligned)?;
    let distance = from.distance_of(to);
    let (min, max) = NEWTON_RANGE;
    if distance < min || distance > max {
        return Err(InvalidReason::MovementOutOfRange { distance, min, max }.into());
    }

    if ctx.config.movement == MovementRules::WallAware {
        let mut at = from;
        while at != to {
            at = ctx
                .map
                .neighbour(at, direction)
                .ok_or(InvalidReason::Unreachable)?;
        }
    }
    Ok(())
}

impl ActionTransition for PowerupAction {
    type Output = PowerupKind;

    fn actor(&self) -> PlayerColor {
        self.actor
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Powerup
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError> {
        self.plan(ctx).map(|_| ())
    }

    fn execute(&self, ctx: &mut GameContext) -> Result<PowerupKind, ActionError> {
        let effect = self.plan(ctx)?;
        let card = self.card(ctx)?;

        match effect {
            PowerupEffect::Move { who, to } => ctx.place(who, to),
            PowerupEffect::Mark { owner } => {
                if let Some(actor) = ctx.actor_mut(owner)
                    && actor.board.marks_by(self.actor) < GameConfig::MAX_MARKS_PER_DEALER
                {
                    actor.board.add_mark(self.actor, 1);
                }
                ctx.turns.remove_damaged(self.actor);
            }
        }

        if let Some(player) = ctx.player_mut(self.actor) {
            for spent in player.hand.take_powerups(&[self.request.powerup]) {
                ctx.decks.powerups.discard(spent);
            }
        }
        Ok(card.kind)
    }
}
