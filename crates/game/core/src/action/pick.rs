use crate::env::SquareKind;
use crate::state::{GameContext, PlayerColor, PlayerPosition};

use super::payment::{PaymentPlan, plan_for, settle};
use super::{
    ActionError, ActionKind, ActionTransition, InvalidReason, Payment, Rejection,
    StructuralError, check_movement, spawned_position,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickRequest {
    /// Square to pick on; `None` picks where the player stands.
    pub moving_position: Option<PlayerPosition>,
    /// Slot of the weapon to buy on a spawn square.
    pub weapon: Option<usize>,
    /// Hand slot of the weapon left behind when the hand is full.
    pub discard: Option<usize>,
    pub payment: Payment,
}

/// Move, then collect the ammo tile or buy a weapon on the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickAction {
    actor: PlayerColor,
    kind: ActionKind,
    request: PickRequest,
}

/// What validation resolved for [`PickAction::execute`].
enum PickPlan {
    Tile,
    Weapon(PaymentPlan),
}

impl PickAction {
    pub fn new(
        actor: PlayerColor,
        kind: ActionKind,
        request: PickRequest,
    ) -> Result<Self, StructuralError> {
        if !kind.is_pick() {
            return Err(StructuralError::IncompatibleAction {
                expected: ActionKind::MoveAndPick,
                got: kind,
            });
        }
        Ok(Self {
            actor,
            kind,
            request,
        })
    }

    fn plan(&self, ctx: &GameContext) -> Result<(PlayerPosition, PickPlan), ActionError> {
        let from = spawned_position(ctx, self.actor)?;
        let destination = self.request.moving_position.unwrap_or(from);
        let square = ctx
            .map
            .square(destination)
            .ok_or(Rejection::OutOfMap(destination))?;

        match square.kind() {
            SquareKind::Tile => {
                if !ctx.board.is_ammo_tile_present(destination) {
                    return Err(InvalidReason::NoAmmoTile.into());
                }
                check_movement(ctx, self.kind, from, destination)?;
                if self.request.weapon.is_some()
                    || self.request.discard.is_some()
                    || !self.request.payment.powerups.is_empty()
                {
                    return Err(InvalidReason::WrongSquareKind.into());
                }
                Ok((destination, PickPlan::Tile))
            }
            SquareKind::Spawn => {
                check_movement(ctx, self.kind, from, destination)?;
                let player = ctx
                    .player(self.actor)
                    .ok_or(StructuralError::UnknownPlayer(self.actor))?;

                let weapon = self
                    .request
                    .weapon
                    .and_then(|index| ctx.board.weapon(destination, index))
                    .ok_or(InvalidReason::NothingToPick)?;

                let hand = &player.hand.weapons;
                match (hand.is_full(), self.request.discard) {
                    (true, None) => return Err(Rejection::MaxCardsInHand.into()),
                    (true, Some(index)) if index >= hand.len() => {
                        return Err(StructuralError::HandIndexOutOfBounds {
                            index,
                            len: hand.len(),
                        }
                        .into());
                    }
                    (false, Some(_)) => return Err(InvalidReason::UnneededDiscard.into()),
                    _ => {}
                }

                let payment = plan_for(
                    ctx,
                    self.actor,
                    weapon.recharge_cost(),
                    &self.request.payment,
                    &[],
                )?;
                Ok((destination, PickPlan::Weapon(payment)))
            }
        }
    }
}

impl ActionTransition for PickAction {
    type Output = ();

    fn actor(&self) -> PlayerColor {
        self.actor
    }

    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError> {
        self.plan(ctx).map(|_| ())
    }

    fn execute(&self, ctx: &mut GameContext) -> Result<(), ActionError> {
        let (destination, plan) = self.plan(ctx)?;
        ctx.place(self.actor, destination);

        match plan {
            PickPlan::Tile => {
                let Some(tile) = ctx.board.take_ammo_tile(destination) else {
                    return Err(InvalidReason::NoAmmoTile.into());
                };
                let draw = {
                    let player = ctx
                        .player_mut(self.actor)
                        .ok_or(StructuralError::UnknownPlayer(self.actor))?;
                    player.actor.board.add_ammo_quantity(&tile.quantity());
                    tile.grants_powerup() && player.hand.can_draw_powerup()
                };
                if draw {
                    ctx.draw_powerup(self.actor);
                }
                ctx.decks.ammo_tiles.discard(tile);
            }
            PickPlan::Weapon(payment) => {
                settle(ctx, self.actor, &payment)?;
                let index = self.request.weapon.unwrap_or_default();
                let Some(mut weapon) = ctx.board.take_weapon(destination, index) else {
                    return Err(InvalidReason::NothingToPick.into());
                };
                weapon.recharge()?;

                let player = ctx
                    .player_mut(self.actor)
                    .ok_or(StructuralError::UnknownPlayer(self.actor))?;
                let weapons = &mut player.hand.weapons;
                let dropped = self
                    .request
                    .discard
                    .and_then(|index| (index < weapons.len()).then(|| weapons.remove(index)));
                weapons.push(weapon);

                if let Some(dropped) = dropped
                    && !ctx.board.put_weapon(destination, dropped)
                {
                    return Err(StructuralError::NoRoomForWeapon(destination).into());
                }
            }
        }
        Ok(())
    }
}
