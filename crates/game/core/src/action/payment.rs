//! Paying ammo costs with ammo cubes and powerup cards.

use std::collections::BTreeSet;

use crate::cards::PowerupCard;
use crate::state::{AmmoError, AmmoQuantity, GameContext, PlayerColor};

use super::{ActionError, InvalidReason, StructuralError};

/// Powerups from the payer's hand offered as ammo of their colour.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payment {
    pub powerups: Vec<usize>,
}

impl Payment {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_powerups(powerups: impl IntoIterator<Item = usize>) -> Self {
        Self {
            powerups: powerups.into_iter().collect(),
        }
    }
}

/// Resolved split of a cost between ammo cubes and powerup cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentPlan {
    pub ammo: AmmoQuantity,
    pub powerups: Vec<usize>,
}

impl PaymentPlan {
    pub fn merge(mut self, other: PaymentPlan) -> Self {
        self.ammo = self.ammo.saturating_add(&other.ammo);
        self.powerups.extend(other.powerups);
        self
    }
}

/// Splits `cost` between the offered powerups and the ammo reserve.
///
/// Powerups are spent first. One whose colour the cost no longer needs is an
/// overpayment. Indices in `reserved` are already spoken for by the same
/// action.
pub fn plan_payment(
    powerups: &[PowerupCard],
    available: AmmoQuantity,
    cost: AmmoQuantity,
    payment: &Payment,
    reserved: &[usize],
) -> Result<PaymentPlan, ActionError> {
    let mut seen: BTreeSet<usize> = reserved.iter().copied().collect();
    let mut remaining = cost;

    for &index in &payment.powerups {
        let card = powerups
            .get(index)
            .ok_or(StructuralError::HandIndexOutOfBounds {
                index,
                len: powerups.len(),
            })?;
        if !seen.insert(index) {
            return Err(StructuralError::DuplicateIndex(index).into());
        }
        if remaining.take(card.color, 1) == 0 {
            return Err(InvalidReason::Overpayment.into());
        }
    }

    if !available.covers(&remaining) {
        return Err(AmmoError::NotEnough {
            required: remaining,
            available,
        }
        .into());
    }

    Ok(PaymentPlan {
        ammo: remaining,
        powerups: payment.powerups.clone(),
    })
}

/// Running total for an action that pays several costs at once.
///
/// Each spend sees only the ammo and powerups the earlier spends left over,
/// and the merged plan is settled in one go so hand indices stay valid.
pub(crate) struct Budget<'a> {
    powerups: &'a [PowerupCard],
    available: AmmoQuantity,
    reserved: Vec<usize>,
    plan: PaymentPlan,
}

impl<'a> Budget<'a> {
    pub(crate) fn of(ctx: &'a GameContext, color: PlayerColor) -> Result<Self, ActionError> {
        let player = ctx
            .player(color)
            .ok_or(StructuralError::UnknownPlayer(color))?;
        Ok(Self {
            powerups: &player.hand.powerups,
            available: player.actor.board.ammo(),
            reserved: Vec::new(),
            plan: PaymentPlan::default(),
        })
    }

    pub(crate) fn spend(
        &mut self,
        cost: AmmoQuantity,
        payment: &Payment,
    ) -> Result<(), ActionError> {
        let plan = plan_payment(self.powerups, self.available, cost, payment, &self.reserved)?;
        self.available = self.available.saturating_sub(&plan.ammo);
        self.reserved.extend_from_slice(&plan.powerups);
        self.plan = std::mem::take(&mut self.plan).merge(plan);
        Ok(())
    }

    /// Spends a powerup for its effect rather than as ammo.
    pub(crate) fn consume(&mut self, index: usize) -> Result<&'a PowerupCard, ActionError> {
        let card = self
            .powerups
            .get(index)
            .ok_or(StructuralError::HandIndexOutOfBounds {
                index,
                len: self.powerups.len(),
            })?;
        if self.reserved.contains(&index) {
            return Err(StructuralError::DuplicateIndex(index).into());
        }
        self.reserved.push(index);
        self.plan.powerups.push(index);
        Ok(card)
    }

    pub(crate) fn powerup(&self, index: usize) -> Option<&'a PowerupCard> {
        self.powerups.get(index)
    }

    pub(crate) fn finish(self) -> PaymentPlan {
        self.plan
    }
}

/// Plans a payment from `color`'s own hand and ammo.
pub(crate) fn plan_for(
    ctx: &GameContext,
    color: PlayerColor,
    cost: AmmoQuantity,
    payment: &Payment,
    reserved: &[usize],
) -> Result<PaymentPlan, ActionError> {
    let player = ctx
        .player(color)
        .ok_or(StructuralError::UnknownPlayer(color))?;
    plan_payment(
        &player.hand.powerups,
        player.actor.board.ammo(),
        cost,
        payment,
        reserved,
    )
}

/// Takes the planned ammo and discards the planned powerups.
pub(crate) fn settle(
    ctx: &mut GameContext,
    color: PlayerColor,
    plan: &PaymentPlan,
) -> Result<(), ActionError> {
    let player = ctx
        .player_mut(color)
        .ok_or(StructuralError::UnknownPlayer(color))?;
    player.actor.board.use_ammo(&plan.ammo)?;
    let spent = player.hand.take_powerups(&plan.powerups);
    for card in spent {
        ctx.decks.powerups.discard(card);
    }
    Ok(())
}
