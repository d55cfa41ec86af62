use std::collections::BTreeSet;

use crate::state::{AmmoQuantity, GameContext, PlayerColor};

use super::payment::{Budget, PaymentPlan, settle};
use super::{ActionError, ActionKind, ActionTransition, Payment, Rejection, StructuralError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReloadRequest {
    /// Hand slots of the weapons to recharge.
    pub weapons: Vec<usize>,
    pub payment: Payment,
}

impl ReloadRequest {
    pub fn weapons(weapons: impl IntoIterator<Item = usize>) -> Self {
        Self {
            weapons: weapons.into_iter().collect(),
            payment: Payment::none(),
        }
    }
}

/// Recharges weapons in hand; ends the turn when sent on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadAction {
    actor: PlayerColor,
    request: ReloadRequest,
}

impl ReloadAction {
    pub fn new(actor: PlayerColor, request: ReloadRequest) -> Self {
        Self { actor, request }
    }

    /// Summed recharge cost of the requested weapons.
    pub(crate) fn cost(&self, ctx: &GameContext) -> Result<AmmoQuantity, ActionError> {
        let player = ctx
            .player(self.actor)
            .ok_or(StructuralError::UnknownPlayer(self.actor))?;
        let hand = &player.hand.weapons;

        let mut seen = BTreeSet::new();
        let mut cost = AmmoQuantity::EMPTY;
        for &index in &self.request.weapons {
            let weapon = hand
                .get(index)
                .ok_or(StructuralError::HandIndexOutOfBounds {
                    index,
                    len: hand.len(),
                })?;
            if !seen.insert(index) {
                return Err(StructuralError::DuplicateIndex(index).into());
            }
            if weapon.is_charged() {
                return Err(Rejection::WeaponAlreadyCharged.into());
            }
            cost = cost.saturating_add(&weapon.recharge_cost());
        }
        Ok(cost)
    }

    /// Adds the reload to a shared budget.
    pub(crate) fn charge(
        &self,
        ctx: &GameContext,
        budget: &mut Budget<'_>,
    ) -> Result<(), ActionError> {
        budget.spend(self.cost(ctx)?, &self.request.payment)
    }

    pub(crate) fn reloads(&self, index: usize) -> bool {
        self.request.weapons.contains(&index)
    }

    /// Recharges the requested weapons. Payment is settled by the caller.
    pub(crate) fn recharge(&self, ctx: &mut GameContext) -> Result<(), ActionError> {
        let player = ctx
            .player_mut(self.actor)
            .ok_or(StructuralError::UnknownPlayer(self.actor))?;
        for &index in &self.request.weapons {
            if let Some(weapon) = player.hand.weapons.get_mut(index) {
                weapon.recharge()?;
            }
        }
        Ok(())
    }

    fn plan(&self, ctx: &GameContext) -> Result<PaymentPlan, ActionError> {
        let mut budget = Budget::of(ctx, self.actor)?;
        self.charge(ctx, &mut budget)?;
        Ok(budget.finish())
    }
}

impl ActionTransition for ReloadAction {
    type Output = ();

    fn actor(&self) -> PlayerColor {
        self.actor
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Reload
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError> {
        self.plan(ctx).map(|_| ())
    }

    fn execute(&self, ctx: &mut GameContext) -> Result<(), ActionError> {
        let plan = self.plan(ctx)?;
        settle(ctx, self.actor, &plan)?;
        self.recharge(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{WeaponCard, WeaponState};
    use crate::state::AmmoColor;
    use crate::testing::context;

    fn arm(ctx: &mut GameContext, weapons: Vec<WeaponCard>) {
        let player = ctx.player_mut(PlayerColor::Yellow).unwrap();
        for weapon in weapons {
            player.hand.weapons.push(weapon);
        }
    }

    fn spent(name: &str, cost: Vec<AmmoColor>) -> WeaponCard {
        let mut weapon = WeaponCard::new(name, cost, Vec::new());
        weapon.recharge().unwrap();
        weapon.use_weapon().unwrap();
        weapon
    }

    #[test]
    fn empty_reload_is_a_no_op() {
        let mut ctx = context(3);
        let before = ctx.clone();
        ReloadAction::new(PlayerColor::Yellow, ReloadRequest::default())
            .execute(&mut ctx)
            .unwrap();
        assert_eq!(ctx, before);
    }

    #[test]
    fn reload_pays_full_cost() {
        let mut ctx = context(3);
        arm(
            &mut ctx,
            vec![
                spent("a", vec![AmmoColor::Red, AmmoColor::Blue]),
                spent("b", vec![AmmoColor::Yellow]),
            ],
        );

        ReloadAction::new(PlayerColor::Yellow, ReloadRequest::weapons([0, 1]))
            .execute(&mut ctx)
            .unwrap();

        let player = ctx.player(PlayerColor::Yellow).unwrap();
        assert!(player.hand.weapons.iter().all(WeaponCard::is_charged));
        assert_eq!(player.actor.board.ammo(), AmmoQuantity::EMPTY);
    }

    #[test]
    fn charged_weapon_cannot_be_reloaded() {
        let mut ctx = context(3);
        let mut charged = WeaponCard::new("c", vec![AmmoColor::Red], Vec::new());
        charged.recharge().unwrap();
        arm(&mut ctx, vec![charged]);

        let result = ReloadAction::new(PlayerColor::Yellow, ReloadRequest::weapons([0]))
            .validate(&ctx);
        assert_eq!(
            result,
            Err(ActionError::Rejected(Rejection::WeaponAlreadyCharged))
        );
    }

    #[test]
    fn repeated_or_missing_slots_are_structural() {
        let mut ctx = context(3);
        arm(&mut ctx, vec![spent("a", vec![AmmoColor::Red])]);

        let missing = ReloadAction::new(PlayerColor::Yellow, ReloadRequest::weapons([2]));
        assert!(matches!(
            missing.validate(&ctx),
            Err(ActionError::Structural(
                StructuralError::HandIndexOutOfBounds { index: 2, len: 1 }
            ))
        ));

        let repeated = ReloadAction::new(PlayerColor::Yellow, ReloadRequest::weapons([0, 0]));
        assert_eq!(
            repeated.validate(&ctx),
            Err(ActionError::Structural(StructuralError::DuplicateIndex(0)))
        );
    }

    #[test]
    fn failed_reload_changes_nothing() {
        let mut ctx = context(3);
        arm(
            &mut ctx,
            vec![spent("big", vec![AmmoColor::Red, AmmoColor::Red])],
        );
        let before = ctx.clone();

        let result = ReloadAction::new(PlayerColor::Yellow, ReloadRequest::weapons([0]))
            .execute(&mut ctx);
        assert!(matches!(
            result,
            Err(ActionError::Rejected(Rejection::NotEnoughAmmo(_)))
        ));
        assert_eq!(ctx, before);
        assert_eq!(
            ctx.player(PlayerColor::Yellow).unwrap().hand.weapons[0].state(),
            WeaponState::Uncharged
        );
    }
}
