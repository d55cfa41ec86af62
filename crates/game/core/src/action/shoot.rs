use crate::cards::PowerupKind;
use crate::state::{AmmoColor, AmmoQuantity, GameContext, PlayerColor, PlayerPosition};

use super::effect::{EffectReport, Target, apply_effect};
use super::payment::{Budget, PaymentPlan, settle};
use super::targeting::{TargetRequest, validate_target};
use super::{
    ActionError, ActionKind, ActionTransition, InvalidReason, Payment, ReloadAction,
    ReloadRequest, Rejection, StructuralError, check_movement, spawned_position,
};

/// How the one ammo of a targeting scope is paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScopePayment {
    Ammo(AmmoColor),
    /// Another powerup from the hand, spent as ammo of its colour.
    Powerup(usize),
}

/// Targeting scope played on top of a shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeRequest {
    /// Hand slot of the targeting scope.
    pub powerup: usize,
    /// A player hit by this shot.
    pub target: PlayerColor,
    pub pay_with: ScopePayment,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShootRequest {
    /// Hand slot of the weapon.
    pub weapon: usize,
    /// Effect index on the weapon; 0 is the base effect.
    pub effect: usize,
    /// Square to step to before shooting, within the kind's bounds.
    pub moving_position: Option<PlayerPosition>,
    pub target: Target,
    /// Pays the chosen effect's extra cost.
    pub payment: Payment,
    /// Reload bundled into a frenzy shot.
    pub reload: Option<ReloadRequest>,
    pub scope: Option<ScopeRequest>,
}

/// Optional move, optional frenzy reload, then one weapon effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShootAction {
    actor: PlayerColor,
    kind: ActionKind,
    request: ShootRequest,
}

/// Everything validation resolved for one shot.
struct ShotPlan {
    origin: PlayerPosition,
    payment: PaymentPlan,
}

impl ShootAction {
    pub fn new(
        actor: PlayerColor,
        kind: ActionKind,
        request: ShootRequest,
    ) -> Result<Self, StructuralError> {
        if !kind.is_shoot() {
            return Err(StructuralError::IncompatibleAction {
                expected: ActionKind::Shoot,
                got: kind,
            });
        }
        if request.reload.is_some() && !kind.allows_bundled_reload() {
            return Err(StructuralError::IncompatibleAction {
                expected: ActionKind::FrenzyShoot,
                got: kind,
            });
        }
        Ok(Self {
            actor,
            kind,
            request,
        })
    }

    fn reload(&self) -> Option<ReloadAction> {
        self.request
            .reload
            .clone()
            .map(|request| ReloadAction::new(self.actor, request))
    }

    fn plan(&self, ctx: &GameContext) -> Result<ShotPlan, ActionError> {
        let request = &self.request;
        let from = spawned_position(ctx, self.actor)?;
        let origin = request.moving_position.unwrap_or(from);
        check_movement(ctx, self.kind, from, origin)?;

        let player = ctx
            .player(self.actor)
            .ok_or(StructuralError::UnknownPlayer(self.actor))?;
        let hand = &player.hand.weapons;
        let weapon = hand
            .get(request.weapon)
            .ok_or(StructuralError::HandIndexOutOfBounds {
                index: request.weapon,
                len: hand.len(),
            })?;
        let effect = weapon
            .effect(request.effect)
            .ok_or(StructuralError::EffectIndexOutOfBounds {
                index: request.effect,
                len: weapon.effects().len(),
            })?;

        let reload = self.reload();
        let reloaded = reload
            .as_ref()
            .is_some_and(|reload| reload.reloads(request.weapon));
        if !weapon.is_charged() && !reloaded {
            return Err(Rejection::WeaponNotCharged.into());
        }

        let mut actors = ctx.positions();
        for (color, position) in actors.iter_mut() {
            if *color == self.actor {
                *position = Some(origin);
            }
        }
        validate_target(
            effect,
            &TargetRequest {
                map: &ctx.map,
                movement: ctx.config.movement,
                shooter: self.actor,
                origin,
                actors: &actors,
                target: &request.target,
            },
        )?;

        let mut budget = Budget::of(ctx, self.actor)?;
        if let Some(scope) = &request.scope {
            let card = budget.consume(scope.powerup)?;
            if card.kind != PowerupKind::TargetingScope {
                return Err(InvalidReason::WrongPowerup.into());
            }
        }
        if let Some(reload) = &reload {
            reload.charge(ctx, &mut budget)?;
        }
        budget.spend(effect.cost_quantity(), &request.payment)?;

        if let Some(scope) = &request.scope {
            match scope.pay_with {
                ScopePayment::Ammo(color) => {
                    budget.spend(AmmoQuantity::from_colors(&[color]), &Payment::none())?;
                }
                ScopePayment::Powerup(index) => {
                    let color = budget
                        .powerup(index)
                        .map(|card| card.color)
                        .ok_or(StructuralError::HandIndexOutOfBounds {
                            index,
                            len: player.hand.powerups.len(),
                        })?;
                    budget.spend(
                        AmmoQuantity::from_colors(&[color]),
                        &Payment::with_powerups([index]),
                    )?;
                }
            }
            if !self.hits(ctx, origin, scope.target)? {
                return Err(InvalidReason::ScopeTargetNotHit.into());
            }
        }

        Ok(ShotPlan {
            origin,
            payment: budget.finish(),
        })
    }

    /// Whether `victim` takes damage from the effect, found by running it on
    /// a scratch copy of the game.
    fn hits(
        &self,
        ctx: &GameContext,
        origin: PlayerPosition,
        victim: PlayerColor,
    ) -> Result<bool, ActionError> {
        if victim == self.actor {
            return Ok(false);
        }
        let mut preview = ctx.clone();
        preview.place(self.actor, origin);
        let report = self.fire(&mut preview)?;
        Ok(report.damaged.contains(&victim))
    }

    fn fire(&self, ctx: &mut GameContext) -> Result<EffectReport, ActionError> {
        let effect = ctx
            .player(self.actor)
            .and_then(|player| player.hand.weapons.get(self.request.weapon))
            .and_then(|weapon| weapon.effect(self.request.effect))
            .cloned()
            .ok_or(StructuralError::EffectIndexOutOfBounds {
                index: self.request.effect,
                len: 0,
            })?;
        Ok(apply_effect(ctx, self.actor, &effect, &self.request.target))
    }
}

impl ActionTransition for ShootAction {
    type Output = EffectReport;

    fn actor(&self) -> PlayerColor {
        self.actor
    }

    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError> {
        self.plan(ctx).map(|_| ())
    }

    fn execute(&self, ctx: &mut GameContext) -> Result<EffectReport, ActionError> {
        let plan = self.plan(ctx)?;
        ctx.place(self.actor, plan.origin);

        settle(ctx, self.actor, &plan.payment)?;
        if let Some(reload) = self.reload() {
            reload.recharge(ctx)?;
        }
        ctx.player_mut(self.actor)
            .and_then(|player| player.hand.weapons.get_mut(self.request.weapon))
            .ok_or(StructuralError::HandIndexOutOfBounds {
                index: self.request.weapon,
                len: 0,
            })?
            .use_weapon()?;

        let mut report = self.fire(ctx)?;

        if let Some(scope) = &self.request.scope {
            if let Some(actor) = ctx.actor_mut(scope.target) {
                actor.board.add_damage(self.actor, 1);
            }
            if !report.damaged.contains(&scope.target) {
                report.damaged.push(scope.target);
            }
        }

        for &victim in &report.damaged {
            ctx.turns.add_damaged(victim);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::effect::{Effect, EffectProperties, EffectStep, TargetKind, TargetSelector};
    use crate::cards::{PowerupCard, WeaponCard, WeaponState};
    use crate::state::TurnManager;
    use crate::testing::{context, pos};

    fn pistol() -> WeaponCard {
        let base = Effect::new("base", TargetKind::Player)
            .properties(EffectProperties::new().visible(true).target_num(1))
            .step(EffectStep::damage(TargetSelector::AllTargets, 2));
        let extra = Effect::new("extra", TargetKind::Player)
            .cost(&[AmmoColor::Blue])
            .properties(EffectProperties::new().visible(true).target_num(1))
            .step(EffectStep::damage(TargetSelector::AllTargets, 3));
        WeaponCard::new("pistol", vec![AmmoColor::Red, AmmoColor::Blue], vec![base, extra])
    }

    /// Yellow at (1,0) owns a charged pistol; Green stands in view at (1,1),
    /// Blue out of view at (2,3).
    fn setup() -> GameContext {
        let mut ctx = context(3);
        ctx.turns = TurnManager::new(vec![
            PlayerColor::Yellow,
            PlayerColor::Green,
            PlayerColor::Blue,
        ]);
        ctx.place(PlayerColor::Yellow, pos(1, 0));
        ctx.place(PlayerColor::Green, pos(1, 1));
        ctx.place(PlayerColor::Blue, pos(2, 3));
        let mut weapon = pistol();
        weapon.recharge().unwrap();
        ctx.player_mut(PlayerColor::Yellow)
            .unwrap()
            .hand
            .weapons
            .push(weapon);
        ctx
    }

    fn shoot_at(target: PlayerColor) -> ShootRequest {
        ShootRequest {
            target: Target::players([target]),
            ..ShootRequest::default()
        }
    }

    fn run(
        ctx: &mut GameContext,
        kind: ActionKind,
        request: ShootRequest,
    ) -> Result<EffectReport, ActionError> {
        ShootAction::new(PlayerColor::Yellow, kind, request)?.execute(ctx)
    }

    #[test]
    fn base_effect_damages_and_discharges() {
        let mut ctx = setup();
        let report = run(&mut ctx, ActionKind::Shoot, shoot_at(PlayerColor::Green)).unwrap();

        assert_eq!(report.damaged, vec![PlayerColor::Green]);
        let green = ctx.actor(PlayerColor::Green).unwrap();
        assert_eq!(green.board.damage_by(PlayerColor::Yellow), 2);
        let yellow = ctx.player(PlayerColor::Yellow).unwrap();
        assert_eq!(yellow.hand.weapons[0].state(), WeaponState::Uncharged);
        assert_eq!(ctx.turns.damaged(), &[PlayerColor::Green]);
    }

    #[test]
    fn hidden_target_is_rejected_without_side_effects() {
        let mut ctx = setup();
        let before = ctx.clone();
        let result = run(&mut ctx, ActionKind::Shoot, shoot_at(PlayerColor::Blue));
        assert!(matches!(
            result,
            Err(ActionError::Rejected(Rejection::InvalidAction(
                InvalidReason::Targeting(_)
            )))
        ));
        assert_eq!(ctx, before);
    }

    #[test]
    fn secondary_effect_costs_ammo() {
        let mut ctx = setup();
        let request = ShootRequest {
            effect: 1,
            ..shoot_at(PlayerColor::Green)
        };
        run(&mut ctx, ActionKind::Shoot, request).unwrap();

        let yellow = ctx.player(PlayerColor::Yellow).unwrap();
        assert_eq!(yellow.actor.board.ammo(), AmmoQuantity::new(1, 1, 1).saturating_sub(
            &AmmoQuantity::from_colors(&[AmmoColor::Blue])
        ));
    }

    #[test]
    fn uncharged_weapon_leaves_the_shooter_in_place() {
        let mut ctx = setup();
        ctx.player_mut(PlayerColor::Yellow).unwrap().hand.weapons[0]
            .use_weapon()
            .unwrap();
        let request = ShootRequest {
            moving_position: Some(pos(0, 0)),
            ..shoot_at(PlayerColor::Green)
        };

        let result = run(&mut ctx, ActionKind::AdrenalineShoot, request);
        assert_eq!(result, Err(ActionError::Rejected(Rejection::WeaponNotCharged)));
        assert_eq!(ctx.position_of(PlayerColor::Yellow), Some(pos(1, 0)));
    }

    #[test]
    fn plain_shoot_cannot_move() {
        let mut ctx = setup();
        let request = ShootRequest {
            moving_position: Some(pos(1, 1)),
            ..shoot_at(PlayerColor::Green)
        };
        assert!(run(&mut ctx, ActionKind::Shoot, request).is_err());
    }

    #[test]
    fn frenzy_shot_reloads_before_firing() {
        let mut ctx = setup();
        ctx.player_mut(PlayerColor::Yellow).unwrap().hand.weapons[0]
            .use_weapon()
            .unwrap();
        let request = ShootRequest {
            reload: Some(ReloadRequest::weapons([0])),
            ..shoot_at(PlayerColor::Green)
        };

        run(&mut ctx, ActionKind::FrenzyShoot, request.clone()).unwrap();
        let yellow = ctx.player(PlayerColor::Yellow).unwrap();
        assert_eq!(yellow.hand.weapons[0].state(), WeaponState::Uncharged);
        assert_eq!(yellow.actor.board.ammo(), AmmoQuantity::new(1, 1, 1).saturating_sub(
            &AmmoQuantity::from_colors(&[AmmoColor::Red, AmmoColor::Blue])
        ));

        assert!(matches!(
            ShootAction::new(PlayerColor::Yellow, ActionKind::Shoot, request),
            Err(StructuralError::IncompatibleAction { .. })
        ));
    }

    #[test]
    fn scope_adds_one_damage_to_a_hit_player() {
        let mut ctx = setup();
        ctx.player_mut(PlayerColor::Yellow)
            .unwrap()
            .hand
            .powerups
            .push(PowerupCard::new(PowerupKind::TargetingScope, AmmoColor::Red));

        let missed = ShootRequest {
            scope: Some(ScopeRequest {
                powerup: 0,
                target: PlayerColor::Blue,
                pay_with: ScopePayment::Ammo(AmmoColor::Yellow),
            }),
            ..shoot_at(PlayerColor::Green)
        };
        assert_eq!(
            run(&mut ctx, ActionKind::Shoot, missed),
            Err(ActionError::Rejected(Rejection::InvalidAction(
                InvalidReason::ScopeTargetNotHit
            )))
        );

        let hit = ShootRequest {
            scope: Some(ScopeRequest {
                powerup: 0,
                target: PlayerColor::Green,
                pay_with: ScopePayment::Ammo(AmmoColor::Yellow),
            }),
            ..shoot_at(PlayerColor::Green)
        };
        run(&mut ctx, ActionKind::Shoot, hit).unwrap();

        let green = ctx.actor(PlayerColor::Green).unwrap();
        assert_eq!(green.board.damage_by(PlayerColor::Yellow), 3);
        let yellow = ctx.player(PlayerColor::Yellow).unwrap();
        assert!(yellow.hand.powerups.is_empty());
        assert_eq!(ctx.decks.powerups.discarded(), 1);
    }
}
