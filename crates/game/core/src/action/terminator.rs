use crate::config::GameConfig;
use crate::state::{GameContext, PlayerColor, PlayerPosition, Terminator};

use super::{
    ActionError, ActionKind, ActionTransition, InvalidReason, Rejection, StructuralError,
    spawned_position,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminatorRequest {
    /// Square the Terminator steps to first, at most one away.
    pub moving_position: Option<PlayerPosition>,
    /// Player shot from the destination; must be set whenever anyone is in
    /// sight.
    pub target: Option<PlayerColor>,
}

/// The turn owner moves the neutral Terminator, then shoots with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminatorAction {
    actor: PlayerColor,
    request: TerminatorRequest,
}

struct TerminatorPlan {
    terminator: PlayerColor,
    destination: PlayerPosition,
}

impl TerminatorAction {
    pub fn new(actor: PlayerColor, request: TerminatorRequest) -> Self {
        Self { actor, request }
    }

    fn plan(&self, ctx: &GameContext) -> Result<TerminatorPlan, ActionError> {
        let terminator = ctx
            .terminator_color()
            .ok_or(InvalidReason::NoTerminator)?;
        let from = spawned_position(ctx, terminator)?;
        let destination = self.request.moving_position.unwrap_or(from);

        if !ctx.map.contains(destination) {
            return Err(Rejection::OutOfMap(destination).into());
        }
        let distance = ctx
            .map
            .movement_cost(ctx.config.movement, from, destination)
            .ok_or(InvalidReason::Unreachable)?;
        if distance > Terminator::MAX_MOVE {
            return Err(InvalidReason::MovementOutOfRange {
                distance,
                min: 0,
                max: Terminator::MAX_MOVE,
            }
            .into());
        }

        let in_sight = |position: Option<PlayerPosition>| {
            position.is_some_and(|position| ctx.map.is_visible(destination, position))
        };

        match self.request.target {
            Some(target) if target == terminator => Err(InvalidReason::SelfTarget.into()),
            Some(target) => {
                let player = ctx
                    .player(target)
                    .ok_or(StructuralError::UnknownPlayer(target))?;
                if !player.actor.is_spawned() {
                    return Err(InvalidReason::NotSpawned.into());
                }
                if !in_sight(player.actor.position) {
                    return Err(InvalidReason::TargetNotVisible.into());
                }
                Ok(TerminatorPlan {
                    terminator,
                    destination,
                })
            }
            None => {
                if ctx
                    .players
                    .iter()
                    .any(|player| in_sight(player.actor.position))
                {
                    return Err(InvalidReason::VisibleTargetIgnored.into());
                }
                Ok(TerminatorPlan {
                    terminator,
                    destination,
                })
            }
        }
    }
}

impl ActionTransition for TerminatorAction {
    /// The player shot, if anyone was in sight.
    type Output = Option<PlayerColor>;

    fn actor(&self) -> PlayerColor {
        self.actor
    }

    fn kind(&self) -> ActionKind {
        ActionKind::TerminatorAction
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError> {
        self.plan(ctx).map(|_| ())
    }

    fn execute(&self, ctx: &mut GameContext) -> Result<Option<PlayerColor>, ActionError> {
        let plan = self.plan(ctx)?;
        ctx.place(plan.terminator, plan.destination);

        let Some(target) = self.request.target else {
            return Ok(None);
        };
        let enraged = ctx
            .actor(plan.terminator)
            .is_some_and(|actor| actor.board.damage_count() >= GameConfig::ADRENALINE_SHOOT);

        if let Some(victim) = ctx.actor_mut(target) {
            victim
                .board
                .add_damage(plan.terminator, GameConfig::TERMINATOR_DAMAGE);
            if enraged && victim.board.marks_by(plan.terminator) < GameConfig::MAX_MARKS_PER_DEALER
            {
                victim.board.add_mark(plan.terminator, 1);
            }
        }
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, pos};

    /// Terminator (Grey) at (1,1); Yellow at (1,0) in the same room, Blue
    /// out of sight at (2,3).
    fn with_terminator() -> GameContext {
        let mut ctx = context(3);
        ctx.terminator = Some(Terminator::new(PlayerColor::Grey));
        ctx.place(PlayerColor::Grey, pos(1, 1));
        ctx.place(PlayerColor::Yellow, pos(1, 0));
        ctx.place(PlayerColor::Blue, pos(2, 3));
        ctx
    }

    fn run(ctx: &mut GameContext, request: TerminatorRequest) -> Result<Option<PlayerColor>, ActionError> {
        TerminatorAction::new(PlayerColor::Yellow, request).execute(ctx)
    }

    #[test]
    fn no_terminator_no_action() {
        let mut ctx = context(3);
        assert_eq!(
            run(&mut ctx, TerminatorRequest::default()),
            Err(ActionError::Rejected(Rejection::InvalidAction(
                InvalidReason::NoTerminator
            )))
        );
    }

    #[test]
    fn visible_player_must_be_shot() {
        let mut ctx = with_terminator();
        assert_eq!(
            run(&mut ctx, TerminatorRequest::default()),
            Err(ActionError::Rejected(Rejection::InvalidAction(
                InvalidReason::VisibleTargetIgnored
            )))
        );

        let shot = TerminatorRequest {
            target: Some(PlayerColor::Yellow),
            ..TerminatorRequest::default()
        };
        assert_eq!(run(&mut ctx, shot), Ok(Some(PlayerColor::Yellow)));
        let yellow = ctx.actor(PlayerColor::Yellow).unwrap();
        assert_eq!(yellow.board.damage_by(PlayerColor::Grey), 1);
        assert_eq!(yellow.board.marks_by(PlayerColor::Grey), 0);
    }

    #[test]
    fn hidden_or_self_targets_are_refused() {
        let mut ctx = with_terminator();
        let hidden = TerminatorRequest {
            target: Some(PlayerColor::Blue),
            ..TerminatorRequest::default()
        };
        assert_eq!(
            run(&mut ctx, hidden),
            Err(ActionError::Rejected(Rejection::InvalidAction(
                InvalidReason::TargetNotVisible
            )))
        );

        let itself = TerminatorRequest {
            target: Some(PlayerColor::Grey),
            ..TerminatorRequest::default()
        };
        assert_eq!(
            run(&mut ctx, itself),
            Err(ActionError::Rejected(Rejection::InvalidAction(
                InvalidReason::SelfTarget
            )))
        );
    }

    #[test]
    fn terminator_moves_one_square() {
        let mut ctx = with_terminator();
        let far = TerminatorRequest {
            moving_position: Some(pos(1, 3)),
            target: Some(PlayerColor::Blue),
        };
        assert!(run(&mut ctx, far).is_err());

        let near = TerminatorRequest {
            moving_position: Some(pos(1, 2)),
            target: Some(PlayerColor::Yellow),
        };
        run(&mut ctx, near).unwrap();
        assert_eq!(ctx.position_of(PlayerColor::Grey), Some(pos(1, 2)));
    }

    fn shoot_yellow_with_damage(damage: u8) -> (usize, usize) {
        let mut ctx = with_terminator();
        if let Some(terminator) = ctx.terminator.as_mut() {
            terminator.actor.board.add_damage(PlayerColor::Blue, damage);
        }
        let shot = TerminatorRequest {
            target: Some(PlayerColor::Yellow),
            ..TerminatorRequest::default()
        };
        run(&mut ctx, shot).unwrap();
        let yellow = ctx.actor(PlayerColor::Yellow).unwrap();
        (
            yellow.board.damage_by(PlayerColor::Grey),
            yellow.board.marks_by(PlayerColor::Grey),
        )
    }

    #[test]
    fn wounded_terminator_also_marks() {
        assert_eq!(shoot_yellow_with_damage(6), (1, 1));
    }

    #[test]
    fn terminator_below_the_threshold_only_damages() {
        assert_eq!(shoot_yellow_with_damage(5), (1, 0));
    }
}
