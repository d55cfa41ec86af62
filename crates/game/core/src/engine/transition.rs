//! Routes a request payload to its verb and runs it.

use crate::action::{
    ActionError, ActionKind, ActionRequest, ActionTransition, EffectReport, MoveAction,
    PickAction, PowerupAction, ReloadAction, ShootAction, SpawnAction, TerminatorAction,
};
use crate::cards::PowerupKind;
use crate::state::{GameContext, PlayerColor, PlayerPosition};

/// What a successful action did, as reported back to the players.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEffect {
    Spawned(PlayerPosition),
    Moved(PlayerPosition),
    Picked,
    Shot(EffectReport),
    Reloaded,
    Powerup(PowerupKind),
    /// The player shot by the Terminator, if anyone was in sight.
    Terminator(Option<PlayerColor>),
    Passed,
}

/// Validates, then executes.
#[inline]
fn drive_transition<T>(transition: &T, ctx: &mut GameContext) -> Result<T::Output, ActionError>
where
    T: ActionTransition,
{
    transition.validate(ctx)?;
    transition.execute(ctx)
}

/// Runs `request` as an action of `kind` on behalf of `sender`.
///
/// The caller has already checked that `kind` is offered and that the
/// payload fits it.
pub(super) fn execute_transition(
    ctx: &mut GameContext,
    sender: PlayerColor,
    kind: ActionKind,
    request: &ActionRequest,
) -> Result<ActionEffect, ActionError> {
    match request {
        ActionRequest::Spawn(spawn) => {
            drive_transition(&SpawnAction::new(sender, *spawn), ctx).map(ActionEffect::Spawned)
        }
        ActionRequest::Move { destination } => {
            let action = MoveAction::new(sender, kind, *destination)?;
            drive_transition(&action, ctx)?;
            Ok(ActionEffect::Moved(*destination))
        }
        ActionRequest::Pick(pick) => {
            let action = PickAction::new(sender, kind, pick.clone())?;
            drive_transition(&action, ctx)?;
            Ok(ActionEffect::Picked)
        }
        ActionRequest::Shoot(shoot) => {
            let action = ShootAction::new(sender, kind, shoot.clone())?;
            drive_transition(&action, ctx).map(ActionEffect::Shot)
        }
        ActionRequest::Reload(reload) => {
            drive_transition(&ReloadAction::new(sender, reload.clone()), ctx)?;
            Ok(ActionEffect::Reloaded)
        }
        ActionRequest::Powerup(powerup) => {
            drive_transition(&PowerupAction::new(sender, *powerup), ctx).map(ActionEffect::Powerup)
        }
        ActionRequest::Terminator(terminator) => {
            drive_transition(&TerminatorAction::new(sender, *terminator), ctx)
                .map(ActionEffect::Terminator)
        }
        ActionRequest::Pass => Ok(ActionEffect::Passed),
    }
}
