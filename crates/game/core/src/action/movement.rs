use crate::state::{GameContext, PlayerColor, PlayerPosition};

use super::{
    ActionError, ActionKind, ActionTransition, StructuralError, check_movement, spawned_position,
};

/// Plain run: MOVE up to three squares, FRENZY_MOVE up to four, at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveAction {
    actor: PlayerColor,
    kind: ActionKind,
    destination: PlayerPosition,
}

impl MoveAction {
    pub fn new(
        actor: PlayerColor,
        kind: ActionKind,
        destination: PlayerPosition,
    ) -> Result<Self, StructuralError> {
        if !kind.is_move() {
            return Err(StructuralError::IncompatibleAction {
                expected: ActionKind::Move,
                got: kind,
            });
        }
        Ok(Self {
            actor,
            kind,
            destination,
        })
    }
}

impl ActionTransition for MoveAction {
    type Output = ();

    fn actor(&self) -> PlayerColor {
        self.actor
    }

    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError> {
        let from = spawned_position(ctx, self.actor)?;
        check_movement(ctx, self.kind, from, self.destination)
    }

    fn execute(&self, ctx: &mut GameContext) -> Result<(), ActionError> {
        self.validate(ctx)?;
        ctx.place(self.actor, self.destination);
        Ok(())
    }
}
