use crate::state::{GameContext, PlayerColor, PlayerPosition};

use super::{ActionError, ActionKind, ActionTransition, InvalidReason, StructuralError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnRequest {
    /// Hand slot of the powerup discarded to choose the spawn colour.
    pub powerup: usize,
}

/// Discards a powerup and enters the board on the spawn square of its colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnAction {
    actor: PlayerColor,
    request: SpawnRequest,
}

impl SpawnAction {
    pub fn new(actor: PlayerColor, request: SpawnRequest) -> Self {
        Self { actor, request }
    }

    fn destination(&self, ctx: &GameContext) -> Result<PlayerPosition, ActionError> {
        let player = ctx
            .player(self.actor)
            .ok_or(StructuralError::UnknownPlayer(self.actor))?;
        if player.actor.is_spawned() {
            return Err(InvalidReason::AlreadySpawned.into());
        }

        let powerups = &player.hand.powerups;
        let card = powerups
            .get(self.request.powerup)
            .ok_or(StructuralError::HandIndexOutOfBounds {
                index: self.request.powerup,
                len: powerups.len(),
            })?;
        ctx.map
            .spawn_of(card.color)
            .ok_or_else(|| InvalidReason::NotASpawnSquare.into())
    }
}

impl ActionTransition for SpawnAction {
    type Output = PlayerPosition;

    fn actor(&self) -> PlayerColor {
        self.actor
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Spawn
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), ActionError> {
        self.destination(ctx).map(|_| ())
    }

    fn execute(&self, ctx: &mut GameContext) -> Result<PlayerPosition, ActionError> {
        let destination = self.destination(ctx)?;
        let player = ctx
            .player_mut(self.actor)
            .ok_or(StructuralError::UnknownPlayer(self.actor))?;
        let discarded = player.hand.take_powerups(&[self.request.powerup]);
        player.actor.position = Some(destination);
        for card in discarded {
            ctx.decks.powerups.discard(card);
        }
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{PowerupCard, PowerupKind};
    use crate::state::AmmoColor;
    use crate::testing::{context, pos};

    fn give(ctx: &mut GameContext, cards: &[PowerupCard]) {
        let player = ctx.player_mut(PlayerColor::Yellow).unwrap();
        player.hand.powerups.extend_from_slice(cards);
    }

    #[test]
    fn spawns_on_the_discarded_colour() {
        let mut ctx = context(3);
        give(
            &mut ctx,
            &[
                PowerupCard::new(PowerupKind::Newton, AmmoColor::Red),
                PowerupCard::new(PowerupKind::Teleporter, AmmoColor::Yellow),
            ],
        );

        let at = SpawnAction::new(PlayerColor::Yellow, SpawnRequest { powerup: 1 })
            .execute(&mut ctx)
            .unwrap();

        assert_eq!(Some(at), ctx.map.spawn_of(AmmoColor::Yellow));
        let player = ctx.player(PlayerColor::Yellow).unwrap();
        assert_eq!(player.actor.position, Some(at));
        assert_eq!(
            player.hand.powerups,
            vec![PowerupCard::new(PowerupKind::Newton, AmmoColor::Red)]
        );
        assert_eq!(ctx.decks.powerups.discarded(), 1);
    }

    #[test]
    fn spawned_player_cannot_spawn_again() {
        let mut ctx = context(3);
        give(
            &mut ctx,
            &[PowerupCard::new(PowerupKind::Newton, AmmoColor::Blue)],
        );
        ctx.place(PlayerColor::Yellow, pos(0, 0));

        let result = SpawnAction::new(PlayerColor::Yellow, SpawnRequest { powerup: 0 })
            .validate(&ctx);
        assert_eq!(
            result,
            Err(ActionError::Rejected(
                InvalidReason::AlreadySpawned.into()
            ))
        );
    }

    #[test]
    fn missing_powerup_is_structural() {
        let ctx = context(3);
        let result = SpawnAction::new(PlayerColor::Yellow, SpawnRequest { powerup: 0 })
            .validate(&ctx);
        assert!(matches!(result, Err(ActionError::Structural(_))));
    }
}
