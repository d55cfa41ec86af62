use arrayvec::ArrayVec;

use crate::cards::{PowerupCard, PowerupKind, WeaponCard};
use crate::config::GameConfig;

use super::{PhaseState, PlayerBoard, PlayerColor, PlayerPosition, RoundState};

/// Identity shared by human players and the Terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub nickname: String,
    pub color: PlayerColor,
    pub board: PlayerBoard,
    /// `None` until spawned, and again while dead.
    pub position: Option<PlayerPosition>,
    pub points: u32,
}

impl Actor {
    pub fn new(nickname: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            nickname: nickname.into(),
            color,
            board: PlayerBoard::new(),
            position: None,
            points: 0,
        }
    }

    pub fn is_spawned(&self) -> bool {
        self.position.is_some()
    }
}

/// Cards held by a player. A fourth powerup may be held only while choosing
/// where to spawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hand {
    pub weapons: ArrayVec<WeaponCard, { GameConfig::MAX_WEAPONS }>,
    pub powerups: Vec<PowerupCard>,
}

impl Hand {
    pub fn is_weapons_full(&self) -> bool {
        self.weapons.is_full()
    }

    pub fn can_draw_powerup(&self) -> bool {
        self.powerups.len() < GameConfig::MAX_POWERUPS
    }

    pub fn has_powerup(&self, kind: PowerupKind) -> bool {
        self.powerups.iter().any(|card| card.kind == kind)
    }

    /// Removes the powerups at `indices`, highest index first so the others
    /// stay valid, and returns them.
    pub fn take_powerups(&mut self, indices: &[usize]) -> Vec<PowerupCard> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        sorted
            .into_iter()
            .filter_map(|index| (index < self.powerups.len()).then(|| self.powerups.remove(index)))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserPlayer {
    pub actor: Actor,
    pub hand: Hand,
    pub first_player: bool,
    pub round: RoundState,
    pub connected: bool,
}

impl UserPlayer {
    pub fn new(nickname: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            actor: Actor::new(nickname, color),
            hand: Hand::default(),
            first_player: false,
            round: RoundState::new(),
            connected: true,
        }
    }

    pub fn color(&self) -> PlayerColor {
        self.actor.color
    }

    pub fn phase(&self) -> PhaseState {
        self.round.phase()
    }
}

/// The AI-controlled extra actor. It has no hand and is moved by the turn
/// owner at most one square per turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terminator {
    pub actor: Actor,
}

impl Terminator {
    pub const NICKNAME: &'static str = "terminator";
    pub const MAX_MOVE: u32 = 1;

    pub fn new(color: PlayerColor) -> Self {
        Self {
            actor: Actor::new(Self::NICKNAME, color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AmmoColor;

    #[test]
    fn take_powerups_keeps_remaining_order() {
        let mut hand = Hand::default();
        for color in [AmmoColor::Red, AmmoColor::Blue, AmmoColor::Yellow] {
            hand.powerups
                .push(PowerupCard::new(PowerupKind::Newton, color));
        }

        let taken = hand.take_powerups(&[0, 2]);
        assert_eq!(taken.len(), 2);
        assert_eq!(hand.powerups.len(), 1);
        assert_eq!(hand.powerups[0].color, AmmoColor::Blue);
    }

    #[test]
    fn take_powerups_skips_missing_and_repeated_slots() {
        let mut hand = Hand::default();
        for color in [AmmoColor::Red, AmmoColor::Blue] {
            hand.powerups
                .push(PowerupCard::new(PowerupKind::Teleporter, color));
        }

        let taken = hand.take_powerups(&[1, 7, 1]);
        assert_eq!(taken, vec![PowerupCard::new(PowerupKind::Teleporter, AmmoColor::Blue)]);
        assert_eq!(hand.powerups.len(), 1);
    }
}
