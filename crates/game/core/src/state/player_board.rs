//! Per-player damage, mark, ammo and skull bookkeeping.
use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

use super::{AmmoColor, AmmoQuantity, PlayerColor};

/// Score curve of the normal board side, indexed by damage rank.
pub const NORMAL_POINTS: [u8; 6] = [8, 6, 4, 2, 1, 1];
/// Score curve of the frenzy board side.
pub const FRENZY_POINTS: [u8; 4] = [2, 1, 1, 1];

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AmmoError {
    #[error("not enough ammo: required {required}, available {available}")]
    NotEnough {
        required: AmmoQuantity,
        available: AmmoQuantity,
    },
}

impl GameError for AmmoError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "AMMO_NOT_ENOUGH"
    }
}

/// Action upgrades unlocked by the amount of damage taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Adrenaline {
    None,
    /// Pick may move two squares.
    Pick,
    /// Pick may move two squares and shoot may move one.
    Shoot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerBoard {
    damage: ArrayVec<PlayerColor, { GameConfig::MAX_DAMAGE }>,
    marks: Vec<PlayerColor>,
    ammo: AmmoQuantity,
    skulls: u8,
    flipped: bool,
}

impl Default for PlayerBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerBoard {
    /// A fresh board holds one ammo of each colour.
    pub fn new() -> Self {
        Self {
            damage: ArrayVec::new(),
            marks: Vec::new(),
            ammo: AmmoQuantity::new(1, 1, 1),
            skulls: 0,
            flipped: false,
        }
    }

    pub fn damage(&self) -> &[PlayerColor] {
        &self.damage
    }

    pub fn marks(&self) -> &[PlayerColor] {
        &self.marks
    }

    pub fn ammo(&self) -> AmmoQuantity {
        self.ammo
    }

    pub fn skulls(&self) -> u8 {
        self.skulls
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn damage_count(&self) -> usize {
        self.damage.len()
    }

    pub fn damage_by(&self, dealer: PlayerColor) -> usize {
        self.damage.iter().filter(|&&color| color == dealer).count()
    }

    pub fn marks_by(&self, dealer: PlayerColor) -> usize {
        self.marks.iter().filter(|&&color| color == dealer).count()
    }

    /// Converts `dealer`'s marks into damage, then records `amount` more.
    ///
    /// Damage past the twelfth slot is dropped. Returns the number of damage
    /// tokens actually placed.
    pub fn add_damage(&mut self, dealer: PlayerColor, amount: u8) -> usize {
        let converted = self.marks_by(dealer);
        self.marks.retain(|&color| color != dealer);

        let wanted = usize::from(amount) + converted;
        let placed = wanted.min(self.damage.remaining_capacity());
        for _ in 0..placed {
            self.damage.push(dealer);
        }
        placed
    }

    pub fn add_mark(&mut self, dealer: PlayerColor, amount: u8) {
        self.marks
            .extend(std::iter::repeat_n(dealer, usize::from(amount)));
    }

    /// Adds one ammo of `color`, clamped at three.
    pub fn add_ammo(&mut self, color: AmmoColor) {
        self.ammo.add(color, 1);
        self.ammo.clamp_each(GameConfig::MAX_AMMO);
    }

    pub fn add_ammo_quantity(&mut self, quantity: &AmmoQuantity) {
        self.ammo = self.ammo.saturating_add(quantity);
        self.ammo.clamp_each(GameConfig::MAX_AMMO);
    }

    pub fn can_pay(&self, cost: &AmmoQuantity) -> bool {
        self.ammo.covers(cost)
    }

    /// Removes `cost` from the reserve, or leaves it untouched on failure.
    pub fn use_ammo(&mut self, cost: &AmmoQuantity) -> Result<(), AmmoError> {
        if !self.ammo.covers(cost) {
            return Err(AmmoError::NotEnough {
                required: *cost,
                available: self.ammo,
            });
        }
        self.ammo = self.ammo.saturating_sub(cost);
        Ok(())
    }

    pub fn is_dead(&self) -> bool {
        self.damage.len() >= GameConfig::KILL_SHOT
    }

    pub fn is_overkilled(&self) -> bool {
        self.damage.len() >= GameConfig::MAX_DAMAGE
    }

    /// Color of the eleventh damage token, if the owner is dead.
    pub fn killer(&self) -> Option<PlayerColor> {
        self.damage.get(GameConfig::KILL_SHOT - 1).copied()
    }

    /// Color of the twelfth damage token, if the owner was overkilled.
    pub fn overkiller(&self) -> Option<PlayerColor> {
        self.damage.get(GameConfig::MAX_DAMAGE - 1).copied()
    }

    pub fn adrenaline(&self) -> Adrenaline {
        match self.damage.len() {
            n if n >= GameConfig::ADRENALINE_SHOOT => Adrenaline::Shoot,
            n if n >= GameConfig::ADRENALINE_PICK => Adrenaline::Pick,
            _ => Adrenaline::None,
        }
    }

    /// Clears the damage track and records a skull.
    pub fn on_death(&mut self) {
        self.damage.clear();
        self.skulls = self.skulls.saturating_add(1);
    }

    /// Turns the board to its frenzy side. Only undamaged boards flip, and
    /// only once. Returns whether the board flipped.
    pub fn flip(&mut self) -> bool {
        if self.flipped || !self.damage.is_empty() {
            return false;
        }
        self.flipped = true;
        self.skulls = 0;
        true
    }

    /// Remaining score curve: the full curve minus one leading entry per
    /// skull, never shorter than one entry.
    pub fn board_points(&self) -> &'static [u8] {
        let curve: &'static [u8] = if self.flipped {
            &FRENZY_POINTS
        } else {
            &NORMAL_POINTS
        };
        let start = usize::from(self.skulls).min(curve.len() - 1);
        &curve[start..]
    }

    /// First blood is scored only on the normal side.
    pub fn first_blood(&self) -> Option<PlayerColor> {
        if self.flipped {
            None
        } else {
            self.damage.first().copied()
        }
    }
}
