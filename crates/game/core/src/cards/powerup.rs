use crate::state::AmmoColor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerupKind {
    /// One extra damage to a target just hit, paid with one ammo of any colour.
    TargetingScope,
    /// Moves another player one or two squares in a straight line.
    Newton,
    /// Marks the turn owner after taking damage from them.
    TagbackGrenade,
    /// Moves its holder to any square.
    Teleporter,
}

impl PowerupKind {
    /// Whether the card is played on the holder's own turn as a stand-alone action.
    pub fn is_turn_powerup(self) -> bool {
        matches!(self, Self::Newton | Self::Teleporter)
    }
}

/// A powerup also counts as one ammo of its colour and picks the spawn point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerupCard {
    pub kind: PowerupKind,
    pub color: AmmoColor,
}

impl PowerupCard {
    pub const fn new(kind: PowerupKind, color: AmmoColor) -> Self {
        Self { kind, color }
    }
}
