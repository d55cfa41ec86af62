use crate::action::Effect;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{AmmoColor, AmmoQuantity};

/// Charge state of a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponState {
    Charged,
    Uncharged,
    /// Lying on a spawn square or just bought: the first cost element is
    /// already paid.
    SemiCharged,
}

/// Triggers accepted by the charge state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponTrigger {
    Use,
    Recharge,
    /// Dropped onto a spawn square.
    Drop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponError {
    #[error("weapon is not charged")]
    NotCharged,

    #[error("weapon is already charged")]
    AlreadyCharged,
}

impl GameError for WeaponError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotCharged => "WEAPON_NOT_CHARGED",
            Self::AlreadyCharged => "WEAPON_ALREADY_CHARGED",
        }
    }
}

impl WeaponState {
    /// Charge transition table.
    pub fn transition(self, trigger: WeaponTrigger) -> Result<WeaponState, WeaponError> {
        use WeaponState::*;
        use WeaponTrigger::*;

        match (self, trigger) {
            (Charged, Use) => Ok(Uncharged),
            (Uncharged | SemiCharged, Use) => Err(WeaponError::NotCharged),
            (Uncharged | SemiCharged, Recharge) => Ok(Charged),
            (Charged, Recharge) => Err(WeaponError::AlreadyCharged),
            (_, Drop) => Ok(SemiCharged),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponCard {
    name: String,
    cost: Vec<AmmoColor>,
    effects: Vec<Effect>,
    state: WeaponState,
}

impl WeaponCard {
    /// A new weapon starts semi-charged, ready to be sold on a spawn square.
    pub fn new(name: impl Into<String>, cost: Vec<AmmoColor>, effects: Vec<Effect>) -> Self {
        Self {
            name: name.into(),
            cost,
            effects,
            state: WeaponState::SemiCharged,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> &[AmmoColor] {
        &self.cost
    }

    /// Index 0 is the base effect; the rest are secondary effects or
    /// alternative fire modes.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn effect(&self, index: usize) -> Option<&Effect> {
        self.effects.get(index)
    }

    pub fn state(&self) -> WeaponState {
        self.state
    }

    pub fn is_charged(&self) -> bool {
        self.state == WeaponState::Charged
    }

    pub fn use_weapon(&mut self) -> Result<(), WeaponError> {
        self.state = self.state.transition(WeaponTrigger::Use)?;
        Ok(())
    }

    pub fn recharge(&mut self) -> Result<(), WeaponError> {
        self.state = self.state.transition(WeaponTrigger::Recharge)?;
        Ok(())
    }

    /// Ammo needed to bring the weapon back to charged.
    pub fn recharge_cost(&self) -> AmmoQuantity {
        match self.state {
            WeaponState::Charged => AmmoQuantity::EMPTY,
            WeaponState::Uncharged => AmmoQuantity::from_colors(&self.cost),
            WeaponState::SemiCharged => {
                AmmoQuantity::from_colors(self.cost.get(1..).unwrap_or_default())
            }
        }
    }

    pub(crate) fn drop_to_spawn(&mut self) {
        if let Ok(state) = self.state.transition(WeaponTrigger::Drop) {
            self.state = state;
        }
    }
}
