use arrayvec::ArrayVec;

use crate::state::{AmmoColor, AmmoQuantity};

/// Pickup lying on a tile square: two or three ammo, or two ammo plus a
/// powerup draw.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoTile {
    ammo: ArrayVec<AmmoColor, 3>,
    powerup: bool,
}

impl AmmoTile {
    pub fn with_ammo(colors: [AmmoColor; 3]) -> Self {
        Self {
            ammo: ArrayVec::from(colors),
            powerup: false,
        }
    }

    pub fn with_powerup(colors: [AmmoColor; 2]) -> Self {
        Self {
            ammo: colors.into_iter().collect(),
            powerup: true,
        }
    }

    pub fn ammo(&self) -> &[AmmoColor] {
        &self.ammo
    }

    pub fn quantity(&self) -> AmmoQuantity {
        AmmoQuantity::from_colors(&self.ammo)
    }

    pub fn grants_powerup(&self) -> bool {
        self.powerup
    }
}
