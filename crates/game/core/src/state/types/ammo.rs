use std::fmt;

use super::AmmoColor;

/// Per-colour ammo counter used both for a player's reserve and for costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoQuantity {
    pub red: u8,
    pub blue: u8,
    pub yellow: u8,
}

impl AmmoQuantity {
    pub const EMPTY: Self = Self::new(0, 0, 0);

    pub const fn new(red: u8, blue: u8, yellow: u8) -> Self {
        Self { red, blue, yellow }
    }

    /// Counts the colours of an ordered cost list.
    pub fn from_colors(colors: &[AmmoColor]) -> Self {
        colors.iter().fold(Self::EMPTY, |mut acc, &color| {
            acc.add(color, 1);
            acc
        })
    }

    pub const fn get(&self, color: AmmoColor) -> u8 {
        match color {
            AmmoColor::Red => self.red,
            AmmoColor::Blue => self.blue,
            AmmoColor::Yellow => self.yellow,
        }
    }

    fn slot_mut(&mut self, color: AmmoColor) -> &mut u8 {
        match color {
            AmmoColor::Red => &mut self.red,
            AmmoColor::Blue => &mut self.blue,
            AmmoColor::Yellow => &mut self.yellow,
        }
    }

    pub fn add(&mut self, color: AmmoColor, amount: u8) {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_add(amount);
    }

    /// Removes up to `amount` of `color`, returning how much was removed.
    pub fn take(&mut self, color: AmmoColor, amount: u8) -> u8 {
        let slot = self.slot_mut(color);
        let taken = amount.min(*slot);
        *slot -= taken;
        taken
    }

    pub fn clamp_each(&mut self, max: u8) {
        self.red = self.red.min(max);
        self.blue = self.blue.min(max);
        self.yellow = self.yellow.min(max);
    }

    /// Returns true if `self` holds at least as much of every colour as `cost`.
    pub fn covers(&self, cost: &AmmoQuantity) -> bool {
        self.red >= cost.red && self.blue >= cost.blue && self.yellow >= cost.yellow
    }

    pub fn saturating_sub(&self, other: &AmmoQuantity) -> AmmoQuantity {
        AmmoQuantity::new(
            self.red.saturating_sub(other.red),
            self.blue.saturating_sub(other.blue),
            self.yellow.saturating_sub(other.yellow),
        )
    }

    pub fn saturating_add(&self, other: &AmmoQuantity) -> AmmoQuantity {
        AmmoQuantity::new(
            self.red.saturating_add(other.red),
            self.blue.saturating_add(other.blue),
            self.yellow.saturating_add(other.yellow),
        )
    }

    pub fn total(&self) -> u32 {
        u32::from(self.red) + u32::from(self.blue) + u32::from(self.yellow)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for AmmoQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{} B{} Y{}", self.red, self.blue, self.yellow)
    }
}
