//! Weapon, powerup and ammo tile cards plus the decks they are drawn from.
mod ammo_tile;
mod deck;
mod powerup;
mod weapon;

pub use ammo_tile::AmmoTile;
pub use deck::{Deck, Decks};
pub use powerup::{PowerupCard, PowerupKind};
pub use weapon::{WeaponCard, WeaponError, WeaponState, WeaponTrigger};
