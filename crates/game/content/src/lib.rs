//! Static game content and its loaders.
//!
//! - Board layouts (data-driven via RON, see [`loaders::MapKind`])
//! - The weapon catalog, written as effect descriptors
//! - Powerup and ammo tile decks
//!
//! Content is handed to the core once, when a game is created, and never
//! changes afterwards.

pub mod decks;
pub mod weapons;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use decks::{ammo_tile_deck, powerup_deck, standard_decks};
pub use weapons::weapon_catalog;

#[cfg(feature = "loaders")]
pub use loaders::{MapKind, MapLoader};
