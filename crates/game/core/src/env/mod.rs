//! Read-only world data.
//!
//! The static map topology and the deterministic RNG used to shuffle decks.
mod map;
mod rng;

pub use map::{
    Edge, GameMap, GameMapBuilder, MapDimensions, MapError, MovementRules, Square, SquareKind,
};
pub use rng::{PcgRng, RandomSource, shuffle, swap_seed};
