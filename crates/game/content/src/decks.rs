//! Powerup and ammo tile decks.

use adrenaline_core::{AmmoColor, AmmoTile, Decks, PowerupCard, PowerupKind};
use strum::IntoEnumIterator;

use crate::weapons::weapon_catalog;

const AMMO_COLORS: [AmmoColor; 3] = [AmmoColor::Red, AmmoColor::Blue, AmmoColor::Yellow];

/// Copies of each (kind, colour) powerup.
const POWERUP_COPIES: usize = 2;

/// Copies of each distinct ammo tile.
const TILE_COPIES: usize = 3;

/// Two of every powerup in every colour.
pub fn powerup_deck() -> Vec<PowerupCard> {
    let mut cards = Vec::with_capacity(4 * AMMO_COLORS.len() * POWERUP_COPIES);
    for kind in PowerupKind::iter() {
        for color in AMMO_COLORS {
            cards.extend(std::iter::repeat_n(PowerupCard::new(kind, color), POWERUP_COPIES));
        }
    }
    cards
}

/// Tiles with one colour and two of another, tiles with a powerup and two
/// cubes of one colour, and tiles with a powerup and two different cubes.
pub fn ammo_tile_deck() -> Vec<AmmoTile> {
    let mut distinct = Vec::new();
    for single in AMMO_COLORS {
        for double in AMMO_COLORS.into_iter().filter(|&other| other != single) {
            distinct.push(AmmoTile::with_ammo([single, double, double]));
        }
    }
    for (index, &first) in AMMO_COLORS.iter().enumerate() {
        distinct.push(AmmoTile::with_powerup([first, first]));
        for &second in &AMMO_COLORS[index + 1..] {
            distinct.push(AmmoTile::with_powerup([first, second]));
        }
    }

    distinct
        .iter()
        .flat_map(|tile| std::iter::repeat_n(tile.clone(), TILE_COPIES))
        .collect()
}

/// Shuffled weapon, powerup and ammo tile decks for one match.
pub fn standard_decks(seed: u64) -> Decks {
    Decks::new(weapon_catalog(), powerup_deck(), ammo_tile_deck(), seed)
}
