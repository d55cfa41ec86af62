use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::cards::{AmmoTile, Decks, WeaponCard};
use crate::config::GameConfig;
use crate::env::{GameMap, SquareKind};

use super::PlayerPosition;

/// Mutable content of one square.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquareContent {
    Tile(Option<AmmoTile>),
    Spawn(ArrayVec<WeaponCard, { GameConfig::SPAWN_WEAPONS }>),
}

/// What lies on each square, kept apart from the immutable topology.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardState {
    squares: BTreeMap<PlayerPosition, SquareContent>,
}

impl BoardState {
    /// Empty content for every square of `map`.
    pub fn new(map: &GameMap) -> Self {
        let squares = map
            .squares()
            .map(|square| {
                let content = match square.kind() {
                    SquareKind::Tile => SquareContent::Tile(None),
                    SquareKind::Spawn => SquareContent::Spawn(ArrayVec::new()),
                };
                (square.position(), content)
            })
            .collect();
        Self { squares }
    }

    /// Every square with its content, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerPosition, &SquareContent)> {
        self.squares.iter().map(|(position, content)| (*position, content))
    }

    pub fn content(&self, position: PlayerPosition) -> Option<&SquareContent> {
        self.squares.get(&position)
    }

    pub fn is_ammo_tile_present(&self, position: PlayerPosition) -> bool {
        matches!(self.squares.get(&position), Some(SquareContent::Tile(Some(_))))
    }

    pub fn ammo_tile(&self, position: PlayerPosition) -> Option<&AmmoTile> {
        match self.squares.get(&position) {
            Some(SquareContent::Tile(tile)) => tile.as_ref(),
            _ => None,
        }
    }

    pub fn take_ammo_tile(&mut self, position: PlayerPosition) -> Option<AmmoTile> {
        match self.squares.get_mut(&position) {
            Some(SquareContent::Tile(tile)) => tile.take(),
            _ => None,
        }
    }

    pub fn weapons(&self, position: PlayerPosition) -> &[WeaponCard] {
        match self.squares.get(&position) {
            Some(SquareContent::Spawn(weapons)) => weapons,
            _ => &[],
        }
    }

    pub fn weapon(&self, position: PlayerPosition, index: usize) -> Option<&WeaponCard> {
        self.weapons(position).get(index)
    }

    pub fn take_weapon(&mut self, position: PlayerPosition, index: usize) -> Option<WeaponCard> {
        match self.squares.get_mut(&position) {
            Some(SquareContent::Spawn(weapons)) if index < weapons.len() => {
                Some(weapons.remove(index))
            }
            _ => None,
        }
    }

    /// Lays a discarded weapon on a spawn square, semi-charged.
    pub fn put_weapon(&mut self, position: PlayerPosition, mut weapon: WeaponCard) -> bool {
        match self.squares.get_mut(&position) {
            Some(SquareContent::Spawn(weapons)) if !weapons.is_full() => {
                weapon.drop_to_spawn();
                weapons.push(weapon);
                true
            }
            _ => false,
        }
    }

    /// Refills empty tiles and tops spawn squares up to three weapons.
    /// Picked-up ammo tiles go back to the discard pile of their deck by the
    /// caller; this only draws.
    pub fn refill(&mut self, decks: &mut Decks) {
        for content in self.squares.values_mut() {
            match content {
                SquareContent::Tile(tile) => {
                    if tile.is_none() {
                        *tile = decks.ammo_tiles.draw();
                    }
                }
                SquareContent::Spawn(weapons) => {
                    while !weapons.is_full() {
                        let Some(weapon) = decks.weapons.draw() else {
                            break;
                        };
                        weapons.push(weapon);
                    }
                }
            }
        }
    }
}
