use crate::env::{PcgRng, shuffle};

use super::{AmmoTile, PowerupCard, WeaponCard};

/// Draw pile with an optional discard pile that is reshuffled back in when
/// the draw pile runs out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck<T> {
    draw_pile: Vec<T>,
    discard_pile: Vec<T>,
    reshuffle: bool,
    seed: u64,
    shuffles: u64,
}

impl<T> Deck<T> {
    /// Builds a deck and shuffles it once with `seed`.
    pub fn new(cards: Vec<T>, reshuffle: bool, seed: u64) -> Self {
        let mut deck = Self {
            draw_pile: cards,
            discard_pile: Vec::new(),
            reshuffle,
            seed,
            shuffles: 0,
        };
        deck.shuffle();
        deck
    }

    /// Keeps the given order; the last card is drawn first.
    pub fn stacked(cards: Vec<T>, reshuffle: bool) -> Self {
        Self {
            draw_pile: cards,
            discard_pile: Vec::new(),
            reshuffle,
            seed: 0,
            shuffles: 0,
        }
    }

    pub fn shuffle(&mut self) {
        shuffle(&mut self.draw_pile, &PcgRng, self.seed, self.shuffles);
        self.shuffles += 1;
    }

    pub fn draw(&mut self) -> Option<T> {
        if self.draw_pile.is_empty() && self.reshuffle && !self.discard_pile.is_empty() {
            self.draw_pile.append(&mut self.discard_pile);
            self.shuffle();
        }
        self.draw_pile.pop()
    }

    pub fn discard(&mut self, card: T) {
        self.discard_pile.push(card);
    }

    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    pub fn discarded(&self) -> usize {
        self.discard_pile.len()
    }
}

/// The three decks a game draws from.
///
/// Weapons are never reshuffled: a weapon leaves the game only by being
/// bought and replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decks {
    pub weapons: Deck<WeaponCard>,
    pub powerups: Deck<PowerupCard>,
    pub ammo_tiles: Deck<AmmoTile>,
}

impl Decks {
    pub fn new(
        weapons: Vec<WeaponCard>,
        powerups: Vec<PowerupCard>,
        ammo_tiles: Vec<AmmoTile>,
        seed: u64,
    ) -> Self {
        Self {
            weapons: Deck::new(weapons, false, seed),
            powerups: Deck::new(powerups, true, seed.wrapping_add(1)),
            ammo_tiles: Deck::new(ammo_tiles, true, seed.wrapping_add(2)),
        }
    }
}
