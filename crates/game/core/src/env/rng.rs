//! Deterministic random number generation.
//!
//! Decks are shuffled from a seed so that a game can be replayed: the same
//! seed and the same sequence of reshuffles always yield the same draws.

/// Source of seeded randomness: equal seeds always give equal values.
pub trait RandomSource: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// A value in `0..=max`.
    fn up_to(&self, seed: u64, max: u32) -> u32 {
        match max.checked_add(1) {
            Some(bound) => self.next_u32(seed) % bound,
            None => self.next_u32(seed),
        }
    }
}

/// PCG-XSH-RR step over a 64-bit state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;
}

impl RandomSource for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = seed
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        xorshifted.rotate_right((state >> 59) as u32)
    }
}

/// Seed for swap `index` of reshuffle number `pass` of a deck.
pub fn swap_seed(deck_seed: u64, pass: u64, index: usize) -> u64 {
    let mut hash = deck_seed;
    hash ^= pass.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (index as u64).wrapping_mul(0x517cc1b727220a95);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Seeded Fisher-Yates pass over `items`.
pub fn shuffle<T>(items: &mut [T], rng: &dyn RandomSource, deck_seed: u64, pass: u64) {
    for i in (1..items.len()).rev() {
        let j = rng.up_to(swap_seed(deck_seed, pass, i), i as u32) as usize;
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_order() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        shuffle(&mut a, &PcgRng, 42, 0);
        shuffle(&mut b, &PcgRng, 42, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items, &PcgRng, 7, 3);
        items.sort_unstable();
        assert_eq!(items, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn another_pass_reorders_the_deck() {
        let mut first: Vec<u32> = (0..20).collect();
        let mut second = first.clone();
        shuffle(&mut first, &PcgRng, 42, 0);
        shuffle(&mut second, &PcgRng, 42, 1);
        assert_ne!(first, second);
    }

    #[test]
    fn up_to_stays_in_bounds() {
        for seed in 0..200 {
            assert!(PcgRng.up_to(seed, 5) <= 5);
        }
        assert_eq!(PcgRng.up_to(9, 0), 0);
    }
}
