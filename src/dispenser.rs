//! Candy dispenser: the single source of randomness for the grid, with an optional
//! queue of scripted candies that refills hand out first.

use crate::candy::{CandyColor, CandyKind};
use crate::level::LevelConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Dispenser {
    rng: StdRng,
    queued: VecDeque<(CandyColor, CandyKind)>,
}

impl Dispenser {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            queued: VecDeque::new(),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            queued: VecDeque::new(),
        }
    }

    /// Queue regular candies to be dispensed (FIFO) before any random ones.
    #[cfg(test)]
    pub fn queue_colors(&mut self, colors: impl IntoIterator<Item = CandyColor>) {
        self.queued
            .extend(colors.into_iter().map(|c| (c, CandyKind::Regular)));
    }

    #[cfg(test)]
    pub fn queue(&mut self, color: CandyColor, kind: CandyKind) {
        self.queued.push_back((color, kind));
    }

    #[cfg(test)]
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Next refill candy: queued first, otherwise a random palette colour that is
    /// special with the level's spawn chance.
    pub fn next(&mut self, level: &LevelConfig) -> (CandyColor, CandyKind) {
        if let Some(next) = self.queued.pop_front() {
            return next;
        }
        let color = self.pick_color(level.palette());
        let kind = if level.special_chance > 0.0 && self.rng.gen_bool(level.special_chance) {
            CandyKind::SPECIALS[self.rng.gen_range(0..CandyKind::SPECIALS.len())]
        } else {
            CandyKind::Regular
        };
        (color, kind)
    }

    /// Uniform pick from `allowed`; falls back to red on an empty slice.
    pub fn pick_color(&mut self, allowed: &[CandyColor]) -> CandyColor {
        allowed
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(CandyColor::Red)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for Dispenser {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_candies_come_first_in_order() {
        let mut d = Dispenser::seeded(7);
        d.queue_colors([CandyColor::Blue, CandyColor::Green]);
        d.queue(CandyColor::Red, CandyKind::Striped);
        let level = LevelConfig::for_level(1);
        assert_eq!(d.next(&level), (CandyColor::Blue, CandyKind::Regular));
        assert_eq!(d.next(&level), (CandyColor::Green, CandyKind::Regular));
        assert_eq!(d.next(&level), (CandyColor::Red, CandyKind::Striped));
        assert_eq!(d.queued_len(), 0);
    }

    #[test]
    fn random_candies_stay_in_palette() {
        let mut d = Dispenser::seeded(42);
        let level = LevelConfig::for_level(1);
        for _ in 0..500 {
            let (color, kind) = d.next(&level);
            assert!(level.palette().contains(&color));
            assert_eq!(kind, CandyKind::Regular);
        }
    }

    #[test]
    fn higher_levels_spawn_some_specials() {
        let mut d = Dispenser::seeded(3);
        let level = LevelConfig::for_level(10);
        let specials = (0..2000).filter(|_| d.next(&level).1.is_special()).count();
        assert!(specials > 0);
        assert!(specials < 1000);
    }

    #[test]
    fn same_seed_same_sequence() {
        let level = LevelConfig::for_level(4);
        let mut a = Dispenser::seeded(99);
        let mut b = Dispenser::seeded(99);
        for _ in 0..50 {
            assert_eq!(a.next(&level), b.next(&level));
        }
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut d = Dispenser::seeded(1);
        let mut items: Vec<u32> = (0..32).collect();
        d.shuffle(&mut items);
        items.sort_unstable();
        assert_eq!(items, (0..32).collect::<Vec<_>>());
    }
}
