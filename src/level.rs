//! Level → palette size and special-candy spawn chance.

use crate::candy::CandyColor;

/// Special spawn chance added per level above 1.
const SPECIAL_CHANCE_PER_LEVEL: f64 = 0.02;
const MAX_SPECIAL_CHANCE: f64 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub level: u32,
    /// Number of active colours (4..=6).
    pub colors: usize,
    /// Probability that a refilled candy is special.
    pub special_chance: f64,
}

impl LevelConfig {
    /// Level 0 is treated as level 1.
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let colors = match level {
            1..=2 => 4,
            3..=5 => 5,
            _ => 6,
        };
        let special_chance =
            (f64::from(level - 1) * SPECIAL_CHANCE_PER_LEVEL).min(MAX_SPECIAL_CHANCE);
        Self {
            level,
            colors,
            special_chance,
        }
    }

    pub fn palette(&self) -> &'static [CandyColor] {
        CandyColor::palette(self.colors)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::for_level(1)
    }
}
