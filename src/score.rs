//! Scoreboard: the app's reward sink. Totals, floating popups and freshly cleared cells.

use crate::candy::{Candy, CandyColor};
use crate::game::RewardSink;

/// Popups drift up one row every this many ms.
const POPUP_STEP_MS: u32 = 150;
/// Popups disappear after this many ms.
const POPUP_LIFETIME_MS: u32 = 1500;

#[derive(Debug, Clone)]
pub struct ScorePopup {
    /// Board row as a float so the popup can drift above the top edge.
    pub row: f32,
    pub col: usize,
    pub amount: u32,
    pub color: CandyColor,
    pub age_ms: u32,
}

#[derive(Debug, Default)]
pub struct Scoreboard {
    pub score: u32,
    /// Match groups resolved.
    pub groups: u32,
    pub candies_cleared: u32,
    /// Highest single-group payout.
    pub best_group: u32,
    pub popups: Vec<ScorePopup>,
    /// Cells cleared since the last `take_cleared`.
    cleared: Vec<(usize, usize)>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain cells cleared since the previous call (feeds the clear flash).
    pub fn take_cleared(&mut self) -> Vec<(usize, usize)> {
        std::mem::take(&mut self.cleared)
    }

    pub fn tick_popups(&mut self, delta_ms: u32) {
        self.popups.retain_mut(|p| {
            let old_steps = p.age_ms / POPUP_STEP_MS;
            p.age_ms += delta_ms;
            let new_steps = p.age_ms / POPUP_STEP_MS;
            p.row -= (new_steps - old_steps) as f32 * 0.5;
            p.age_ms < POPUP_LIFETIME_MS
        });
    }
}

impl RewardSink for Scoreboard {
    fn reward(&mut self, matched: &[Candy], points: u32) {
        self.score = self.score.saturating_add(points);
        self.groups += 1;
        self.candies_cleared += matched.len() as u32;
        self.best_group = self.best_group.max(points);
        self.cleared.extend(matched.iter().map(Candy::slot));
        if let Some(first) = matched.first() {
            let (row, col) = first.slot();
            self.popups.push(ScorePopup {
                row: row as f32,
                col,
                amount: points,
                color: first.color,
                age_ms: 0,
            });
        }
    }
}
