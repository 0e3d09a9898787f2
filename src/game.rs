//! Grid state machine: selection, swaps, match resolution and cascades.

use crate::board::Board;
use crate::candy::{Candy, lerp};
use crate::dispenser::Dispenser;
use crate::level::LevelConfig;
use crate::matching::Match;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Smallest allowed dimension; anything narrower can never hold a run of three both ways.
pub const MIN_DIMENSION: usize = 3;

/// Swap animation progress added per tick.
pub const SWAP_STEP: f32 = 0.05;

/// Rows a falling candy moves per tick.
pub const FALL_STEP: f32 = 0.25;

const MAX_INIT_ATTEMPTS: u32 = 1_000;
const MAX_SHUFFLE_ATTEMPTS: u32 = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must be at least {min}x{min}, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize, min: usize },
    #[error("no playable layout found after {0} attempts")]
    Unsolvable(u32),
    #[error("grid is busy resolving a move")]
    Busy,
}

/// Receives every resolved match group with its points.
pub trait RewardSink {
    fn reward(&mut self, matched: &[Candy], points: u32);
}

impl<F> RewardSink for F
where
    F: FnMut(&[Candy], u32),
{
    fn reward(&mut self, matched: &[Candy], points: u32) {
        self(matched, points);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Settled; waiting for input.
    Idle,
    /// A committed swap is animating.
    Swapping,
    /// Matches are being removed.
    Resolving,
    /// Candies are falling into place.
    Cascading,
}

/// In-flight swap; cleared when the animation completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSwap {
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub progress: f32,
}

/// Maps screen coordinates to grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            cell_width: 1.0,
            cell_height: 1.0,
        }
    }
}

impl Viewport {
    /// Cell (row, col) under the point, or None outside a rows × cols board.
    pub fn cell_at(&self, x: f32, y: f32, rows: usize, cols: usize) -> Option<(usize, usize)> {
        if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return None;
        }
        let gx = (x - self.origin_x) / self.cell_width;
        let gy = (y - self.origin_y) / self.cell_height;
        if !gx.is_finite() || !gy.is_finite() || gx < 0.0 || gy < 0.0 {
            return None;
        }
        let (row, col) = (gy.floor() as usize, gx.floor() as usize);
        (row < rows && col < cols).then_some((row, col))
    }
}

#[inline]
fn adjacent(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

#[derive(Debug)]
pub struct Grid<S> {
    board: Board,
    level: LevelConfig,
    phase: Phase,
    selected: Option<(usize, usize)>,
    swap: Option<PendingSwap>,
    viewport: Viewport,
    dispenser: Dispenser,
    sink: S,
    /// Resolution waves since the last committed swap.
    chain: u32,
    /// Committed swaps since initialization.
    moves: u32,
}

impl<S: RewardSink> Grid<S> {
    pub fn new(rows: usize, cols: usize, sink: S) -> Result<Self, GridError> {
        Self::with_dispenser(rows, cols, sink, Dispenser::from_entropy())
    }

    /// Empty grid; call [`Grid::initialize`] before playing.
    pub fn with_dispenser(
        rows: usize,
        cols: usize,
        sink: S,
        dispenser: Dispenser,
    ) -> Result<Self, GridError> {
        if rows < MIN_DIMENSION || cols < MIN_DIMENSION {
            return Err(GridError::TooSmall {
                rows,
                cols,
                min: MIN_DIMENSION,
            });
        }
        Ok(Self::from_board(
            Board::new(rows, cols),
            LevelConfig::default(),
            sink,
            dispenser,
        ))
    }

    /// Grid over a prepared board (scripted puzzles). No invariants are enforced.
    pub fn from_board(board: Board, level: LevelConfig, sink: S, dispenser: Dispenser) -> Self {
        Self {
            board,
            level,
            phase: Phase::Idle,
            selected: None,
            swap: None,
            viewport: Viewport::default(),
            dispenser,
            sink,
            chain: 0,
            moves: 0,
        }
    }

    /// Fill the board for `level`: no matches and at least one available move.
    pub fn initialize(&mut self, level: u32) -> Result<(), GridError> {
        self.level = LevelConfig::for_level(level);
        self.phase = Phase::Idle;
        self.selected = None;
        self.swap = None;
        self.chain = 0;
        self.moves = 0;

        for attempt in 1..=MAX_INIT_ATTEMPTS {
            self.fill_without_runs();
            if self.board.has_available_moves() || self.shuffle_grid().is_ok() {
                info!(
                    level = self.level.level,
                    colors = self.level.colors,
                    attempt,
                    "grid initialized"
                );
                return Ok(());
            }
        }
        warn!(attempts = MAX_INIT_ATTEMPTS, "giving up on grid initialization");
        Err(GridError::Unsolvable(MAX_INIT_ATTEMPTS))
    }

    /// Row-major fill that never completes a run with the two cells left or above.
    fn fill_without_runs(&mut self) {
        let palette = self.level.palette();
        for row in 0..self.board.rows() {
            for col in 0..self.board.cols() {
                let allowed: Vec<_> = palette
                    .iter()
                    .copied()
                    .filter(|&color| {
                        let same = |r: usize, c: usize| {
                            self.board.get(r, c).is_some_and(|x| x.color == color)
                        };
                        let left = col >= 2 && same(row, col - 1) && same(row, col - 2);
                        let up = row >= 2 && same(row - 1, col) && same(row - 2, col);
                        !left && !up
                    })
                    .collect();
                let color = if allowed.is_empty() {
                    self.dispenser.pick_color(palette)
                } else {
                    self.dispenser.pick_color(&allowed)
                };
                self.board.set(row, col, Some(Candy::regular(color, row, col)));
            }
        }
    }

    /// Pointer input in screen coordinates. Returns whether the click was consumed.
    pub fn handle_input(&mut self, x: f32, y: f32) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        match self
            .viewport
            .cell_at(x, y, self.board.rows(), self.board.cols())
        {
            Some((row, col)) => self.click_cell(row, col),
            None => false,
        }
    }

    /// Selection rules addressed by cell: select, deselect, swap with a neighbour,
    /// or move the selection.
    pub fn click_cell(&mut self, row: usize, col: usize) -> bool {
        if self.phase != Phase::Idle || !self.board.in_bounds(row, col) {
            return false;
        }
        let cell = (row, col);
        match self.selected {
            None => self.selected = Some(cell),
            Some(sel) if sel == cell => self.selected = None,
            Some(sel) if adjacent(sel, cell) => {
                self.selected = None;
                self.swap_candies(sel.0, sel.1, row, col);
            }
            Some(_) => self.selected = Some(cell),
        }
        true
    }

    /// Swap two neighbours if that produces a match; otherwise leave the board as it was.
    pub fn swap_candies(&mut self, r1: usize, c1: usize, r2: usize, c2: usize) -> bool {
        let (a, b) = ((r1, c1), (r2, c2));
        if self.phase != Phase::Idle
            || !self.board.in_bounds(r1, c1)
            || !self.board.in_bounds(r2, c2)
            || !adjacent(a, b)
        {
            return false;
        }

        self.board.swap(a, b);
        if !crate::matching::has_match(&self.board) {
            self.board.swap(a, b);
            debug!(?a, ?b, "swap rejected: no match");
            return false;
        }

        // Candies keep their drawn position and animate into the new slots.
        if let Some(candy) = self.board.get_mut(r1, c1) {
            candy.retarget(r1, c1);
        }
        if let Some(candy) = self.board.get_mut(r2, c2) {
            candy.retarget(r2, c2);
        }
        self.swap = Some(PendingSwap {
            from: a,
            to: b,
            progress: 0.0,
        });
        self.phase = Phase::Swapping;
        self.chain = 0;
        self.moves += 1;
        debug!(?a, ?b, moves = self.moves, "swap committed");
        true
    }

    pub fn find_matches(&self) -> Vec<Match> {
        self.board.find_matches()
    }

    /// Score and remove every current match. Returns whether anything was removed.
    pub fn process_matches(&mut self) -> bool {
        let matches = self.find_matches();
        if matches.is_empty() {
            return false;
        }
        self.phase = Phase::Resolving;
        self.chain += 1;
        for group in &matches {
            let points = group.points();
            debug!(
                len = group.len(),
                orientation = ?group.orientation,
                points,
                chain = self.chain,
                "match resolved"
            );
            self.sink.reward(&group.candies, points);
        }
        for &(row, col) in matches.iter().flat_map(|m| m.cells.iter()) {
            self.board.take(row, col);
        }
        true
    }

    /// Gravity then refill from the top. Falling candies settle over the following ticks.
    pub fn cascade_candies(&mut self) {
        self.swap = None;
        let vacated = self.board.apply_gravity();
        for (col, &count) in vacated.iter().enumerate() {
            for row in 0..count {
                let (color, kind) = self.dispenser.next(&self.level);
                let mut candy = Candy::new(color, kind, row, col);
                // Enter from above the board, keeping the column's order.
                candy.pos.0 = row as f32 - count as f32;
                self.board.set(row, col, Some(candy));
            }
        }
        debug_assert!(self.board.is_full());
        debug!(
            refilled = vacated.iter().sum::<usize>(),
            specials = self.board.iter().filter(|c| c.kind.is_special() && !c.is_settled()).count(),
            "cascade"
        );
        self.phase = Phase::Cascading;
    }

    /// One tick: advance animations, and resolve once everything is at rest.
    pub fn update(&mut self) {
        match self.phase {
            Phase::Idle => {}
            Phase::Swapping => self.advance_swap(),
            Phase::Resolving => self.resolve_or_settle(),
            Phase::Cascading => {
                let mut settled = true;
                for candy in self.board.iter_mut() {
                    settled &= candy.step_towards_target(FALL_STEP);
                }
                if settled {
                    self.resolve_or_settle();
                }
            }
        }
    }

    /// Remove matches and cascade; a board with holes cascades even without a match.
    /// Only a full, match-free board goes back to `Idle`.
    fn resolve_or_settle(&mut self) {
        let matched = self.process_matches();
        if matched || !self.board.is_full() {
            self.cascade_candies();
        } else {
            debug!(chain = self.chain, "board settled");
            self.phase = Phase::Idle;
        }
    }

    fn advance_swap(&mut self) {
        let Some(mut swap) = self.swap else {
            self.phase = Phase::Resolving;
            return;
        };
        swap.progress += SWAP_STEP;
        // Absorb f32 drift so the swap completes on exactly the 1/SWAP_STEP-th tick.
        if swap.progress >= 1.0 - SWAP_STEP / 2.0 {
            swap.progress = 1.0;
        }
        let (a, b) = (swap.from, swap.to);
        let (fa, fb) = ((a.0 as f32, a.1 as f32), (b.0 as f32, b.1 as f32));
        // The candy now in `a` came from `b` and vice versa.
        if let Some(candy) = self.board.get_mut(a.0, a.1) {
            candy.pos = lerp(fb, fa, swap.progress);
        }
        if let Some(candy) = self.board.get_mut(b.0, b.1) {
            candy.pos = lerp(fa, fb, swap.progress);
        }

        if swap.progress < 1.0 {
            self.swap = Some(swap);
            return;
        }
        for slot in [a, b] {
            if let Some(candy) = self.board.get_mut(slot.0, slot.1) {
                candy.settle();
            }
        }
        self.swap = None;
        self.phase = Phase::Resolving;
        self.resolve_or_settle();
    }

    pub fn has_available_moves(&self) -> bool {
        self.board.has_available_moves()
    }

    /// Permute the existing candies until the layout is playable and has no matches.
    pub fn shuffle_grid(&mut self) -> Result<(), GridError> {
        if self.phase != Phase::Idle {
            return Err(GridError::Busy);
        }
        let (rows, cols) = (self.board.rows(), self.board.cols());
        let slots: Vec<(usize, usize)> = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .collect();
        // Permute slots, holes included, so the candy multiset is kept.
        let mut cells: Vec<Option<Candy>> = slots
            .iter()
            .map(|&(row, col)| self.board.get(row, col).copied())
            .collect();
        for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
            self.dispenser.shuffle(&mut cells);
            for (&(row, col), cell) in slots.iter().zip(cells.iter()) {
                let placed = cell.map(|c| Candy::new(c.color, c.kind, row, col));
                self.board.set(row, col, placed);
            }
            if !crate::matching::has_match(&self.board) && self.board.has_available_moves() {
                self.selected = None;
                info!(attempt, "grid shuffled");
                return Ok(());
            }
        }
        debug!(attempts = MAX_SHUFFLE_ATTEMPTS, "shuffle found no playable layout");
        Err(GridError::Unsolvable(MAX_SHUFFLE_ATTEMPTS))
    }
}

impl<S> Grid<S> {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn selected(&self) -> Option<(usize, usize)> {
        self.selected
    }

    pub fn pending_swap(&self) -> Option<PendingSwap> {
        self.swap
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Scripted refills go through here.
    #[cfg(test)]
    pub fn dispenser_mut(&mut self) -> &mut Dispenser {
        &mut self.dispenser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_letters;
    use crate::candy::{CandyColor, CandyKind};

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<(Vec<Candy>, u32)>,
    }

    impl RewardSink for Recorder {
        fn reward(&mut self, matched: &[Candy], points: u32) {
            self.calls.push((matched.to_vec(), points));
        }
    }

    fn scripted(rows: &[&str]) -> Grid<Recorder> {
        Grid::from_board(
            board_from_letters(rows),
            LevelConfig::for_level(1),
            Recorder::default(),
            Dispenser::seeded(11),
        )
    }

    fn settle(grid: &mut Grid<Recorder>) {
        for _ in 0..1_000 {
            if grid.is_idle() {
                return;
            }
            grid.update();
        }
        panic!("grid never settled");
    }

    #[test]
    fn rejects_undersized_grid() {
        let err = Grid::new(2, 8, Recorder::default()).unwrap_err();
        assert_eq!(err, GridError::TooSmall { rows: 2, cols: 8, min: 3 });
    }

    #[test]
    fn initialize_leaves_no_matches_and_a_move() {
        for level in [0, 1, 2, 3, 5, 6, 9, 20] {
            for seed in 0..5 {
                let mut grid =
                    Grid::with_dispenser(8, 8, Recorder::default(), Dispenser::seeded(seed))
                        .unwrap();
                grid.initialize(level).unwrap();
                assert!(grid.find_matches().is_empty(), "level {level} seed {seed}");
                assert!(grid.has_available_moves(), "level {level} seed {seed}");
                assert!(grid.board().is_full());
                assert!(grid.is_idle());
                let palette = grid.level().palette();
                assert!(grid.board().iter().all(|c| palette.contains(&c.color)));
                assert!(grid.board().iter().all(|c| c.kind == CandyKind::Regular));
            }
        }
    }

    #[test]
    fn rejected_swap_leaves_board_identical() {
        let mut grid =
            Grid::with_dispenser(8, 8, Recorder::default(), Dispenser::seeded(5)).unwrap();
        grid.initialize(1).unwrap();

        let mut tried = 0;
        for row in 0..8 {
            for col in 0..7 {
                let mut scratch = grid.board().clone();
                scratch.swap((row, col), (row, col + 1));
                if crate::matching::has_match(&scratch) {
                    continue;
                }
                let before = grid.board().signature();
                assert!(!grid.swap_candies(row, col, row, col + 1));
                assert_eq!(grid.board().signature(), before);
                assert!(grid.is_idle());
                tried += 1;
            }
        }
        assert!(tried > 0);
        assert_eq!(grid.moves(), 0);
    }

    #[test]
    fn swap_requires_adjacent_cells() {
        let mut grid = scripted(&[
            "RRGR", //
            "GBYB", //
            "YGBG", //
        ]);
        assert!(!grid.swap_candies(0, 2, 0, 0));
        assert!(!grid.swap_candies(0, 2, 1, 3));
        assert!(!grid.swap_candies(0, 2, 0, 9));
        assert!(grid.swap_candies(0, 2, 0, 3));
        assert_eq!(grid.phase(), Phase::Swapping);
        assert_eq!(grid.moves(), 1);
    }

    #[test]
    fn run_of_four_scores_forty_in_one_call() {
        let mut grid = scripted(&[
            "GGGGY", //
            "BYRBR", //
            "YRBYB", //
        ]);
        assert!(grid.process_matches());
        let calls = &grid.sink().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.len(), 4);
        assert_eq!(calls[0].1, 40);
        assert!((0..4).all(|c| grid.board().get(0, c).is_none()));
        assert!(grid.board().get(0, 4).is_some());
    }

    #[test]
    fn wrapped_member_adds_twenty() {
        let mut board = board_from_letters(&[
            "RRRY", //
            "BYGB", //
            "YGBY", //
        ]);
        board.set(0, 1, Some(Candy::new(CandyColor::Red, CandyKind::Wrapped, 0, 1)));
        let mut grid = Grid::from_board(
            board,
            LevelConfig::for_level(1),
            Recorder::default(),
            Dispenser::seeded(1),
        );
        assert!(grid.process_matches());
        assert_eq!(grid.sink().calls.len(), 1);
        assert_eq!(grid.sink().calls[0].1, 50);
    }

    #[test]
    fn shared_cell_is_removed_once() {
        let mut grid = scripted(&[
            "GBRGB", //
            "BGRBG", //
            "RRRGB", //
        ]);
        assert!(grid.process_matches());
        assert_eq!(grid.sink().calls.len(), 2);
        assert_eq!(grid.board().iter().count(), 15 - 5);
        assert_eq!(grid.chain(), 1);
    }

    #[test]
    fn cascade_fills_every_column() {
        let mut grid = scripted(&[
            "GBRGB", //
            "B.RB.", //
            "R..GB", //
            "...YG", //
        ]);
        grid.cascade_candies();
        assert_eq!(grid.phase(), Phase::Cascading);
        for col in 0..grid.cols() {
            assert_eq!(grid.board().column_len(col), grid.rows());
        }
        // Original candies dropped by the number of empties below them.
        assert_eq!(
            grid.board().get(3, 0).map(|c| c.color),
            Some(CandyColor::Red)
        );
        assert_eq!(
            grid.board().get(1, 0).map(|c| c.color),
            Some(CandyColor::Green)
        );
    }

    #[test]
    fn refill_uses_queued_candies_top_down() {
        let mut grid = scripted(&[
            "GBR", //
            "...", //
            "BGR", //
        ]);
        grid.dispenser_mut()
            .queue_colors([CandyColor::Yellow, CandyColor::Purple, CandyColor::Orange]);
        // Column 0: G drops to row 1, one slot vacated on top.
        grid.cascade_candies();
        assert_eq!(
            grid.board().get(0, 0).map(|c| c.color),
            Some(CandyColor::Yellow)
        );
        assert_eq!(
            grid.board().get(0, 1).map(|c| c.color),
            Some(CandyColor::Purple)
        );
        assert_eq!(
            grid.board().get(0, 2).map(|c| c.color),
            Some(CandyColor::Orange)
        );
        let spawned = grid.board().get(0, 0).copied().unwrap();
        assert_eq!(spawned.pos.0, -1.0);
    }

    #[test]
    fn chain_reaction_scores_twice_before_idle() {
        let mut grid = scripted(&[
            "POPO", //
            "BYOY", //
            "BPYP", //
            "RRGR", //
            "BOPO", //
        ]);
        assert!(grid.find_matches().is_empty());
        grid.dispenser_mut().queue_colors([
            // First refill: one candy on top of columns 0, 1, 2.
            CandyColor::Green,
            CandyColor::Red,
            CandyColor::Green,
            // Second refill: three candies on top of column 0.
            CandyColor::Yellow,
            CandyColor::Blue,
            CandyColor::Red,
        ]);

        assert!(grid.swap_candies(3, 2, 3, 3));
        for _ in 0..1_000 {
            grid.update();
            if !grid.sink().calls.is_empty() {
                break;
            }
        }
        assert_eq!(grid.sink().calls.len(), 1);
        assert_eq!(grid.sink().calls[0].1, 30);
        assert!(!grid.is_idle());

        settle(&mut grid);
        let calls = &grid.sink().calls;
        assert_eq!(calls.len(), 2);
        assert!(calls[1].0.iter().all(|c| c.color == CandyColor::Blue));
        assert_eq!(calls.iter().map(|(_, p)| p).sum::<u32>(), 60);
        assert_eq!(grid.chain(), 2);
        assert!(grid.find_matches().is_empty());
        assert!(grid.board().is_full());
        assert!(grid.board().iter().all(Candy::is_settled));
    }

    #[test]
    fn detection_waits_for_falling_candies() {
        let mut grid = scripted(&[
            "POPO", //
            "BYOY", //
            "BPYP", //
            "RRGR", //
            "BOPO", //
        ]);
        grid.dispenser_mut().queue_colors([
            CandyColor::Green,
            CandyColor::Red,
            CandyColor::Green,
            CandyColor::Yellow,
            CandyColor::Blue,
            CandyColor::Red,
        ]);
        assert!(grid.swap_candies(3, 2, 3, 3));
        while grid.sink().calls.is_empty() {
            grid.update();
        }
        // Column 0 now holds B B B at rows 2..=4 but candies are still falling.
        assert_eq!(grid.phase(), Phase::Cascading);
        assert_eq!(grid.find_matches().len(), 1);
        grid.update();
        assert_eq!(grid.sink().calls.len(), 1);
    }

    #[test]
    fn swap_animation_runs_twenty_ticks() {
        let mut grid = scripted(&[
            "RRGR", //
            "GBYB", //
            "YGBG", //
        ]);
        assert!(grid.swap_candies(0, 2, 0, 3));
        for _ in 0..19 {
            grid.update();
            assert_eq!(grid.phase(), Phase::Swapping);
        }
        let swap = grid.pending_swap().unwrap();
        assert!(swap.progress > 0.9 && swap.progress < 1.0);
        grid.update();
        assert!(grid.pending_swap().is_none());
        assert_eq!(grid.sink().calls.len(), 1);
        assert_eq!(grid.phase(), Phase::Cascading);
    }

    #[test]
    fn click_selection_rules() {
        let mut grid = scripted(&[
            "RRGR", //
            "GBYB", //
            "YGBG", //
        ]);
        assert!(grid.click_cell(1, 1));
        assert_eq!(grid.selected(), Some((1, 1)));
        assert!(grid.click_cell(1, 1));
        assert_eq!(grid.selected(), None);

        assert!(grid.click_cell(0, 0));
        assert!(grid.click_cell(2, 3));
        assert_eq!(grid.selected(), Some((2, 3)));

        // Adjacent but no match: selection cleared, board unchanged.
        let before = grid.board().signature();
        assert!(grid.click_cell(2, 2));
        assert_eq!(grid.selected(), None);
        assert_eq!(grid.board().signature(), before);
        assert!(grid.is_idle());

        assert!(grid.click_cell(0, 2));
        assert!(grid.click_cell(0, 3));
        assert_eq!(grid.phase(), Phase::Swapping);
        assert!(!grid.click_cell(1, 1));
        assert_eq!(grid.selected(), None);
    }

    #[test]
    fn pointer_input_maps_through_viewport() {
        let mut grid = scripted(&[
            "RRGR", //
            "GBYB", //
            "YGBG", //
        ]);
        grid.set_viewport(Viewport {
            origin_x: 10.0,
            origin_y: 5.0,
            cell_width: 4.0,
            cell_height: 2.0,
        });
        assert!(grid.handle_input(15.0, 7.5));
        assert_eq!(grid.selected(), Some((1, 1)));

        for (x, y) in [(9.9, 6.0), (26.0, 6.0), (12.0, 11.0), (12.0, 4.0), (f32::NAN, 6.0)] {
            assert!(!grid.handle_input(x, y));
            assert_eq!(grid.selected(), Some((1, 1)));
        }
    }

    #[test]
    fn input_ignored_while_busy() {
        let mut grid = scripted(&[
            "RRGR", //
            "GBYB", //
            "YGBG", //
        ]);
        assert!(grid.swap_candies(0, 2, 0, 3));
        assert!(!grid.handle_input(0.5, 0.5));
        assert_eq!(grid.selected(), None);
        assert_eq!(grid.shuffle_grid(), Err(GridError::Busy));
    }

    #[test]
    fn shuffle_keeps_candies_and_is_playable() {
        let mut grid =
            Grid::with_dispenser(6, 6, Recorder::default(), Dispenser::seeded(8)).unwrap();
        grid.initialize(3).unwrap();
        let mut before: Vec<_> = grid.board().iter().map(|c| c.color.index()).collect();
        grid.shuffle_grid().unwrap();
        let mut after: Vec<_> = grid.board().iter().map(|c| c.color.index()).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
        assert!(grid.find_matches().is_empty());
        assert!(grid.has_available_moves());
    }

    #[test]
    fn resolving_tick_refills_cleared_slots() {
        let mut grid = scripted(&["YYYB", "BGRG", "GRBR"]);
        assert!(grid.process_matches());
        assert_eq!(grid.phase(), Phase::Resolving);
        assert!(!grid.board().is_full());
        grid.update();
        assert!(grid.board().is_full());
        assert_eq!(grid.phase(), Phase::Cascading);
        settle(&mut grid);
        assert!(grid.board().is_full());
        assert!(grid.find_matches().is_empty());
    }

    #[test]
    fn resolving_with_holes_but_no_match_still_cascades() {
        let mut grid = scripted(&["R.GB", "GBYR", "YRBG"]);
        grid.phase = Phase::Resolving;
        grid.update();
        assert!(grid.board().is_full());
        settle(&mut grid);
        assert!(grid.board().is_full());
    }

    #[test]
    fn shuffle_permutes_holes_too() {
        let mut grid = scripted(&["RGB.", "GBYR", "YRBG"]);
        let colors = |g: &Grid<Recorder>| {
            let mut v: Vec<_> = g.board().iter().map(|c| c.color.index()).collect();
            v.sort_unstable();
            v
        };
        let before = colors(&grid);
        let _ = grid.shuffle_grid();
        assert_eq!(grid.board().iter().count(), 11);
        assert_eq!(colors(&grid), before);
        assert!(grid.board().iter().all(|c| c.is_settled()));
    }

    #[test]
    fn cascade_during_swap_drops_the_pending_swap() {
        let mut grid = scripted(&[
            "RRGR", //
            "GBYB", //
            "YGBG", //
        ]);
        assert!(grid.swap_candies(0, 2, 0, 3));
        assert!(grid.pending_swap().is_some());
        grid.cascade_candies();
        assert!(grid.pending_swap().is_none());
        settle(&mut grid);
        assert!(grid.pending_swap().is_none());
        assert!(grid.board().is_full());
    }

    #[test]
    fn closures_are_reward_sinks() {
        let mut total = 0u32;
        {
            let mut grid = Grid::from_board(
                board_from_letters(&["YYYB", "BGRG", "GRBR"]),
                LevelConfig::for_level(1),
                |_: &[Candy], points: u32| total += points,
                Dispenser::seeded(2),
            );
            assert!(grid.process_matches());
        }
        assert_eq!(total, 30);
    }
}
