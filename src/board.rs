//! Board storage: a row-major grid of candy slots plus gravity and move search.

use crate::candy::Candy;
#[cfg(test)]
use crate::candy::{CandyColor, CandyKind};
use crate::matching::{self, Match};

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// cells[row * cols + col]; row 0 is the top.
    cells: Vec<Option<Candy>>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&Candy> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells[self.idx(row, col)].as_ref()
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Candy> {
        if !self.in_bounds(row, col) {
            return None;
        }
        let i = self.idx(row, col);
        self.cells[i].as_mut()
    }

    pub fn set(&mut self, row: usize, col: usize, candy: Option<Candy>) {
        if self.in_bounds(row, col) {
            let i = self.idx(row, col);
            self.cells[i] = candy;
        }
    }

    pub fn take(&mut self, row: usize, col: usize) -> Option<Candy> {
        if !self.in_bounds(row, col) {
            return None;
        }
        let i = self.idx(row, col);
        self.cells[i].take()
    }

    /// Exchange two slots. Out-of-bounds coordinates are ignored.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        if self.in_bounds(a.0, a.1) && self.in_bounds(b.0, b.1) {
            let (ia, ib) = (self.idx(a.0, a.1), self.idx(b.0, b.1));
            self.cells.swap(ia, ib);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candy> {
        self.cells.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Candy> {
        self.cells.iter_mut().flatten()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    #[cfg(test)]
    pub fn column_len(&self, col: usize) -> usize {
        (0..self.rows).filter(|&r| self.get(r, col).is_some()).count()
    }

    /// Colour and kind per slot; what a player can see once animations finish.
    #[cfg(test)]
    pub fn signature(&self) -> Vec<Option<(CandyColor, CandyKind)>> {
        self.cells
            .iter()
            .map(|c| c.map(|c| (c.color, c.kind)))
            .collect()
    }

    pub fn find_matches(&self) -> Vec<Match> {
        matching::find_matches(self)
    }

    /// True if some horizontal or vertical neighbour swap would produce a match.
    /// Works on a scratch copy; `self` is untouched.
    pub fn has_available_moves(&self) -> bool {
        let mut scratch = self.clone();
        for row in 0..self.rows {
            for col in 0..self.cols {
                for (dr, dc) in [(0, 1), (1, 0)] {
                    let other = (row + dr, col + dc);
                    if !self.in_bounds(other.0, other.1) {
                        continue;
                    }
                    scratch.swap((row, col), other);
                    let found = matching::has_match(&scratch);
                    scratch.swap((row, col), other);
                    if found {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Collapse every column in one pass: each candy drops by the number of empty
    /// slots below it. Candies keep their drawn position and are retargeted.
    /// Returns the number of vacated top slots per column.
    pub fn apply_gravity(&mut self) -> Vec<usize> {
        let mut vacated = Vec::with_capacity(self.cols);
        for col in 0..self.cols {
            let mut write = self.rows;
            for row in (0..self.rows).rev() {
                if let Some(mut candy) = self.take(row, col) {
                    write -= 1;
                    candy.retarget(write, col);
                    self.set(write, col, Some(candy));
                }
            }
            vacated.push(write);
        }
        vacated
    }
}

/// Build a board from rows of letters: R O Y G B P for regular candies, `.` for empty.
#[cfg(test)]
pub(crate) fn board_from_letters(rows: &[&str]) -> Board {
    let cols = rows.first().map_or(0, |r| r.len());
    let mut board = Board::new(rows.len(), cols);
    for (r, line) in rows.iter().enumerate() {
        for (c, ch) in line.chars().enumerate() {
            let color = match ch {
                'R' => CandyColor::Red,
                'O' => CandyColor::Orange,
                'Y' => CandyColor::Yellow,
                'G' => CandyColor::Green,
                'B' => CandyColor::Blue,
                'P' => CandyColor::Purple,
                _ => continue,
            };
            board.set(r, c, Some(Candy::regular(color, r, c)));
        }
    }
    board
}
