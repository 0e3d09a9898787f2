//! Match detection: runs of three or more same-coloured candies in a row or column.

use crate::board::Board;
use crate::candy::Candy;

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;
/// Points per candy in a match before bonuses.
pub const BASE_POINTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One maximal run. `cells` and `candies` are in scan order (left→right or top→bottom).
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub orientation: Orientation,
    pub cells: Vec<(usize, usize)>,
    pub candies: Vec<Candy>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn points(&self) -> u32 {
        points_for(&self.candies)
    }
}

/// `len * 10` plus each member's kind bonus.
pub fn points_for(candies: &[Candy]) -> u32 {
    let base = candies.len() as u32 * BASE_POINTS;
    candies.iter().map(|c| c.kind.bonus()).sum::<u32>() + base
}

/// All rows first, then all columns. A candy may belong to one group of each orientation.
pub fn find_matches(board: &Board) -> Vec<Match> {
    let mut out = Vec::new();
    for row in 0..board.rows() {
        scan_line(
            board,
            (0..board.cols()).map(|col| (row, col)),
            Orientation::Horizontal,
            &mut out,
        );
    }
    for col in 0..board.cols() {
        scan_line(
            board,
            (0..board.rows()).map(|row| (row, col)),
            Orientation::Vertical,
            &mut out,
        );
    }
    out
}

/// Cheaper than `find_matches` when only existence matters.
pub fn has_match(board: &Board) -> bool {
    let horizontal = (0..board.rows()).any(|row| {
        longest_run(board, (0..board.cols()).map(|col| (row, col))) >= MIN_RUN
    });
    horizontal
        || (0..board.cols()).any(|col| {
            longest_run(board, (0..board.rows()).map(|row| (row, col))) >= MIN_RUN
        })
}

fn scan_line<I>(board: &Board, line: I, orientation: Orientation, out: &mut Vec<Match>)
where
    I: Iterator<Item = (usize, usize)>,
{
    let mut run: Vec<(usize, usize)> = Vec::new();
    let mut prev: Option<Candy> = None;
    for (row, col) in line {
        let here = board.get(row, col).copied();
        match (prev, here) {
            (Some(p), Some(h)) if p.matches(&h) => {}
            _ => flush(board, &mut run, orientation, out),
        }
        if here.is_some() {
            run.push((row, col));
        }
        prev = here;
    }
    flush(board, &mut run, orientation, out);
}

fn flush(board: &Board, run: &mut Vec<(usize, usize)>, orientation: Orientation, out: &mut Vec<Match>) {
    if run.len() >= MIN_RUN {
        let cells = std::mem::take(run);
        let candies = cells
            .iter()
            .filter_map(|&(r, c)| board.get(r, c).copied())
            .collect();
        out.push(Match {
            orientation,
            cells,
            candies,
        });
    } else {
        run.clear();
    }
}

fn longest_run<I>(board: &Board, line: I) -> usize
where
    I: Iterator<Item = (usize, usize)>,
{
    let mut best = 0;
    let mut len = 0;
    let mut prev: Option<Candy> = None;
    for (row, col) in line {
        let here = board.get(row, col).copied();
        len = match (prev, here) {
            (Some(p), Some(h)) if p.matches(&h) => len + 1,
            (_, Some(_)) => 1,
            (_, None) => 0,
        };
        best = best.max(len);
        prev = here;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_letters;
    use crate::candy::{CandyColor, CandyKind};

    #[test]
    fn run_of_five_is_one_group() {
        let b = board_from_letters(&[
            "RRRRRG", //
            "GBYBGB", //
        ]);
        let m = find_matches(&b);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].len(), 5);
        assert_eq!(m[0].orientation, Orientation::Horizontal);
        assert_eq!(m[0].cells.first(), Some(&(0, 0)));
        assert_eq!(m[0].points(), 50);
    }

    #[test]
    fn pairs_and_gaps_do_not_match() {
        let b = board_from_letters(&[
            "RR.RRG", //
            "GGBGGB", //
        ]);
        assert!(find_matches(&b).is_empty());
        assert!(!has_match(&b));
    }

    #[test]
    fn crossing_runs_report_both_groups() {
        let b = board_from_letters(&[
            "GBRGB", //
            "BGRBG", //
            "RRRGB", //
        ]);
        let m = find_matches(&b);
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].orientation, Orientation::Horizontal);
        assert_eq!(m[1].orientation, Orientation::Vertical);
        assert_eq!(m[1].cells, vec![(0, 2), (1, 2), (2, 2)]);
        assert!(m[0].cells.contains(&(2, 2)));
    }

    #[test]
    fn run_at_end_of_line_is_flushed() {
        let b = board_from_letters(&[
            "GB", //
            "BG", //
            "YG", //
            "BG", //
        ]);
        let m = find_matches(&b);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].cells, vec![(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn special_kinds_join_runs_and_add_bonus() {
        let mut b = board_from_letters(&["BBBG"]);
        b.set(0, 1, Some(Candy::new(CandyColor::Blue, CandyKind::Wrapped, 0, 1)));
        let m = find_matches(&b);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].points(), 50);

        b.set(0, 0, Some(Candy::new(CandyColor::Blue, CandyKind::Striped, 0, 0)));
        b.set(0, 2, Some(Candy::new(CandyColor::Blue, CandyKind::ColorBomb, 0, 2)));
        assert_eq!(find_matches(&b)[0].points(), 30 + 10 + 20 + 50);
    }
}
