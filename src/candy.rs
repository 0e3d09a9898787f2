//! Candy tokens: colour, special kind and visual interpolation state.

/// Fewest colours any level plays with.
pub const MIN_COLORS: usize = 4;

/// Candy colours. The active palette is always a prefix of [`CandyColor::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandyColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl CandyColor {
    pub const ALL: [Self; 6] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
    ];

    /// First `count` colours, clamped to `MIN_COLORS..=6`.
    pub fn palette(count: usize) -> &'static [Self] {
        &Self::ALL[..count.clamp(MIN_COLORS, Self::ALL.len())]
    }

    /// Colour index 0..6 for theme.candy_color().
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Special kind of a candy. Kinds only change how much a match is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CandyKind {
    #[default]
    Regular,
    Striped,
    Wrapped,
    ColorBomb,
}

impl CandyKind {
    pub const SPECIALS: [Self; 3] = [Self::Striped, Self::Wrapped, Self::ColorBomb];

    /// Points added on top of the base score for each member of this kind.
    pub fn bonus(self) -> u32 {
        match self {
            Self::Regular => 0,
            Self::Striped => 10,
            Self::Wrapped => 20,
            Self::ColorBomb => 50,
        }
    }

    pub fn is_special(self) -> bool {
        self != Self::Regular
    }
}

/// A candy on the board. `pos` is where it is drawn, `target` the slot it belongs to;
/// both are in grid units (row, col).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candy {
    pub color: CandyColor,
    pub kind: CandyKind,
    pub pos: (f32, f32),
    pub target: (f32, f32),
}

impl Candy {
    /// Candy at rest in slot (row, col).
    pub fn new(color: CandyColor, kind: CandyKind, row: usize, col: usize) -> Self {
        let slot = (row as f32, col as f32);
        Self {
            color,
            kind,
            pos: slot,
            target: slot,
        }
    }

    pub fn regular(color: CandyColor, row: usize, col: usize) -> Self {
        Self::new(color, CandyKind::Regular, row, col)
    }

    /// Two candies continue a run when their colours agree.
    #[inline]
    pub fn matches(&self, other: &Self) -> bool {
        self.color == other.color
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.pos == self.target
    }

    /// Slot this candy is heading for.
    pub fn slot(&self) -> (usize, usize) {
        (
            self.target.0.max(0.0).round() as usize,
            self.target.1.max(0.0).round() as usize,
        )
    }

    /// Retarget to a slot without moving the drawn position (starts an animation).
    pub fn retarget(&mut self, row: usize, col: usize) {
        self.target = (row as f32, col as f32);
    }

    /// Snap to the target slot.
    pub fn settle(&mut self) {
        self.pos = self.target;
    }

    /// Move towards target by at most `step` per axis. Returns true when at rest.
    pub fn step_towards_target(&mut self, step: f32) -> bool {
        self.pos.0 = approach(self.pos.0, self.target.0, step);
        self.pos.1 = approach(self.pos.1, self.target.1, step);
        self.is_settled()
    }
}

fn approach(from: f32, to: f32, step: f32) -> f32 {
    if (to - from).abs() <= step {
        to
    } else if to > from {
        from + step
    } else {
        from - step
    }
}

/// Linear interpolation between two grid positions; `t` is clamped to 0..=1.
pub fn lerp(from: (f32, f32), to: (f32, f32), t: f32) -> (f32, f32) {
    let t = t.clamp(0.0, 1.0);
    (
        from.0 + (to.0 - from.0) * t,
        from.1 + (to.1 - from.1) * t,
    )
}
