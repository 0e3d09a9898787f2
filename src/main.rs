//! Candytui — match-3 candy puzzle in the terminal.

mod app;
mod board;
mod candy;
mod dispenser;
mod game;
mod highscores;
mod input;
mod level;
mod matching;
mod score;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub level: u32,
    pub mode: GameMode,
    pub move_limit: u32,
    pub time_limit_secs: u64,
    pub seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "theme could not be loaded, using defaults");
        theme::Theme::default()
    });
    let config = GameConfig {
        rows: usize::from(args.rows),
        cols: usize::from(args.cols),
        level: args.level.unwrap_or_else(|| args.difficulty.base_level()),
        mode: args.mode,
        move_limit: args.moves,
        time_limit_secs: args.time_limit,
        seed: args.seed,
    };
    tracing::info!(?config, "starting candytui");
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Log to a file only; anything on stdout would corrupt the terminal UI.
fn init_logging(path: Option<&std::path::Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Match-3 candy puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "candytui",
    version,
    about = "Match-3 candy puzzle in the terminal. Swap neighbours to line up three or more of a colour.",
    long_about = "Candytui is a match-3 puzzle game for the terminal.\n\n\
        Swap two neighbouring candies to line up three or more of the same colour. \
        Matched candies are removed, the rest fall, new ones drop in from the top and \
        chain reactions score again. Swaps that make no match are undone.\n\n\
        Striped, wrapped and colour-bomb candies appear from level 2 and add bonus points.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor    Enter / Space  Select / swap\n  Mouse          Click to select, click a neighbour to swap\n  P  Pause    R  Restart    Q / Esc  Quit"
)]
pub struct Args {
    /// Game mode: endless, moves (limited number of swaps) or timed.
    #[arg(short, long, default_value = "endless")]
    pub mode: GameMode,

    /// Difficulty: picks the starting level (easy 1, medium 3, hard 6).
    #[arg(short, long, default_value = "easy")]
    pub difficulty: Difficulty,

    /// Explicit level; overrides --difficulty. More colours and specials at higher levels.
    #[arg(long, value_name = "N")]
    pub level: Option<u32>,

    /// Board rows (clamped to the terminal).
    #[arg(long, default_value = "8", value_name = "ROWS", value_parser = clap::value_parser!(u16).range(3..=24))]
    pub rows: u16,

    /// Board columns (clamped to the terminal).
    #[arg(long, default_value = "8", value_name = "COLS", value_parser = clap::value_parser!(u16).range(3..=24))]
    pub cols: u16,

    /// In mode 'moves': number of swaps allowed.
    #[arg(long, default_value = "30", value_name = "N")]
    pub moves: u32,

    /// In mode 'timed': time limit in seconds.
    #[arg(long, default_value = "120", value_name = "SECS")]
    pub time_limit: u64,

    /// Seed for reproducible boards.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Game ticks per second (swap and fall animation speed).
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Disable the flash over cleared candies.
    #[arg(long)]
    pub no_animation: bool,

    /// Skip main menu and start game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GameMode {
    #[default]
    Endless,
    Moves,
    Timed,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Endless, Self::Moves, Self::Timed];

    pub fn label(self) -> &'static str {
        match self {
            Self::Endless => "ENDLESS",
            Self::Moves => "MOVES",
            Self::Timed => "TIMED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn base_level(self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 3,
            Self::Hard => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}
