//! Persist high scores to disk (XDG config or ~/.config/candytui).

use crate::GameMode;
use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const FILENAME: &str = "highscores";

/// Best score per mode, stored one integer per line in mode order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScores {
    pub endless: u32,
    pub moves: u32,
    pub timed: u32,
}

impl HighScores {
    pub fn best(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Endless => self.endless,
            GameMode::Moves => self.moves,
            GameMode::Timed => self.timed,
        }
    }

    /// Record a finished score; returns true if it beat the previous best.
    pub fn record(&mut self, mode: GameMode, score: u32) -> bool {
        let slot = match mode {
            GameMode::Endless => &mut self.endless,
            GameMode::Moves => &mut self.moves,
            GameMode::Timed => &mut self.timed,
        };
        if score > *slot {
            *slot = score;
            true
        } else {
            false
        }
    }

    /// Missing or unparsable lines read as 0.
    fn parse(content: &str) -> Self {
        let mut values = content
            .lines()
            .map(|l| l.trim().parse::<u32>().unwrap_or(0))
            .chain(std::iter::repeat(0));
        Self {
            endless: values.next().unwrap_or(0),
            moves: values.next().unwrap_or(0),
            timed: values.next().unwrap_or(0),
        }
    }

    fn render(&self) -> String {
        format!("{}\n{}\n{}\n", self.endless, self.moves, self.timed)
    }
}

/// Returns the path to the high scores file (config dir / candytui / highscores).
fn config_path() -> PathBuf {
    let home_config = || {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from("."))
    };
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home_config(),
    };
    base.join("candytui").join(FILENAME)
}

pub fn load_high_scores() -> HighScores {
    load_from(&config_path())
}

pub fn save_high_scores(scores: &HighScores) -> Result<()> {
    save_to(&config_path(), scores)
}

fn load_from(path: &Path) -> HighScores {
    fs::read_to_string(path)
        .map(|c| HighScores::parse(&c))
        .unwrap_or_default()
}

/// Creates the parent directory if needed.
fn save_to(path: &Path, scores: &HighScores) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(path)?;
    f.write_all(scores.render().as_bytes())?;
    Ok(())
}
