//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Theme keys tried in order for each candy colour, with the One Dark fallback.
/// `candy_*` keys are our own; the rest reuse what btop themes already define.
const CANDY_KEYS: [(&[&str], &str); 6] = [
    (&["candy_red", "cpu_end", "temp_end"], "#E06C75"),
    (&["candy_orange", "proc_misc"], "#D19A66"),
    (&["candy_yellow", "title", "cpu_mid"], "#E5C07B"),
    (&["candy_green", "mem_box", "cpu_start"], "#98C379"),
    (&["candy_blue", "cpu_box"], "#61AFEF"),
    (&["candy_purple", "net_box"], "#C678DD"),
];

/// Candy palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Candy colours indexed by `CandyColor::index()`.
    pub candy: [Color; 6],
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Selected candy background.
    pub selected_bg: Color,
    /// Keyboard cursor brackets.
    pub cursor: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}

impl Theme {
    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark if path is None or missing; `palette` overrides the candy colours.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override candy colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        let hex: [&str; 6] = match palette {
            crate::Palette::Normal => return,
            crate::Palette::HighContrast => {
                ["#FF0000", "#FF8800", "#FFFF00", "#00FF00", "#0088FF", "#FF00FF"]
            }
            // Okabe–Ito derived: distinguishable without relying on red/green.
            crate::Palette::Colorblind => {
                ["#D55E00", "#E69F00", "#F0E442", "#009E73", "#0072B2", "#CC79A7"]
            }
        };
        for (slot, h) in self.candy.iter_mut().zip(hex) {
            *slot = parse_hex(h).unwrap_or(*slot);
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |keys: &[&str], fallback: &str| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(|v| parse_hex(v).ok()))
                .or_else(|| parse_hex(fallback).ok())
                .unwrap_or(Color::Reset)
        };
        let mut candy = [Color::Reset; 6];
        for (slot, (keys, fallback)) in candy.iter_mut().zip(CANDY_KEYS) {
            *slot = get(keys, fallback);
        }
        Self {
            candy,
            bg: get(&["meter_bg", "main_bg"], "#282C34"),
            div_line: get(&["div_line"], "#3F444F"),
            main_fg: get(&["main_fg"], "#ABB2BF"),
            title: get(&["title"], "#E5C07B"),
            selected_bg: get(&["selected_bg"], "#4B5263"),
            cursor: get(&["hi_fg", "selected_fg"], "#56B6C2"),
        }
    }

    #[inline]
    pub fn candy_color(&self, index: u8) -> Color {
        self.candy[(index as usize) % self.candy.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let rest = line.strip_prefix("theme[")?;
            let (key, rest) = rest.split_once(']')?;
            let (_, value) = rest.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!value.is_empty()).then(|| (key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>, scale: u8| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .map(|v| v * scale)
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?),
        3 => (channel(0..1, 17)?, channel(1..2, 17)?, channel(2..3, 17)?),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file("# comment\ntheme[meter_bg]=\"#31353F\"\ntheme[title]='#FFF'\n");
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
        assert_eq!(map.get("title"), Some(&"#FFF".to_string()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn candy_keys_override_btop_fallbacks() {
        let map = parse_theme_file("theme[cpu_end]=\"#010203\"\ntheme[candy_blue]=\"#0A0B0C\"");
        let theme = Theme::from_map(&map);
        assert!(matches!(theme.candy[0], Color::Rgb(1, 2, 3)));
        assert!(matches!(theme.candy[4], Color::Rgb(10, 11, 12)));
        assert!(matches!(theme.candy[5], Color::Rgb(0xC6, 0x78, 0xDD)));
    }

    #[test]
    fn palette_override_replaces_candies_only() {
        let mut theme = Theme::default();
        let bg = theme.bg;
        theme.apply_palette(crate::Palette::HighContrast);
        assert!(matches!(theme.candy[0], Color::Rgb(255, 0, 0)));
        assert_eq!(theme.bg, bg);
    }
}
