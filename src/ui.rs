//! Layout and drawing: menu, board, sidebar, pause, game over and quit menu.

use crate::app::{GameOverReason, MenuState, MenuTab, QuitOption, Screen};
use crate::candy::{Candy, CandyKind};
use crate::game::{Grid, Viewport};
use crate::highscores::HighScores;
use crate::score::Scoreboard;
use crate::theme::Theme;
use crate::{Difficulty, GameMode};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Terminal columns per candy.
pub const CELL_WIDTH: u16 = 4;
/// Terminal rows per candy.
pub const CELL_HEIGHT: u16 = 2;

const SIDEBAR_WIDTH: u16 = 26;

/// Duration of the flash over cleared candies.
const CLEAR_FLASH_MS: u32 = 350;

/// Chain length at which the combo gauge is full.
const COMBO_GAUGE_MAX: u32 = 5;

/// Everything a frame needs; borrowed from the app for the duration of one draw.
pub struct View<'a> {
    pub screen: Screen,
    pub grid: &'a Grid<Scoreboard>,
    pub theme: &'a Theme,
    pub cursor: (usize, usize),
    pub paused: bool,
    pub mode: GameMode,
    pub move_limit: u32,
    pub time_left_secs: u64,
    pub game_over_reason: Option<GameOverReason>,
    pub high_scores: HighScores,
    pub new_record: bool,
    pub menu: &'a MenuState,
    pub quit_selected: QuitOption,
    pub now: Instant,
}

/// Board size in terminal cells including its border.
fn board_outer_size(rows: usize, cols: usize) -> (u16, u16) {
    (
        cols as u16 * CELL_WIDTH + 2,
        rows as u16 * CELL_HEIGHT + 2,
    )
}

/// Largest (rows, cols) board that fits next to the sidebar in the terminal.
pub fn max_board_for_terminal(term_cols: u16, term_rows: u16) -> (usize, usize) {
    let max_w = term_cols.saturating_sub(2 + SIDEBAR_WIDTH) / CELL_WIDTH;
    let max_h = term_rows.saturating_sub(2) / CELL_HEIGHT;
    (usize::from(max_h), usize::from(max_w))
}

/// Board (with border) and sidebar rects, centred in `area`.
fn game_layout(area: Rect, rows: usize, cols: usize) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(rows, cols);
    let total_w = bw + SIDEBAR_WIDTH;
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    (inner[0], inner[1])
}

/// Board rect without its border: where candies are drawn.
pub fn board_rect(area: Rect, rows: usize, cols: usize) -> Rect {
    let (outer, _) = game_layout(area, rows, cols);
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: (cols as u16 * CELL_WIDTH).min(outer.width.saturating_sub(2)),
        height: (rows as u16 * CELL_HEIGHT).min(outer.height.saturating_sub(2)),
    }
}

/// Viewport the grid uses to turn mouse positions into cells.
pub fn board_viewport(area: Rect, rows: usize, cols: usize) -> Viewport {
    let rect = board_rect(area, rows, cols);
    Viewport {
        origin_x: f32::from(rect.x),
        origin_y: f32::from(rect.y),
        cell_width: f32::from(CELL_WIDTH),
        cell_height: f32::from(CELL_HEIGHT),
    }
}

/// Flash effect over the given cells: starts white and fades to whatever is drawn there.
pub fn clear_flash(board: Rect, cells: &[(usize, usize)]) -> Effect {
    let mut positions = HashSet::new();
    for &(row, col) in cells {
        let x0 = board.x + col as u16 * CELL_WIDTH;
        let y0 = board.y + row as u16 * CELL_HEIGHT;
        for x in x0..(x0 + CELL_WIDTH).min(board.x + board.width) {
            for y in y0..(y0 + CELL_HEIGHT).min(board.y + board.height) {
                positions.insert((x, y));
            }
        }
    }
    let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
        positions.contains(&(pos.x, pos.y))
    }));
    fx::fade_from(Color::White, Color::White, (CLEAR_FLASH_MS, Interpolation::Linear))
        .with_filter(filter)
        .with_area(board)
}

/// Draw the current screen. `clear_effect` is processed over the board while playing.
pub fn draw(
    frame: &mut Frame,
    view: &View,
    clear_effect: &mut Option<Effect>,
    clear_effect_time: &mut Option<Instant>,
) {
    let area = frame.area();
    match view.screen {
        Screen::Menu => draw_menu(frame, view, area),
        Screen::Playing => {
            draw_game(frame, view, area);
            apply_clear_effect(frame, view, area, clear_effect, clear_effect_time);
            if view.paused {
                draw_pause_overlay(frame, view.theme, area);
            }
        }
        Screen::QuitMenu => {
            draw_game(frame, view, area);
            draw_quit_menu(frame, view.theme, view.quit_selected);
        }
        Screen::GameOver => {
            draw_game(frame, view, area);
            draw_game_over(frame, view, area);
        }
    }
}

fn apply_clear_effect(
    frame: &mut Frame,
    view: &View,
    area: Rect,
    clear_effect: &mut Option<Effect>,
    clear_effect_time: &mut Option<Instant>,
) {
    let Some(effect) = clear_effect else {
        *clear_effect_time = None;
        return;
    };
    let delta = clear_effect_time
        .map(|t| view.now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *clear_effect_time = Some(view.now);
    let rect = board_rect(area, view.grid.rows(), view.grid.cols());
    frame.render_effect(effect, rect, TfxDuration::from_millis(delta_ms));
}

fn menu_tab_style(current: bool, selected: bool, theme: &Theme) -> Style {
    if current {
        Style::default().fg(Color::Black).bg(theme.candy_color(2)).bold()
    } else if selected {
        Style::default().fg(theme.candy_color(2)).bold()
    } else {
        Style::default().fg(theme.main_fg)
    }
}

fn draw_menu(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let menu = view.menu;
    let popup_w = 50u16;
    let popup_h = 20u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };

    // Title spelled in the candy palette.
    let title = Line::from(
        "CANDYTUI"
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                Span::styled(
                    format!("{} ", ch),
                    Style::default().fg(theme.candy_color(i as u8)).bold(),
                )
            })
            .collect::<Vec<_>>(),
    );

    let mut difficulty = Vec::new();
    for d in Difficulty::ALL {
        difficulty.push(Span::styled(
            format!(" {} ", d.label()),
            menu_tab_style(
                menu.current_tab == MenuTab::Difficulty && menu.selected_difficulty == d,
                menu.selected_difficulty == d,
                theme,
            ),
        ));
        difficulty.push(Span::from("  "));
    }
    let mut modes = Vec::new();
    for m in GameMode::ALL {
        modes.push(Span::styled(
            format!(" {} ", m.label()),
            menu_tab_style(
                menu.current_tab == MenuTab::Mode && menu.selected_mode == m,
                menu.selected_mode == m,
                theme,
            ),
        ));
        modes.push(Span::from("  "));
    }
    let start = Span::styled(
        " [ START ] ",
        menu_tab_style(menu.current_tab == MenuTab::Start, false, theme),
    );
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.candy_color(4)));
    let best = view.high_scores.best(menu.selected_mode);

    let lines = vec![
        Line::from(""),
        title,
        Line::from(""),
        Line::from(Span::styled(
            format!(" Best {}: {} ", menu.selected_mode.label().to_lowercase(), best),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(" ─ DIFFICULTY ─ ", Style::default().fg(theme.div_line))),
        Line::from(difficulty),
        Line::from(""),
        Line::from(Span::styled(" ─ MODE ─ ", Style::default().fg(theme.div_line))),
        Line::from(modes),
        Line::from(""),
        Line::from(""),
        Line::from(start),
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            key(" ↕ "),
            Span::from("NAVIGATE   "),
            key(" ↔ "),
            Span::from("CHANGE   "),
            key(" ENTER "),
            Span::from("START"),
        ]),
        Line::from(""),
        Line::from(Span::styled(" [Q] QUIT ", Style::default().fg(theme.candy_color(0)))),
    ];

    // Slide in from below over half a second (ease-out cubic).
    let elapsed = view.now.duration_since(menu.animation_start).as_millis() as f32;
    let t = (elapsed / 500.0).min(1.0);
    let offset = ((1.0 - t).powi(3) * 8.0) as u16;
    let mut anim_popup = popup;
    anim_popup.y = (anim_popup.y + offset).min(area.bottom().saturating_sub(anim_popup.height));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(anim_popup, frame.buffer_mut());
}

fn draw_game(frame: &mut Frame, view: &View, area: Rect) {
    let (board_outer, sidebar) = game_layout(area, view.grid.rows(), view.grid.cols());
    draw_board(frame, view, board_outer);
    draw_sidebar(frame, view, sidebar);
}

fn draw_board(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let grid = view.grid;
    let title = format!(" Candytui | Level {} ", grid.level().level);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)));
    block.render(area, frame.buffer_mut());

    let rect = board_rect(frame.area(), grid.rows(), grid.cols());
    let buf = frame.buffer_mut();

    // Slot backgrounds: selection and cursor follow slots, not moving candies.
    let swapping = grid.pending_swap().map(|s| [s.from, s.to]);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let in_swap = swapping.is_some_and(|pair| pair.contains(&(row, col)));
            let bg = if in_swap || grid.selected() == Some((row, col)) {
                theme.selected_bg
            } else {
                theme.bg
            };
            let x0 = rect.x + col as u16 * CELL_WIDTH;
            let y0 = rect.y + row as u16 * CELL_HEIGHT;
            for dy in 0..CELL_HEIGHT {
                for dx in 0..CELL_WIDTH {
                    let pos = (x0 + dx, y0 + dy);
                    if rect.contains(Position::new(pos.0, pos.1)) {
                        buf[pos].set_symbol(" ").set_bg(bg);
                    }
                }
            }
            if view.cursor == (row, col) && view.screen == Screen::Playing {
                let cursor_style = Style::default().fg(theme.cursor).bold();
                buf.set_string(x0, y0, "┌", cursor_style);
                buf.set_string(x0 + CELL_WIDTH - 1, y0, "┐", cursor_style);
                buf.set_string(x0, y0 + CELL_HEIGHT - 1, "└", cursor_style);
                buf.set_string(x0 + CELL_WIDTH - 1, y0 + CELL_HEIGHT - 1, "┘", cursor_style);
            }
        }
    }

    for candy in grid.board().iter() {
        draw_candy(buf, rect, theme, candy, view.cursor, view.screen == Screen::Playing);
    }

    for popup in &grid.sink().popups {
        let ry = rect.y as f32 + popup.row * f32::from(CELL_HEIGHT);
        if ry < f32::from(rect.y) {
            continue;
        }
        let label = format!("+{}", popup.amount);
        let rx = rect.x + popup.col as u16 * CELL_WIDTH;
        let style = Style::default()
            .fg(Color::White)
            .bg(theme.candy_color(popup.color.index()))
            .bold();
        buf.set_string(rx, ry as u16, label, style);
    }
}

/// Middle glyph pair for a candy kind; None draws a solid block.
fn kind_glyphs(kind: CandyKind) -> Option<[&'static str; 2]> {
    match kind {
        CandyKind::Regular => None,
        CandyKind::Striped => Some(["══", "══"]),
        CandyKind::Wrapped => Some(["▛▜", "▙▟"]),
        CandyKind::ColorBomb => Some(["✦✦", "✦✦"]),
    }
}

fn draw_candy(
    buf: &mut Buffer,
    rect: Rect,
    theme: &Theme,
    candy: &Candy,
    cursor: (usize, usize),
    show_cursor: bool,
) {
    const CORNERS: [[&str; 2]; 2] = [["▗", "▖"], ["▝", "▘"]];
    let color = theme.candy_color(candy.color.index());
    let top = rect.y as f32 + candy.pos.0 * f32::from(CELL_HEIGHT);
    let left = rect.x as f32 + candy.pos.1 * f32::from(CELL_WIDTH);
    let (top, left) = (top.round() as i32, left.round() as i32);
    let keep_corners = show_cursor && candy.is_settled() && candy.slot() == cursor;

    for dy in 0..i32::from(CELL_HEIGHT) {
        let y = top + dy;
        if y < i32::from(rect.y) || y >= i32::from(rect.bottom()) {
            continue;
        }
        for dx in 0..i32::from(CELL_WIDTH) {
            let x = left + dx;
            if x < i32::from(rect.x) || x >= i32::from(rect.right()) {
                continue;
            }
            let cell = &mut buf[(x as u16, y as u16)];
            let dy = dy as usize;
            match dx {
                0 | 3 => {
                    if !keep_corners {
                        cell.set_symbol(CORNERS[dy][usize::from(dx == 3)]).set_fg(color);
                    }
                }
                _ => match kind_glyphs(candy.kind) {
                    None => {
                        cell.set_symbol("█").set_fg(color);
                    }
                    Some(rows) => {
                        let glyph = &rows[dy][(dx as usize - 1) * 3..dx as usize * 3];
                        cell.set_symbol(glyph).set_fg(Color::White).set_bg(color);
                    }
                },
            }
        }
    }
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let grid = view.grid;
    let sb = grid.sink();
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Stats
            Constraint::Length(1),
            Constraint::Length(4), // Combo
            Constraint::Length(1),
            Constraint::Length(4), // Colours
            Constraint::Length(1),
            Constraint::Min(0), // Keys
        ])
        .split(area);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let budget = match view.mode {
        GameMode::Endless => stat("Moves: ", grid.moves().to_string()),
        GameMode::Moves => stat(
            "Moves left: ",
            view.move_limit.saturating_sub(grid.moves()).to_string(),
        ),
        GameMode::Timed => stat(
            "Time: ",
            format!("{:02}:{:02}", view.time_left_secs / 60, view.time_left_secs % 60),
        ),
    };
    let stats = vec![
        stat("Score: ", sb.score.to_string()),
        stat("Best: ", view.high_scores.best(view.mode).to_string()),
        stat("Level: ", grid.level().level.to_string()),
        budget,
        stat("Cleared: ", sb.candies_cleared.to_string()),
    ];
    let stats_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    Paragraph::new(Text::from(stats)).render(stats_inner, frame.buffer_mut());

    let combo_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let combo_inner = combo_block.inner(chunks[2]);
    combo_block.render(chunks[2], frame.buffer_mut());
    let combo_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(combo_inner);
    let chain = grid.chain();
    let label = if chain > 1 {
        format!("Combo x{}", chain)
    } else {
        "Combo".to_string()
    };
    Paragraph::new(Line::from(Span::styled(label, title_style)))
        .render(combo_rows[0], frame.buffer_mut());
    let ratio = (f64::from(chain.saturating_sub(1)) / f64::from(COMBO_GAUGE_MAX - 1)).min(1.0);
    let bar_color = if ratio > 0.6 {
        Color::Magenta
    } else if ratio > 0.3 {
        Color::Yellow
    } else {
        Color::Green
    };
    Gauge::default()
        .ratio(ratio)
        .label("")
        .gauge_style(Style::default().fg(bar_color))
        .render(combo_rows[1], frame.buffer_mut());

    let colours_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let colours_inner = colours_block.inner(chunks[4]);
    colours_block.render(chunks[4], frame.buffer_mut());
    let colours_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(colours_inner);
    Paragraph::new(Line::from(Span::styled("Colours", title_style)))
        .render(colours_rows[0], frame.buffer_mut());
    let strip: Vec<Span> = grid
        .level()
        .palette()
        .iter()
        .map(|c| {
            let color = theme.candy_color(c.index());
            Span::styled("██ ", Style::default().fg(color))
        })
        .collect();
    Paragraph::new(Line::from(strip)).render(colours_rows[1], frame.buffer_mut());

    let keys = vec![
        Line::from(Span::styled("Keys", title_style)),
        Line::from(Span::styled("←↑↓→ hjkl  move", fg_style)),
        Line::from(Span::styled("Enter/Space select", fg_style)),
        Line::from(Span::styled("Mouse  click/swap", fg_style)),
        Line::from(Span::styled("P pause  R restart", fg_style)),
        Line::from(Span::styled("Q quit", fg_style)),
    ];
    let keys_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let keys_inner = keys_block.inner(chunks[6]);
    keys_block.render(chunks[6], frame.buffer_mut());
    Paragraph::new(Text::from(keys)).render(keys_inner, frame.buffer_mut());
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn clear_rect(frame: &mut Frame, rect: Rect, bg: Color) {
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            frame.buffer_mut()[(x, y)]
                .set_symbol(" ")
                .set_style(Style::default().bg(bg));
        }
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    clear_rect(frame, popup, theme.bg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let sb = view.grid.sink();
    let title = match view.game_over_reason {
        Some(GameOverReason::TimeUp) => " Time's up! ",
        Some(GameOverReason::OutOfMoves) => " Out of moves! ",
        Some(GameOverReason::NoMovesLeft) | None => " No moves left! ",
    };
    let fg = Style::default().fg(theme.main_fg);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", sb.score), fg)),
        Line::from(Span::styled(
            format!(" Best: {} ", view.high_scores.best(view.mode)),
            fg,
        )),
        Line::from(Span::styled(format!(" Swaps: {} ", view.grid.moves()), fg)),
        Line::from(Span::styled(
            format!(" Candies cleared: {} ", sb.candies_cleared),
            fg,
        )),
        Line::from(Span::styled(
            format!(" Matches: {}  Best: {} ", sb.groups, sb.best_group),
            fg,
        )),
    ];
    if view.new_record {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default().fg(Color::Yellow).bold(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " R — Restart  Enter — Menu  Q — Quit ",
        fg,
    )));
    let popup = centered(area, 42, lines.len() as u16 + 2);
    clear_rect(frame, popup, theme.bg);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Candytui ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());
}

pub fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let quit_rect = centered(frame.area(), 24, 8);
    clear_rect(frame, quit_rect, theme.bg);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .title(" Quit? ");
    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::MainMenu, " Main Menu "),
        (QuitOption::Exit, " Exit "),
    ];
    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default().fg(theme.bg).bg(theme.title).bold()
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        frame.buffer_mut().set_string(rx, ry, label, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_fit_accounts_for_border_and_sidebar() {
        // 80x24 terminal: (80 - 28) / 4 = 13 cols, (24 - 2) / 2 = 11 rows.
        assert_eq!(max_board_for_terminal(80, 24), (11, 13));
        assert_eq!(max_board_for_terminal(10, 3), (0, 0));
    }

    #[test]
    fn viewport_matches_board_rect() {
        let area = Rect::new(0, 0, 120, 40);
        let rect = board_rect(area, 8, 8);
        assert_eq!((rect.width, rect.height), (32, 16));
        let vp = board_viewport(area, 8, 8);
        assert_eq!(vp.cell_at(f32::from(rect.x) + 0.5, f32::from(rect.y) + 0.5, 8, 8), Some((0, 0)));
        let last = (rect.x + rect.width - 1, rect.y + rect.height - 1);
        assert_eq!(
            vp.cell_at(f32::from(last.0) + 0.5, f32::from(last.1) + 0.5, 8, 8),
            Some((7, 7))
        );
        assert_eq!(vp.cell_at(f32::from(rect.x) - 0.5, f32::from(rect.y), 8, 8), None);
    }

    #[test]
    fn special_glyph_slices_are_char_aligned() {
        for kind in CandyKind::SPECIALS {
            let rows = kind_glyphs(kind).unwrap();
            for row in rows {
                assert_eq!(row.chars().count(), 2);
                assert_eq!(row.len(), 6);
            }
        }
    }
}
