//! App: terminal init, main loop, tick and key/mouse handling.

use crate::dispenser::Dispenser;
use crate::game::Grid;
use crate::highscores::{self, HighScores};
use crate::input::{Action, key_to_action, mouse_click, move_cursor};
use crate::score::Scoreboard;
use crate::theme::Theme;
use crate::{Args, Difficulty, GameConfig, GameMode};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Frame budget for drawing and input polling (~60 FPS).
const FRAME_MS: u64 = 16;
/// Upper bound on grid ticks caught up in one frame after a stall.
const MAX_TICKS_PER_FRAME: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    MainMenu,
    Exit,
}

impl QuitOption {
    fn next(self) -> Self {
        match self {
            Self::Resume => Self::MainMenu,
            Self::MainMenu => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::MainMenu => Self::Resume,
            Self::Exit => Self::MainMenu,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Move budget spent (moves mode).
    OutOfMoves,
    /// Clock ran out (timed mode).
    TimeUp,
    /// Board settled with no swap that makes a match.
    NoMovesLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTab {
    Difficulty,
    Mode,
    Start,
}

impl MenuTab {
    fn next(self) -> Self {
        match self {
            Self::Difficulty => Self::Mode,
            Self::Mode => Self::Start,
            Self::Start => Self::Difficulty,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Difficulty => Self::Start,
            Self::Mode => Self::Difficulty,
            Self::Start => Self::Mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub current_tab: MenuTab,
    pub selected_difficulty: Difficulty,
    pub selected_mode: GameMode,
    pub animation_start: Instant,
}

impl MenuState {
    fn new(difficulty: Difficulty, mode: GameMode) -> Self {
        Self {
            current_tab: MenuTab::Difficulty,
            selected_difficulty: difficulty,
            selected_mode: mode,
            animation_start: Instant::now(),
        }
    }

    /// Step the option on the current tab left (-1) or right (+1), wrapping.
    fn cycle_option(&mut self, step: isize) {
        fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
            let len = all.len() as isize;
            let idx = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
            all[(idx + step).rem_euclid(len) as usize]
        }
        match self.current_tab {
            MenuTab::Difficulty => {
                self.selected_difficulty = cycle(&Difficulty::ALL, self.selected_difficulty, step);
            }
            MenuTab::Mode => {
                self.selected_mode = cycle(&GameMode::ALL, self.selected_mode, step);
            }
            MenuTab::Start => {}
        }
    }
}

/// What the loop should do after an input event.
enum Flow {
    Continue,
    Exit,
}

pub struct App {
    args: Args,
    config: GameConfig,
    theme: Theme,
    grid: Grid<Scoreboard>,
    screen: Screen,
    paused: bool,
    cursor: (usize, usize),
    /// Time spent on the Playing screen while unpaused.
    play_time: Duration,
    game_over_reason: Option<GameOverReason>,
    last_tick: Instant,
    last_frame: Instant,
    /// TachyonFX flash over cells cleared this frame.
    clear_effect: Option<Effect>,
    /// Last time the flash was processed (for delta).
    clear_effect_time: Option<Instant>,
    menu_state: MenuState,
    quit_selected: QuitOption,
    high_scores: HighScores,
    new_record: bool,
}

fn new_grid(config: &GameConfig) -> Result<Grid<Scoreboard>> {
    let dispenser = config
        .seed
        .map_or_else(Dispenser::from_entropy, Dispenser::seeded);
    let mut grid = Grid::with_dispenser(config.rows, config.cols, Scoreboard::new(), dispenser)?;
    grid.initialize(config.level)?;
    Ok(grid)
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let grid = new_grid(&config)?;
        let screen = if args.no_menu {
            Screen::Playing
        } else {
            Screen::Menu
        };
        let now = Instant::now();
        Ok(Self {
            menu_state: MenuState::new(args.difficulty, config.mode),
            args,
            config,
            theme,
            grid,
            screen,
            paused: false,
            cursor: (0, 0),
            play_time: Duration::ZERO,
            game_over_reason: None,
            last_tick: now,
            last_frame: now,
            clear_effect: None,
            clear_effect_time: None,
            quit_selected: QuitOption::Resume,
            high_scores: highscores::load_high_scores(),
            new_record: false,
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        self.grid = new_grid(&self.config)?;
        let now = Instant::now();
        self.screen = Screen::Playing;
        self.paused = false;
        self.cursor = (0, 0);
        self.play_time = Duration::ZERO;
        self.game_over_reason = None;
        self.last_tick = now;
        self.clear_effect = None;
        self.clear_effect_time = None;
        self.new_record = false;
        tracing::info!(
            level = self.config.level,
            mode = ?self.config.mode,
            rows = self.config.rows,
            cols = self.config.cols,
            "new game"
        );
        Ok(())
    }

    fn start_from_menu(&mut self) -> Result<()> {
        let difficulty = self.menu_state.selected_difficulty;
        // --level holds unless the difficulty was changed in the menu.
        self.config.level = match self.args.level {
            Some(level) if difficulty == self.args.difficulty => level,
            _ => difficulty.base_level(),
        };
        self.args.difficulty = difficulty;
        self.config.mode = self.menu_state.selected_mode;
        self.reset_game()
    }

    fn time_left_secs(&self) -> u64 {
        self.config
            .time_limit_secs
            .saturating_sub(self.play_time.as_secs())
    }

    /// Why the round is over, if it is. Only checked on a settled board.
    fn check_game_over(&self) -> Option<GameOverReason> {
        if !self.grid.is_idle() {
            return None;
        }
        match self.config.mode {
            GameMode::Moves if self.grid.moves() >= self.config.move_limit => {
                return Some(GameOverReason::OutOfMoves);
            }
            GameMode::Timed if self.time_left_secs() == 0 => {
                return Some(GameOverReason::TimeUp);
            }
            _ => {}
        }
        (!self.grid.has_available_moves()).then_some(GameOverReason::NoMovesLeft)
    }

    fn finish_game(&mut self, reason: GameOverReason) {
        let score = self.grid.sink().score;
        self.game_over_reason = Some(reason);
        self.screen = Screen::GameOver;
        self.new_record = self.high_scores.record(self.config.mode, score);
        tracing::info!(?reason, score, moves = self.grid.moves(), "game over");
        if self.new_record {
            if let Err(e) = highscores::save_high_scores(&self.high_scores) {
                tracing::warn!(error = %e, "could not save high scores");
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        // Clamp the board to the terminal; respect --rows/--cols when they fit.
        let (term_cols, term_rows) = size()?;
        let (fit_rows, fit_cols) = crate::ui::max_board_for_terminal(term_cols, term_rows);
        let rows = self.config.rows.min(fit_rows).max(crate::game::MIN_DIMENSION);
        let cols = self.config.cols.min(fit_cols).max(crate::game::MIN_DIMENSION);
        if (rows, cols) != (self.config.rows, self.config.cols) {
            tracing::info!(rows, cols, "board clamped to terminal");
            self.config.rows = rows;
            self.config.cols = cols;
        }

        let result = self
            .fit_grid(rows, cols)
            .and_then(|()| self.run_loop(&mut terminal));

        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn fit_grid(&mut self, rows: usize, cols: usize) -> Result<()> {
        if (rows, cols) != (self.grid.rows(), self.grid.cols()) {
            self.grid = new_grid(&self.config)?;
        }
        Ok(())
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_interval = Duration::from_secs_f64(1.0 / self.args.tick_rate.max(1.0));
        loop {
            let now = Instant::now();
            let frame_delta = now.saturating_duration_since(self.last_frame);
            self.last_frame = now;

            let area = terminal.get_frame().area();
            self.grid
                .set_viewport(crate::ui::board_viewport(area, self.grid.rows(), self.grid.cols()));

            let time_left_secs = self.time_left_secs();
            terminal.draw(|f| {
                let view = crate::ui::View {
                    screen: self.screen,
                    grid: &self.grid,
                    theme: &self.theme,
                    cursor: self.cursor,
                    paused: self.paused,
                    mode: self.config.mode,
                    move_limit: self.config.move_limit,
                    time_left_secs,
                    game_over_reason: self.game_over_reason,
                    high_scores: self.high_scores,
                    new_record: self.new_record,
                    menu: &self.menu_state,
                    quit_selected: self.quit_selected,
                    now,
                };
                crate::ui::draw(f, &view, &mut self.clear_effect, &mut self.clear_effect_time);
            })?;

            if self.clear_effect.as_ref().is_some_and(|e| e.done()) {
                self.clear_effect = None;
                self.clear_effect_time = None;
            }

            let timeout = Duration::from_millis(FRAME_MS).saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let flow = match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key)?,
                        Event::Mouse(mouse) => {
                            self.handle_mouse(mouse);
                            Flow::Continue
                        }
                        _ => Flow::Continue,
                    };
                    if let Flow::Exit = flow {
                        return Ok(());
                    }
                }
            }

            if self.screen != Screen::Playing || self.paused {
                self.last_tick = Instant::now();
                continue;
            }

            self.play_time += frame_delta;
            let mut ticks = 0;
            while self.last_tick.elapsed() >= tick_interval && ticks < MAX_TICKS_PER_FRAME {
                self.grid.update();
                self.last_tick += tick_interval;
                ticks += 1;
            }
            if ticks == MAX_TICKS_PER_FRAME {
                self.last_tick = Instant::now();
            }

            let delta_ms = frame_delta.as_millis().min(u128::from(u32::MAX)) as u32;
            self.grid.sink_mut().tick_popups(delta_ms);

            let cleared = self.grid.sink_mut().take_cleared();
            if !cleared.is_empty() && !self.args.no_animation {
                let rect = crate::ui::board_rect(area, self.grid.rows(), self.grid.cols());
                self.clear_effect = Some(crate::ui::clear_flash(rect, &cleared));
                self.clear_effect_time = None;
            }

            if let Some(reason) = self.check_game_over() {
                self.finish_game(reason);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Flow> {
        let action = key_to_action(key);
        match self.screen {
            Screen::Menu => match action {
                Action::Quit => return Ok(Flow::Exit),
                Action::Left => self.menu_state.cycle_option(-1),
                Action::Right => self.menu_state.cycle_option(1),
                Action::Down => self.menu_state.current_tab = self.menu_state.current_tab.next(),
                Action::Up => self.menu_state.current_tab = self.menu_state.current_tab.prev(),
                Action::Select if self.menu_state.current_tab == MenuTab::Start => {
                    self.start_from_menu()?;
                }
                Action::Select => self.menu_state.current_tab = MenuTab::Start,
                _ => {}
            },
            Screen::Playing if self.paused => match action {
                Action::Pause => self.paused = false,
                Action::Quit => self.open_quit_menu(),
                _ => {}
            },
            Screen::Playing => match action {
                Action::Pause => self.paused = true,
                Action::Quit => self.open_quit_menu(),
                Action::Restart => self.reset_game()?,
                Action::Up | Action::Down | Action::Left | Action::Right => {
                    self.cursor =
                        move_cursor(self.cursor, action, self.grid.rows(), self.grid.cols());
                }
                Action::Select => {
                    let (row, col) = self.cursor;
                    self.grid.click_cell(row, col);
                }
                Action::None => {}
            },
            Screen::QuitMenu => match action {
                Action::Down | Action::Right => self.quit_selected = self.quit_selected.next(),
                Action::Up | Action::Left => self.quit_selected = self.quit_selected.prev(),
                Action::Select => match self.quit_selected {
                    QuitOption::Resume => self.screen = Screen::Playing,
                    QuitOption::MainMenu => {
                        self.screen = Screen::Menu;
                        self.menu_state.animation_start = Instant::now();
                    }
                    QuitOption::Exit => return Ok(Flow::Exit),
                },
                Action::Pause | Action::Quit => self.screen = Screen::Playing,
                _ => {}
            },
            Screen::GameOver => match action {
                Action::Quit => return Ok(Flow::Exit),
                Action::Restart => self.reset_game()?,
                Action::Select => {
                    self.screen = Screen::Menu;
                    self.menu_state.animation_start = Instant::now();
                }
                _ => {}
            },
        }
        Ok(Flow::Continue)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        let Some((x, y)) = mouse_click(mouse) else {
            return;
        };
        if let Some(cell) = self
            .grid
            .viewport()
            .cell_at(x, y, self.grid.rows(), self.grid.cols())
        {
            self.cursor = cell;
        }
        self.grid.handle_input(x, y);
    }

    fn open_quit_menu(&mut self) {
        self.screen = Screen::QuitMenu;
        self.quit_selected = QuitOption::Resume;
    }
}
