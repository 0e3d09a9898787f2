//! Key bindings (normal and vim-style) and mouse clicks.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Click the cell under the cursor.
    Select,
    Pause,
    Restart,
    Quit,
    None,
}

/// Map key event to game action. Supports both normal (arrows, enter) and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Select,
        _ => Action::None,
    }
}

/// Terminal cell of a left-button press, as the point in its middle.
pub fn mouse_click(event: MouseEvent) -> Option<(f32, f32)> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Some((f32::from(event.column) + 0.5, f32::from(event.row) + 0.5))
        }
        _ => None,
    }
}

/// Move a cursor one step, clamped to a rows × cols board.
pub fn move_cursor(cursor: (usize, usize), action: Action, rows: usize, cols: usize) -> (usize, usize) {
    let (row, col) = cursor;
    match action {
        Action::Up => (row.saturating_sub(1), col),
        Action::Down => ((row + 1).min(rows.saturating_sub(1)), col),
        Action::Left => (row, col.saturating_sub(1)),
        Action::Right => (row, (col + 1).min(cols.saturating_sub(1))),
        _ => cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_and_vim_keys_agree() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::Left);
        assert_eq!(key_to_action(key(KeyCode::Char('h'))), Action::Left);
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), Action::Down);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Select);
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::Select);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn modified_keys_are_ignored() {
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_q), Action::None);
    }

    #[test]
    fn left_press_maps_to_cell_centre() {
        let ev = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(mouse_click(ev), Some((10.5, 4.5)));
        let up = MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            ..ev
        };
        assert_eq!(mouse_click(up), None);
    }

    #[test]
    fn cursor_clamps_to_board() {
        assert_eq!(move_cursor((0, 0), Action::Up, 8, 8), (0, 0));
        assert_eq!(move_cursor((7, 7), Action::Right, 8, 8), (7, 7));
        assert_eq!(move_cursor((3, 3), Action::Down, 8, 8), (4, 3));
        assert_eq!(move_cursor((3, 3), Action::Select, 8, 8), (3, 3));
    }
}
