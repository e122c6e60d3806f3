use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::navigator::NavCommand;

/// Translate a key press into a grid command.
///
/// Chords with Ctrl, Alt or Super are never grid input; the caller gets
/// `None` and may treat them as application shortcuts. Unrecognized keys
/// also map to `None`.
pub fn nav_command(key: &KeyEvent) -> Option<NavCommand> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char(' ') => Some(NavCommand::ToggleDirection),
        KeyCode::Char(ch) if ch.is_ascii_alphabetic() => {
            Some(NavCommand::Letter(ch.to_ascii_uppercase()))
        }
        KeyCode::Tab if shift => Some(NavCommand::PrevClue),
        KeyCode::Tab => Some(NavCommand::NextClue),
        KeyCode::BackTab => Some(NavCommand::PrevClue),
        KeyCode::Up => Some(NavCommand::Move { d_row: -1, d_col: 0 }),
        KeyCode::Down => Some(NavCommand::Move { d_row: 1, d_col: 0 }),
        KeyCode::Left => Some(NavCommand::Move { d_row: 0, d_col: -1 }),
        KeyCode::Right => Some(NavCommand::Move { d_row: 0, d_col: 1 }),
        KeyCode::Backspace => Some(NavCommand::Backspace),
        KeyCode::Delete => Some(NavCommand::Delete),
        _ => None,
    }
}
