//! Maps terminal events to actions. Keys without a mapping are dropped
//! here and never reach the worksheet.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use tutor_core::Key;

use super::app::Action;

#[must_use]
pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => key_action(key),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(Action::Click {
                column: mouse.column,
                row: mouse.row,
            })
        }
        Event::Paste(text) => Some(Action::Paste(text.clone())),
        _ => None,
    }
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Char(c) => {
            if let Some(key) = Key::from_char(c) {
                return Some(Action::Key(key));
            }
            match c.to_ascii_lowercase() {
                'q' => Action::Quit,
                'n' => Action::Next,
                'g' => Action::GiveUp,
                'r' => Action::Refresh,
                _ => return None,
            }
        }
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::Quit,
        KeyCode::Backspace => Action::Key(Key::Backspace),
        KeyCode::Delete => Action::Key(Key::Delete),
        KeyCode::Tab => Action::Key(Key::Tab),
        KeyCode::BackTab => Action::Key(Key::BackTab),
        KeyCode::Left => Action::Key(Key::Left),
        KeyCode::Right => Action::Key(Key::Right),
        _ => return None,
    };
    Some(action)
}
