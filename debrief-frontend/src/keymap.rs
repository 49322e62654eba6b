use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use debrief_history::model::Rating;

use crate::model::Mode;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorDirection {
    Down,
    Up,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeymapMessage {
    Collapse,
    DeleteChar,
    EnterInsert,
    Expand,
    InsertChar(char),
    LeaveInsert,
    MoveCursor(CursorDirection),
    Quit,
    Rate(Rating),
    Submit,
    ToggleEnabled,
}

pub fn resolve(mode: &Mode, event: &KeyEvent) -> Option<KeymapMessage> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(KeymapMessage::Quit),
            _ => None,
        };
    }

    match mode {
        Mode::Navigation => match event.code {
            KeyCode::Char('j') | KeyCode::Down => {
                Some(KeymapMessage::MoveCursor(CursorDirection::Down))
            }
            KeyCode::Char('k') | KeyCode::Up => {
                Some(KeymapMessage::MoveCursor(CursorDirection::Up))
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => Some(KeymapMessage::Expand),
            KeyCode::Char('h') | KeyCode::Left => Some(KeymapMessage::Collapse),
            KeyCode::Char(' ') => Some(KeymapMessage::ToggleEnabled),
            KeyCode::Char('-') => Some(KeymapMessage::Rate(Rating::Negative)),
            KeyCode::Char('0') => Some(KeymapMessage::Rate(Rating::Neutral)),
            KeyCode::Char('+') => Some(KeymapMessage::Rate(Rating::Positive)),
            KeyCode::Char('i') => Some(KeymapMessage::EnterInsert),
            KeyCode::Char('s') => Some(KeymapMessage::Submit),
            KeyCode::Char('q') => Some(KeymapMessage::Quit),
            _ => None,
        },
        Mode::Insert => match event.code {
            KeyCode::Esc => Some(KeymapMessage::LeaveInsert),
            KeyCode::Backspace => Some(KeymapMessage::DeleteChar),
            KeyCode::Enter => Some(KeymapMessage::InsertChar('\n')),
            KeyCode::Char(c) => Some(KeymapMessage::InsertChar(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_keys() {
        let mode = Mode::Navigation;

        assert_eq!(
            Some(KeymapMessage::MoveCursor(CursorDirection::Down)),
            resolve(&mode, &key(KeyCode::Char('j')))
        );
        assert_eq!(
            Some(KeymapMessage::MoveCursor(CursorDirection::Up)),
            resolve(&mode, &key(KeyCode::Up))
        );
        assert_eq!(
            Some(KeymapMessage::ToggleEnabled),
            resolve(&mode, &key(KeyCode::Char(' ')))
        );
        assert_eq!(
            Some(KeymapMessage::Rate(Rating::Positive)),
            resolve(&mode, &key(KeyCode::Char('+')))
        );
        assert_eq!(None, resolve(&mode, &key(KeyCode::Char('x'))));
    }

    #[test]
    fn insert_mode_captures_characters() {
        let mode = Mode::Insert;

        assert_eq!(
            Some(KeymapMessage::InsertChar('q')),
            resolve(&mode, &key(KeyCode::Char('q')))
        );
        assert_eq!(
            Some(KeymapMessage::LeaveInsert),
            resolve(&mode, &key(KeyCode::Esc))
        );
        assert_eq!(
            Some(KeymapMessage::DeleteChar),
            resolve(&mode, &key(KeyCode::Backspace))
        );
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(Some(KeymapMessage::Quit), resolve(&Mode::Navigation, &event));
        assert_eq!(Some(KeymapMessage::Quit), resolve(&Mode::Insert, &event));
    }

    #[test]
    fn releases_are_ignored() {
        let mut event = key(KeyCode::Char('j'));
        event.kind = KeyEventKind::Release;

        assert_eq!(None, resolve(&Mode::Navigation, &event));
    }
}
