//! Key events to search actions, as a pure mapping function.

use super::{InputAdapter, InputEvent};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const NONE: KeyModifiers = KeyModifiers::NONE;
const CTRL: KeyModifiers = KeyModifiers::CONTROL;
const SHIFT: KeyModifiers = KeyModifiers::SHIFT;

/// Decide the event for a key press. Side-effect free.
pub fn determine_key_action(key: &KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match (key.code, key.modifiers) {
        // Navigation
        (KeyCode::Up, NONE) | (KeyCode::Char('p'), CTRL) => Some(InputEvent::MoveUp),
        (KeyCode::Down, NONE) | (KeyCode::Char('n'), CTRL) => Some(InputEvent::MoveDown),

        // Toggles
        (KeyCode::Char('s'), CTRL) => Some(InputEvent::ToggleSortMode),
        (KeyCode::Char('l'), CTRL) => Some(InputEvent::ToggleSessionFilter),
        (KeyCode::Char('w'), CTRL) => Some(InputEvent::ToggleCwdFilter),

        // Leave
        (KeyCode::Enter, NONE) => Some(InputEvent::Commit),
        (KeyCode::Esc, NONE) | (KeyCode::Char('c'), CTRL) | (KeyCode::Char('d'), CTRL) => {
            Some(InputEvent::Quit)
        }

        // Editing
        (KeyCode::Backspace, NONE) => Some(InputEvent::Backspace),
        (KeyCode::Char(ch), NONE) | (KeyCode::Char(ch), SHIFT) if !ch.is_control() => {
            Some(InputEvent::InsertChar(ch))
        }

        _ => None,
    }
}

/// Reads key events from the terminal through crossterm.
#[derive(Debug, Default)]
pub struct KeyEventInput;

impl KeyEventInput {
    pub fn new() -> Self {
        KeyEventInput
    }
}

impl InputAdapter for KeyEventInput {
    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        loop {
            if let Event::Key(key) = event::read()?
                && let Some(action) = determine_key_action(&key)
            {
                return Ok(Some(action));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_arrows_navigate() {
        assert_eq!(
            determine_key_action(&key(KeyCode::Up, NONE)),
            Some(InputEvent::MoveUp)
        );
        assert_eq!(
            determine_key_action(&key(KeyCode::Down, NONE)),
            Some(InputEvent::MoveDown)
        );
        assert_eq!(
            determine_key_action(&key(KeyCode::Char('p'), CTRL)),
            Some(InputEvent::MoveUp)
        );
    }

    #[test]
    fn test_ctrl_keys_toggle() {
        assert_eq!(
            determine_key_action(&key(KeyCode::Char('s'), CTRL)),
            Some(InputEvent::ToggleSortMode)
        );
        assert_eq!(
            determine_key_action(&key(KeyCode::Char('l'), CTRL)),
            Some(InputEvent::ToggleSessionFilter)
        );
        assert_eq!(
            determine_key_action(&key(KeyCode::Char('w'), CTRL)),
            Some(InputEvent::ToggleCwdFilter)
        );
    }

    #[test]
    fn test_quit_keys() {
        for k in [
            key(KeyCode::Esc, NONE),
            key(KeyCode::Char('c'), CTRL),
            key(KeyCode::Char('d'), CTRL),
        ] {
            assert_eq!(determine_key_action(&k), Some(InputEvent::Quit));
        }
    }

    #[test]
    fn test_enter_commits() {
        assert_eq!(
            determine_key_action(&key(KeyCode::Enter, NONE)),
            Some(InputEvent::Commit)
        );
    }

    #[test]
    fn test_printable_chars_insert() {
        assert_eq!(
            determine_key_action(&key(KeyCode::Char('g'), NONE)),
            Some(InputEvent::InsertChar('g'))
        );
        assert_eq!(
            determine_key_action(&key(KeyCode::Char('G'), SHIFT)),
            Some(InputEvent::InsertChar('G'))
        );
        assert_eq!(
            determine_key_action(&key(KeyCode::Char('é'), NONE)),
            Some(InputEvent::InsertChar('é'))
        );
    }

    #[test]
    fn test_backspace() {
        assert_eq!(
            determine_key_action(&key(KeyCode::Backspace, NONE)),
            Some(InputEvent::Backspace)
        );
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        assert_eq!(determine_key_action(&key(KeyCode::Tab, NONE)), None);
        assert_eq!(determine_key_action(&key(KeyCode::Char('x'), CTRL)), None);
        assert_eq!(determine_key_action(&key(KeyCode::F(1), NONE)), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut k = key(KeyCode::Char('a'), NONE);
        k.kind = KeyEventKind::Release;
        assert_eq!(determine_key_action(&k), None);
    }
}
