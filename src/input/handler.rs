use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    /// Start from the menu or restart after game over
    Start,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Held keys and releases are not new presses
        if key.kind != KeyEventKind::Press {
            return KeyAction::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Turn(Direction::Up)
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Turn(Direction::Down)
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Turn(Direction::Left)
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Turn(Direction::Right)
            }

            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyAction::Start
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
