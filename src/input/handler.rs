use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction, ExitRequest, Player, TickInput};

/// What a key press means, before the active screen decides what to do
/// with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Player, Direction),
    Pause,
    Menu,
    Quit,
    Restart,
    NextLevel,
    Select(u8),
    /// Ctrl+C: leave the program from any screen
    Interrupt,
    /// Any other key
    Other,
}

impl KeyAction {
    /// Fold this key into the input of the next round tick. Keys with no
    /// meaning during a round are dropped.
    pub fn apply_to(self, input: &mut TickInput) {
        match self {
            KeyAction::Steer(player, direction) => input.steer(player, direction),
            KeyAction::Pause => input.toggle_pause(),
            KeyAction::Menu => input.request_exit(ExitRequest::Menu),
            KeyAction::Quit => input.request_exit(ExitRequest::Quit),
            _ => {}
        }
    }

    /// The key as a menu screen sees it
    pub fn to_command(self) -> Command {
        match self {
            KeyAction::Select(digit) => Command::Select(digit),
            KeyAction::Restart => Command::Restart,
            KeyAction::NextLevel => Command::NextLevel,
            KeyAction::Menu => Command::Menu,
            KeyAction::Quit | KeyAction::Interrupt => Command::Quit,
            _ => Command::Other,
        }
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Interrupt;
        }

        match key.code {
            // Player one - lowercase WASD only
            KeyCode::Char('w') => KeyAction::Steer(Player::One, Direction::Up),
            KeyCode::Char('a') => KeyAction::Steer(Player::One, Direction::Left),
            KeyCode::Char('s') => KeyAction::Steer(Player::One, Direction::Down),
            KeyCode::Char('d') => KeyAction::Steer(Player::One, Direction::Right),

            // Player two - arrow keys or IJKL
            KeyCode::Up | KeyCode::Char('i' | 'I') => KeyAction::Steer(Player::Two, Direction::Up),
            KeyCode::Left | KeyCode::Char('j' | 'J') => {
                KeyAction::Steer(Player::Two, Direction::Left)
            }
            KeyCode::Down | KeyCode::Char('k' | 'K') => {
                KeyAction::Steer(Player::Two, Direction::Down)
            }
            KeyCode::Right | KeyCode::Char('l' | 'L') => {
                KeyAction::Steer(Player::Two, Direction::Right)
            }

            // Controls
            KeyCode::Char('p' | 'P') => KeyAction::Pause,
            KeyCode::Char('q' | 'Q') => KeyAction::Quit,
            KeyCode::Char('m' | 'M') => KeyAction::Menu,
            KeyCode::Char('r' | 'R') => KeyAction::Restart,
            KeyCode::Char('n' | 'N') => KeyAction::NextLevel,
            KeyCode::Char(c @ '0'..='9') => KeyAction::Select(c as u8 - b'0'),

            _ => KeyAction::Other,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
