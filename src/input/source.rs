use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::collections::VecDeque;
use std::time::Duration;

/// Non-blocking source of key presses
pub trait KeySource {
    /// Next pending key press, or `None` right away if there is none
    fn poll_key(&mut self) -> Result<Option<KeyEvent>>;
}

/// Reads key presses from the terminal through crossterm
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
        while event::poll(Duration::ZERO).context("Failed to poll terminal events")? {
            // Only process key press events, not release or resize
            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }
}

/// Replays queued key presses; used to drive a session without a terminal
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    queue: VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: KeyEvent) {
        self.queue.push_back(key);
    }

    pub fn extend(&mut self, keys: impl IntoIterator<Item = KeyEvent>) {
        self.queue.extend(keys);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
        Ok(self.queue.pop_front())
    }
}
