use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use super::state::Board;

/// Glyphs offered on the character select screen, in key order `1`-`6`
pub const SNAKE_GLYPHS: [char; 6] = ['■', '□', '○', '●', '▲', '♦'];

/// Game difficulty: sets the tick speed and how many random obstacles are
/// added on top of the level pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Delay between two ticks of a running round
    pub fn tick_interval(&self) -> Duration {
        match self {
            Self::Easy => Duration::from_millis(200),
            Self::Normal => Duration::from_millis(150),
            Self::Hard => Duration::from_millis(100),
            Self::Expert => Duration::from_millis(50),
        }
    }

    /// Number of random obstacle cells drawn for a board. Duplicates
    /// collapse, so the set may grow by less.
    pub fn extra_obstacles(&self, board: &Board) -> usize {
        let area = board.playable_area().max(0) as usize;
        match self {
            Self::Easy | Self::Normal => 0,
            Self::Hard => (area / 20).min(10),
            Self::Expert => (area / 15).min(20),
        }
    }

    /// Difficulty for the digit keys `1`-`4`
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1..=4 => Some(Self::ALL[usize::from(digit - 1)]),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
            Self::Expert => "EXPERT",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Difficulty used until changed in the settings screen
    pub difficulty: Difficulty,
    /// Level a game started from the main menu begins at
    pub start_level: u32,
    /// Name recorded in the high score table for player one
    pub player1_name: String,
    /// Name recorded in the high score table for player two
    pub player2_name: String,
    /// Glyph player one's snake is drawn with
    pub snake_glyph: char,
    /// Glyph player two's snake is drawn with
    pub snake2_glyph: char,
    /// Ring the terminal bell when food is eaten
    pub sound: bool,
    /// Start each next level with the previous level's score instead of 0
    pub carry_score: bool,
    /// Seed for obstacle and food placement; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            start_level: 1,
            player1_name: "Player1".to_string(),
            player2_name: "Player2".to_string(),
            snake_glyph: SNAKE_GLYPHS[0],
            snake2_glyph: SNAKE_GLYPHS[1],
            sound: true,
            carry_score: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.start_level >= 1, "start level must be at least 1");
        ensure!(
            !self.player1_name.trim().is_empty() && !self.player2_name.trim().is_empty(),
            "player names must not be empty"
        );
        Ok(())
    }
}
