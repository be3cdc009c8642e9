//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies:
//! board geometry, obstacle and food placement, collision detection, the round
//! engine and the session state machine.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod food;
pub mod obstacles;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, ExitRequest, Player, TickInput};
pub use collision::{collides, detect_collision, CollisionType};
pub use config::{Difficulty, GameConfig, SNAKE_GLYPHS};
pub use engine::{
    EndReason, RoundEngine, RoundOutcome, RoundSetup, RoundState, RoundStatus, TickResult,
};
pub use food::place_food;
pub use obstacles::generate_obstacles;
pub use session::{Command, Flow, HighScoreTable, Phase, ScoreEntry, Session, SessionContext, SettingsView};
pub use state::{Board, Cell, Snake};
