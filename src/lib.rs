//! Grid Snake - a terminal snake game with levels, obstacles and a
//! two-player mode
//!
//! This library provides:
//! - Core game logic: board, obstacles, food, collisions, rounds and the
//!   session state machine (game module)
//! - Key mapping and key sources (input module)
//! - TUI rendering on ratatui (render module)
//! - The interactive driver (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
