//! Grid Snake - a classic Snake game for the terminal
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - Keyboard mapping (input module)
//! - Playfield and status overlay drawing (render module)
//! - Per-session statistics (metrics module)
//! - The interactive frame loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
