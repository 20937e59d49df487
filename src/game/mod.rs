//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end only reads [`Snapshot`]s and feeds directions and
//! start requests back in.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo};
pub use state::{CollisionType, GameState, Phase, Position, Snake, Snapshot};
