//! Engine controller for managing search and game state.
//!
//! Owns the current position and the shared transposition table, turns a time control
//! into search limits, and runs searches on the caller's thread or in the background.

mod controller;
pub mod time;

pub use controller::{Engine, EngineError, PositionSpec};
pub use time::TimeControl;
