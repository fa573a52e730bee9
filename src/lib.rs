//! Bitboard chess engine core: move generation, evaluation and a parallel alpha-beta
//! search over a shared lockless transposition table.

pub mod board;
pub mod engine;
pub mod tt;
pub mod zobrist;

pub use board::{Color, Move, Piece, Position, SearchOutcome, Square};
pub use engine::{Engine, TimeControl};
pub use tt::TranspositionTable;
