//! Core chess types.
//!
//! This module contains the fundamental types used throughout the engine:
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - compact board square (u8 index)
//! - `Bitboard` - 64-bit set of squares
//! - `Move`, `MoveList` and `ScoredMoveList` - move representation
//! - `CastlingRights` - castling state and geometry

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastleSide, CastlingRights};
pub use moves::{Move, MoveKind, MoveList, PackedMove, ScoredMove, ScoredMoveList};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use castling::{castling_path, CASTLING_SPOILERS};
#[cfg(test)]
pub(crate) use castling::{CASTLE_BLACK_Q, CASTLE_WHITE_K};
pub(crate) use moves::MAX_PLY;
pub(crate) use piece::PROMOTION_PIECES;
