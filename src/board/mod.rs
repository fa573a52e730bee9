//! Chess position representation and game logic.
//!
//! Uses bitboards with magic lookups for move generation, incremental Zobrist hashing
//! and piece-square scores, and a lazy SMP alpha-beta search on top.
//!
//! # Example
//! ```
//! use chess_core::board::Position;
//!
//! let mut pos = Position::startpos();
//! let moves = pos.generate_legal_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

pub mod attack_tables;
mod error;
mod eval;
mod fen;
mod legality;
mod make_unmake;
mod movegen;
mod notation;
mod pst;
pub mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use error::{FenError, MoveParseError, PositionError, SquareError};
pub use fen::STARTPOS_FEN;
pub use make_unmake::{MoveGuard, NullMoveGuard};
pub use notation::{format_move, parse_move};
pub use state::{NullUndoToken, Position, UndoToken};
pub use types::{
    Bitboard, BitboardIter, CastleSide, CastlingRights, Color, Move, MoveKind, MoveList,
    PackedMove, Piece, ScoredMove, ScoredMoveList, Square,
};

// Public API - search functions and configuration
pub use search::{
    search, SearchConfig, SearchOutcome, SearchParams, SearchStats, SearchWorker, INFINITY,
    MATE_SCORE, MATE_THRESHOLD,
};

pub(crate) use types::MAX_PLY;
